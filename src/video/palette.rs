/// A DMG palette register (BGP, OBP0, OBP1): four 2-bit shades, one per color index,
/// color 0 in bits 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(u8);

impl Palette {
    /// Maps every color onto itself.
    pub const IDENTITY: Palette = Palette(0b1110_0100);

    #[inline]
    pub fn shade(&self, color: u8) -> u8 {
        (self.0 >> ((color & 0b11) * 2)) & 0b11
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Palette::IDENTITY
    }

    #[inline]
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Palette {
    fn from(value: u8) -> Palette {
        Palette(value)
    }
}

impl Default for Palette {
    fn default() -> Palette {
        Palette::IDENTITY
    }
}
