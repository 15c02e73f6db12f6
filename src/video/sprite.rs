use crate::memory::addressable::Addressable;
use crate::memory::storage::Storage;
use crate::memory::window::MemoryWindow;
use crate::memory::OPEN_BUS;
use crate::video::OAM_ADDRESS;
use bitflags::bitflags;

pub const SPRITE_COUNT: usize = 40;
pub const SPRITE_SIZE: u16 = 4;
/// Hardware limit of sprites drawn on one scanline.
pub const SPRITES_PER_LINE: usize = 10;
/// OAM Y is the sprite's bottom edge in 16-pixel-tall space.
pub const SPRITE_Y_OFFSET: usize = 16;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpriteAttributes: u8 {
        const PALETTE   = 0b0001_0000;
        const FLIP_X    = 0b0010_0000;
        const FLIP_Y    = 0b0100_0000;
        const PRIORITY  = 0b1000_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub y: u8,
    pub x: u8,
    pub tile_index: u8,
    pub attributes: SpriteAttributes,
}

impl Sprite {
    pub fn is_visible_on_scanline(&self, scanline: usize, height: usize) -> bool {
        let top = self.y as usize;
        let line = scanline + SPRITE_Y_OFFSET;
        line >= top && line < top + height
    }

    /// Row of the sprite's tile data that `scanline` crosses, after vertical flip.
    ///
    /// # Panics
    ///
    /// Panics if `height` is 0.
    pub fn row_on_scanline(&self, scanline: usize, height: usize) -> usize {
        let row = (scanline + SPRITE_Y_OFFSET).wrapping_sub(self.y as usize) % height;
        match self.attributes.contains(SpriteAttributes::FLIP_Y) {
            true => height - 1 - row,
            false => row,
        }
    }
}

/// Reads the sprite attribute table through the OAM window without owning it.
pub struct OamView<'a, S: Storage> {
    oam: &'a MemoryWindow<S>,
}

impl<'a, S: Storage> OamView<'a, S> {
    pub fn new(oam: &'a MemoryWindow<S>) -> OamView<'a, S> {
        OamView { oam }
    }

    /// # Panics
    ///
    /// Panics if `index` is not below [`SPRITE_COUNT`].
    pub fn sprite(&self, index: usize) -> Sprite {
        assert!(index < SPRITE_COUNT, "sprite index {} out of range", index);
        let address = OAM_ADDRESS + index as u16 * SPRITE_SIZE;
        let byte = |offset: u16| self.oam.read(address + offset).unwrap_or(OPEN_BUS);

        Sprite {
            y: byte(0),
            x: byte(1),
            tile_index: byte(2),
            attributes: SpriteAttributes::from_bits_truncate(byte(3)),
        }
    }

    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        (0..SPRITE_COUNT).map(move |index| self.sprite(index))
    }

    /// Indices of the sprites drawn on `scanline`, for sprites `height` (8 or 16)
    /// pixels tall.
    ///
    /// The first [`SPRITES_PER_LINE`] intersecting sprites in table order are kept,
    /// then ordered by X with the lower index first on ties.
    pub fn sprites_on_line(&self, scanline: usize, height: usize) -> Vec<usize> {
        let mut visible: Vec<(u16, usize)> = self
            .sprites()
            .enumerate()
            .filter(|(_, sprite)| sprite.is_visible_on_scanline(scanline, height))
            .take(SPRITES_PER_LINE)
            .map(|(index, sprite)| (((sprite.x as u16) << 8) | index as u16, index))
            .collect();

        visible.sort_by_key(|(key, _)| *key);
        visible.into_iter().map(|(_, index)| index).collect()
    }
}
