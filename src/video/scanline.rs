use crate::video::palette::Palette;
use crate::video::BACKGROUND_WIDTH;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

/// Widest line the compositor handles: one full background row.
pub const MAX_WIDTH: usize = BACKGROUND_WIDTH;

const WORDS: usize = MAX_WIDTH / 64;

/// One bit per pixel; pixel `i` is bit `i % 64` of word `i / 64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitPlane([u64; WORDS]);

impl BitPlane {
    pub const EMPTY: BitPlane = BitPlane([0; WORDS]);

    /// Bits `0..count` set.
    pub fn first(count: usize) -> BitPlane {
        let mut words = [0u64; WORDS];
        for (index, word) in words.iter_mut().enumerate() {
            let low = index * 64;
            if count >= low + 64 {
                *word = u64::MAX;
            } else if count > low {
                *word = (1u64 << (count - low)) - 1;
            }
        }
        BitPlane(words)
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        index < MAX_WIDTH && (self.0[index / 64] >> (index % 64)) & 1 != 0
    }

    /// # Panics
    ///
    /// Panics if `index` is not below [`MAX_WIDTH`].
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        let mask = 1u64 << (index % 64);
        match value {
            true => self.0[index / 64] |= mask,
            false => self.0[index / 64] &= !mask,
        }
    }

    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|word| word.count_ones()).sum()
    }

    /// Moves pixel `i` to `i + n`; bits pushed past [`MAX_WIDTH`] are lost.
    fn shifted_up(&self, n: usize) -> BitPlane {
        if n >= MAX_WIDTH {
            return BitPlane::EMPTY;
        }
        let (words, bits) = (n / 64, n % 64);
        let mut out = [0u64; WORDS];
        for index in words..WORDS {
            let source = index - words;
            out[index] = self.0[source] << bits;
            if bits != 0 && source > 0 {
                out[index] |= self.0[source - 1] >> (64 - bits);
            }
        }
        BitPlane(out)
    }

    /// Moves pixel `i` to `i - n`; pixels below `n` are lost.
    fn shifted_down(&self, n: usize) -> BitPlane {
        if n >= MAX_WIDTH {
            return BitPlane::EMPTY;
        }
        let (words, bits) = (n / 64, n % 64);
        let mut out = [0u64; WORDS];
        for index in 0..WORDS - words {
            let source = index + words;
            out[index] = self.0[source] >> bits;
            if bits != 0 && source + 1 < WORDS {
                out[index] |= self.0[source + 1] << (64 - bits);
            }
        }
        BitPlane(out)
    }

    fn zip(self, other: BitPlane, op: impl Fn(u64, u64) -> u64) -> BitPlane {
        let mut out = self.0;
        for (word, other) in out.iter_mut().zip(other.0) {
            *word = op(*word, other);
        }
        BitPlane(out)
    }
}

impl BitAnd for BitPlane {
    type Output = BitPlane;

    fn bitand(self, rhs: BitPlane) -> BitPlane {
        self.zip(rhs, |a, b| a & b)
    }
}

impl BitOr for BitPlane {
    type Output = BitPlane;

    fn bitor(self, rhs: BitPlane) -> BitPlane {
        self.zip(rhs, |a, b| a | b)
    }
}

/// Flips all [`MAX_WIDTH`] bits; callers mask back to their line width.
impl Not for BitPlane {
    type Output = BitPlane;

    fn not(self) -> BitPlane {
        BitPlane(self.0.map(|word| !word))
    }
}

/// A row of 2-bit pixels stored as three bit-planes.
///
/// Pixel `i` has color `2 * high[i] + low[i]`; `opacity[i]` marks it as drawn for
/// layering. Every operation works on whole planes and returns a new line. Bits at
/// or beyond `width` are always clear, so derived equality compares pixels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanline {
    width: usize,
    low: BitPlane,
    high: BitPlane,
    opacity: BitPlane,
}

impl Scanline {
    /// A transparent line of color 0.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= width <= MAX_WIDTH`.
    pub fn blank(width: usize) -> Scanline {
        assert!((1..=MAX_WIDTH).contains(&width), "invalid scanline width {}", width);
        Scanline {
            width,
            low: BitPlane::EMPTY,
            high: BitPlane::EMPTY,
            opacity: BitPlane::EMPTY,
        }
    }

    pub fn from_planes(width: usize, low: BitPlane, high: BitPlane, opacity: BitPlane) -> Scanline {
        let mask = Scanline::blank(width).mask();
        Scanline {
            width,
            low: low & mask,
            high: high & mask,
            opacity: opacity & mask,
        }
    }

    /// Builds a line from color indices (only the low two bits count). Non-zero
    /// colors are opaque, color 0 is transparent.
    ///
    /// # Panics
    ///
    /// Panics if `colors` is empty or longer than [`MAX_WIDTH`].
    pub fn from_colors(colors: &[u8]) -> Scanline {
        let mut line = Scanline::blank(colors.len());
        for (index, color) in colors.iter().enumerate() {
            line.low.set(index, color & 0b01 != 0);
            line.high.set(index, color & 0b10 != 0);
        }
        line.opacity = line.nonzero();
        line
    }

    /// Eight pixels from one tile row; the most significant bit is the leftmost pixel.
    pub fn from_tile_row(low: u8, high: u8) -> Scanline {
        Scanline::from_tile_rows(&[(low, high)])
    }

    /// Concatenates tile rows left to right, 8 pixels each.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty or holds more than `MAX_WIDTH / 8` rows.
    pub fn from_tile_rows(rows: &[(u8, u8)]) -> Scanline {
        let mut line = Scanline::blank(rows.len() * 8);
        for (tile, (low, high)) in rows.iter().enumerate() {
            let shift = (tile % 8) * 8;
            line.low.0[tile / 8] |= (low.reverse_bits() as u64) << shift;
            line.high.0[tile / 8] |= (high.reverse_bits() as u64) << shift;
        }
        line.opacity = line.nonzero();
        line
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn color(&self, index: usize) -> u8 {
        ((self.high.get(index) as u8) << 1) | self.low.get(index) as u8
    }

    #[inline]
    pub fn is_opaque(&self, index: usize) -> bool {
        self.opacity.get(index)
    }

    pub fn colors(&self) -> Vec<u8> {
        (0..self.width).map(|index| self.color(index)).collect()
    }

    pub fn low(&self) -> BitPlane {
        self.low
    }

    pub fn high(&self) -> BitPlane {
        self.high
    }

    pub fn opacity(&self) -> BitPlane {
        self.opacity
    }

    /// Pixels whose color index is not 0.
    pub fn nonzero(&self) -> BitPlane {
        self.low | self.high
    }

    pub fn with_opacity(&self, opacity: BitPlane) -> Scanline {
        Scanline {
            opacity: opacity & self.mask(),
            ..*self
        }
    }

    pub fn opaque(&self) -> Scanline {
        self.with_opacity(self.mask())
    }

    /// Horizontal shift with zero fill. Positive distances move pixels right
    /// (towards higher indices), negative distances move them left.
    pub fn shift(&self, distance: isize) -> Scanline {
        let mask = self.mask();
        let shift = |plane: BitPlane| {
            let shifted = match distance >= 0 {
                true => plane.shifted_up(distance.unsigned_abs()),
                false => plane.shifted_down(distance.unsigned_abs()),
            };
            shifted & mask
        };

        Scanline {
            width: self.width,
            low: shift(self.low),
            high: shift(self.high),
            opacity: shift(self.opacity),
        }
    }

    /// Reads `length` pixels starting at `start`, wrapping around the end of the line.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= length <= MAX_WIDTH`.
    pub fn extract_wrapped(&self, start: usize, length: usize) -> Scanline {
        let result = Scanline::blank(length);
        let start = start % self.width;
        let mask = self.mask();
        let extract = |plane: BitPlane| {
            let rotated = (plane.shifted_down(start) | plane.shifted_up(self.width - start)) & mask;
            let mut out = BitPlane::EMPTY;
            let mut offset = 0;
            while offset < length {
                out = out | rotated.shifted_up(offset);
                offset += self.width;
            }
            out & result.mask()
        };

        Scanline {
            width: length,
            low: extract(self.low),
            high: extract(self.high),
            opacity: extract(self.opacity),
        }
    }

    /// Replaces every color `c` with `palette.shade(c)`. Opacity is untouched.
    pub fn map_colors(&self, palette: Palette) -> Scanline {
        if palette.is_identity() {
            return *self;
        }

        let (low, high) = (self.low, self.high);
        let by_color = [!high & !low, !high & low, high & !low, high & low];

        let mut mapped_low = BitPlane::EMPTY;
        let mut mapped_high = BitPlane::EMPTY;
        for (color, pixels) in by_color.into_iter().enumerate() {
            let shade = palette.shade(color as u8);
            if shade & 0b01 != 0 {
                mapped_low = mapped_low | pixels;
            }
            if shade & 0b10 != 0 {
                mapped_high = mapped_high | pixels;
            }
        }

        let mask = self.mask();
        Scanline {
            low: mapped_low & mask,
            high: mapped_high & mask,
            ..*self
        }
    }

    /// Puts `self` underneath `other`: wherever `other` is opaque it shows, elsewhere
    /// `self` does. The result is opaque wherever either input is.
    ///
    /// # Panics
    ///
    /// Panics if the widths differ.
    pub fn below(&self, other: &Scanline) -> Scanline {
        self.below_masked(other, other.opacity)
    }

    /// Like [`Scanline::below`] but `mask` stands in for the opacity of `other`:
    /// `other` shows wherever `mask` is set, and the result is opaque wherever
    /// `self` or `mask` is.
    ///
    /// # Panics
    ///
    /// Panics if the widths differ.
    pub fn below_masked(&self, other: &Scanline, mask: BitPlane) -> Scanline {
        self.assert_same_width(other);
        let mask = mask & self.mask();
        let pick = |under: BitPlane, over: BitPlane| (over & mask) | (under & !mask);

        Scanline {
            width: self.width,
            low: pick(self.low, other.low),
            high: pick(self.high, other.high),
            opacity: (self.opacity | mask) & self.mask(),
        }
    }

    /// Pixels `0..split` from `self`, `split..` from `other`. A split past the end
    /// keeps `self` unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the widths differ.
    pub fn join(&self, other: &Scanline, split: usize) -> Scanline {
        self.assert_same_width(other);
        let left = BitPlane::first(split.min(self.width));
        let pick = |this: BitPlane, that: BitPlane| (this & left) | (that & !left & self.mask());

        Scanline {
            width: self.width,
            low: pick(self.low, other.low),
            high: pick(self.high, other.high),
            opacity: pick(self.opacity, other.opacity),
        }
    }

    #[inline]
    fn mask(&self) -> BitPlane {
        BitPlane::first(self.width)
    }

    fn assert_same_width(&self, other: &Scanline) {
        assert_eq!(
            self.width, other.width,
            "cannot layer scanlines of width {} and {}",
            self.width, other.width
        );
    }
}

impl fmt::Display for Scanline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for index in 0..self.width {
            match self.is_opaque(index) {
                true => write!(f, "{}", self.color(index))?,
                false => write!(f, ".")?,
            }
        }
        Ok(())
    }
}
