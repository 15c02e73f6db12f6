pub mod palette;
pub mod scanline;
pub mod sprite;
pub mod tile;

pub const SCREEN_WIDTH: usize = 160;

pub const BACKGROUND_WIDTH: usize = 256;

pub const TILESET_0_ADDRESS: u16 = 0x8000;
/// Tile 0 in signed addressing mode.
pub const TILESET_SIGNED_BASE: u16 = 0x9000;
pub const OAM_ADDRESS: u16 = 0xfe00;
