use crate::memory::addressable::Addressable;
use crate::memory::storage::Storage;
use crate::memory::window::MemoryWindow;
use crate::memory::OPEN_BUS;
use crate::video::scanline::Scanline;
use crate::video::{TILESET_0_ADDRESS, TILESET_SIGNED_BASE};

pub const TILE_SIZE: u16 = 16;

/// Address of one bit-plane byte of a tile row.
///
/// With `unsigned_mode` the index counts up from $8000. Otherwise it is a signed
/// offset from $9000, so tiles 128-255 land in $8800-$8fff. `row` may cover a
/// 16-pixel sprite; only its low four bits are used.
pub fn plane_address(tile_index: u8, row: u8, high: bool, unsigned_mode: bool) -> u16 {
    let row_offset = (row & 0x0f) as u16 * 2 + high as u16;
    let tile_offset = match unsigned_mode {
        true => TILESET_0_ADDRESS.wrapping_add(tile_index as u16 * TILE_SIZE),
        false => TILESET_SIGNED_BASE.wrapping_add_signed(tile_index as i8 as i16 * TILE_SIZE as i16),
    };
    tile_offset + row_offset
}

/// Reads tile rows out of VRAM without owning it.
pub struct TileData<'a, S: Storage> {
    vram: &'a MemoryWindow<S>,
}

impl<'a, S: Storage> TileData<'a, S> {
    pub fn new(vram: &'a MemoryWindow<S>) -> TileData<'a, S> {
        TileData { vram }
    }

    /// The (low, high) bit-plane bytes of one row.
    pub fn row(&self, tile_index: u8, row: u8, unsigned_mode: bool) -> (u8, u8) {
        let plane = |high| {
            self.vram
                .read(plane_address(tile_index, row, high, unsigned_mode))
                .unwrap_or(OPEN_BUS)
        };
        (plane(false), plane(true))
    }

    pub fn row_line(&self, tile_index: u8, row: u8, unsigned_mode: bool) -> Scanline {
        let (low, high) = self.row(tile_index, row, unsigned_mode);
        Scanline::from_tile_row(low, high)
    }
}
