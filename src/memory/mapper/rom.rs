use crate::error::{AyyError, InvalidRomSizeSnafu, UnsupportedCartridgeSnafu};
use crate::memory::mapper::{Mapper, CARTRIDGE_TYPE_OFFSET};
use crate::memory::storage::{ReadOnlyMemory, Storage};
use log::warn;
use snafu::ensure;

/// Two fixed 16 KiB banks, no controller.
pub const ROM_SIZE: usize = 0x8000;

#[derive(Clone)]
pub struct Rom {
    memory: ReadOnlyMemory,
}

impl Rom {
    pub fn new(memory: Vec<u8>) -> Result<Rom, AyyError> {
        ensure!(
            memory.len() == ROM_SIZE,
            InvalidRomSizeSnafu {
                expected: ROM_SIZE,
                actual: memory.len()
            }
        );
        let kind = memory[CARTRIDGE_TYPE_OFFSET];
        ensure!(kind == 0x00, UnsupportedCartridgeSnafu { kind });

        Ok(Rom {
            memory: ReadOnlyMemory::new(memory),
        })
    }
}

impl Mapper for Rom {
    #[inline]
    fn read(&self, addr: u16) -> Option<u8> {
        self.memory.load(addr as usize).ok()
    }

    #[inline]
    fn write(&mut self, addr: u16, data: u8) {
        // We simply only have a ROM. Writes inside it are dropped.
        if (addr as usize) < ROM_SIZE {
            warn!("Ignored write of {:02x} to ROM at ${:04x}", data, addr);
        }
    }

    #[inline]
    fn current_rom_bank(&self) -> u16 {
        0
    }

    #[inline]
    fn current_ram_bank(&self) -> u8 {
        0
    }

    #[inline]
    fn name(&self) -> String {
        String::from("ROM")
    }
}
