use crate::error::{AyyError, InvalidBootImageSnafu, ReadImageSnafu};
use crate::memory::addressable::Addressable;
use crate::memory::mapper::Mapper;
use crate::memory::storage::ReadOnlyMemory;
use crate::memory::window::MemoryWindow;
use crate::memory::{BOOTROM_END, BOOTROM_MAPPER_REGISTER, BOOTROM_START};
use log::debug;
use snafu::prelude::*;
use std::path::Path;

pub const BOOTROM_SIZE: usize = (BOOTROM_END - BOOTROM_START) as usize;

/// The 256-byte program mapped over the cartridge at power-on.
#[derive(Clone, Debug)]
pub struct BootImage {
    memory: ReadOnlyMemory,
}

impl BootImage {
    pub fn new(memory: Vec<u8>) -> Result<BootImage, AyyError> {
        ensure!(
            memory.len() == BOOTROM_SIZE,
            InvalidBootImageSnafu {
                expected: BOOTROM_SIZE,
                actual: memory.len()
            }
        );

        Ok(BootImage {
            memory: ReadOnlyMemory::new(memory),
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<BootImage, AyyError> {
        let path = path.as_ref();
        let memory = std::fs::read(path).context(ReadImageSnafu { path })?;
        BootImage::new(memory)
    }

    /// A stand-in program that does nothing but unmap itself:
    /// NOPs up to $00fc, then `LD A,$01; LDH ($50),A`, falling through to $0100.
    pub fn minimal() -> BootImage {
        let mut memory = vec![0x00; BOOTROM_SIZE];
        memory[BOOTROM_SIZE - 4..].copy_from_slice(&[0x3e, 0x01, 0xe0, 0x50]);
        BootImage {
            memory: ReadOnlyMemory::new(memory),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.memory.as_slice()
    }
}

/// Serves the boot image over $0000-$00ff until the boot-disable register is
/// written, then hands the whole range back to the cartridge for good.
#[derive(Clone)]
pub struct BootOverlay {
    boot: MemoryWindow<ReadOnlyMemory>,
    cartridge: Box<dyn Mapper>,
    active: bool,
}

impl BootOverlay {
    pub fn new(boot: BootImage, cartridge: Box<dyn Mapper>) -> BootOverlay {
        BootOverlay {
            boot: MemoryWindow::new("bootrom", boot.memory, BOOTROM_START, BOOTROM_END),
            cartridge,
            active: true,
        }
    }

    /// Overlay that starts out disabled, as if the boot program already ran.
    pub fn skipped(cartridge: Box<dyn Mapper>) -> BootOverlay {
        BootOverlay {
            active: false,
            ..BootOverlay::new(BootImage::minimal(), cartridge)
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cartridge(&self) -> &dyn Mapper {
        self.cartridge.as_ref()
    }
}

impl Addressable for BootOverlay {
    #[inline]
    fn read(&self, addr: u16) -> Option<u8> {
        match self.active && self.boot.contains(addr) {
            true => self.boot.read(addr),
            false => self.cartridge.read(addr),
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        if addr == BOOTROM_MAPPER_REGISTER && self.active {
            debug!("Boot ROM unmapped by write of {:02x}", data);
            self.active = false;
        }
        self.cartridge.write(addr, data);
    }

    fn name(&self) -> &str {
        "cartridge"
    }
}
