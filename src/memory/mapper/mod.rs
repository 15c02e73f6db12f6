use crate::error::{AyyError, ArchiveSnafu, EmptyArchiveSnafu, ReadImageSnafu, UnsupportedCartridgeSnafu};
use dyn_clone::DynClone;
use log::info;
use snafu::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub mod rom;

pub use rom::Rom;

/// Offset of the cartridge type byte in the header.
pub const CARTRIDGE_TYPE_OFFSET: usize = 0x147;

/// Cartridge-side bank controller. Addresses are bus addresses; `read` returns
/// `None` outside the controller's range and `write` never fails.
pub trait Mapper: DynClone {
    fn read(&self, addr: u16) -> Option<u8>;
    fn write(&mut self, addr: u16, data: u8);
    fn current_rom_bank(&self) -> u16;
    fn current_ram_bank(&self) -> u8;
    fn name(&self) -> String;
}

dyn_clone::clone_trait_object!(Mapper);

/// Picks the bank controller for a raw ROM image.
pub fn from_bytes(image: Vec<u8>) -> Result<Box<dyn Mapper>, AyyError> {
    let kind = image.get(CARTRIDGE_TYPE_OFFSET).copied().unwrap_or(0);

    let mapper: Box<dyn Mapper> = match kind {
        0x00 => Box::new(Rom::new(image)?),
        kind => return UnsupportedCartridgeSnafu { kind }.fail(),
    };

    info!("Loaded cartridge with mapper {}", mapper.name());
    Ok(mapper)
}

/// Loads a cartridge from a raw `.gb` dump or from the first `.gb` entry of a `.zip`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Box<dyn Mapper>, AyyError> {
    let path = path.as_ref();
    let is_archive = path
        .extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case("zip"));

    let image = match is_archive {
        true => read_archive(path)?,
        false => std::fs::read(path).context(ReadImageSnafu { path })?,
    };

    from_bytes(image)
}

fn read_archive(path: &Path) -> Result<Vec<u8>, AyyError> {
    let file = File::open(path).context(ReadImageSnafu { path })?;
    let mut archive = zip::ZipArchive::new(file).context(ArchiveSnafu { path })?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).context(ArchiveSnafu { path })?;
        if entry.is_dir() || !entry.name().to_ascii_lowercase().ends_with(".gb") {
            continue;
        }

        info!("Using {} from {}", entry.name(), path.display());
        let mut image = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut image).context(ReadImageSnafu { path })?;
        return Ok(image);
    }

    EmptyArchiveSnafu { path }.fail()
}
