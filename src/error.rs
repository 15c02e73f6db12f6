use snafu::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AyyError {
    #[snafu(display("Address out of range: ${:x}", address))]
    InvalidAddress { address: u32 },
    #[snafu(display("Value out of byte range: {:#x}", value))]
    InvalidValue { value: u32 },
    #[snafu(display("Offset {:#06x} out of bounds for storage of {} bytes", offset, size))]
    OutOfBounds { offset: usize, size: usize },
    #[snafu(display("Write to read-only memory at offset {:#06x}", offset))]
    WriteToReadOnlyMemory { offset: usize },
    #[snafu(display("Invalid ROM size: expected {} bytes, got {}", expected, actual))]
    InvalidRomSize { expected: usize, actual: usize },
    #[snafu(display("Unsupported cartridge type: {:02x}", kind))]
    UnsupportedCartridge { kind: u8 },
    #[snafu(display("Invalid boot image size: expected {} bytes, got {}", expected, actual))]
    InvalidBootImage { expected: usize, actual: usize },
    #[snafu(display("Failed to read image {}", path.display()))]
    ReadImage { path: PathBuf, source: std::io::Error },
    #[snafu(display("Failed to open ROM archive {}", path.display()))]
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },
    #[snafu(display("No .gb entry found in archive {}", path.display()))]
    EmptyArchive { path: PathBuf },
    #[snafu(display("Serial link failure"))]
    Link { source: std::io::Error },
}

/// Coarse classification of [`AyyError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An address or value outside its numeric range. Always a caller bug.
    InvalidArgument,
    /// A malformed cartridge or boot image.
    InvalidFormat,
    NotFound,
    Io,
}

impl AyyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AyyError::InvalidAddress { .. }
            | AyyError::InvalidValue { .. }
            | AyyError::OutOfBounds { .. }
            | AyyError::WriteToReadOnlyMemory { .. } => ErrorKind::InvalidArgument,
            AyyError::InvalidRomSize { .. }
            | AyyError::UnsupportedCartridge { .. }
            | AyyError::InvalidBootImage { .. }
            | AyyError::EmptyArchive { .. } => ErrorKind::InvalidFormat,
            AyyError::Archive { source, .. } => match source {
                zip::result::ZipError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::NotFound,
                zip::result::ZipError::Io(_) => ErrorKind::Io,
                _ => ErrorKind::InvalidFormat,
            },
            AyyError::ReadImage { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            AyyError::ReadImage { .. } | AyyError::Link { .. } => ErrorKind::Io,
        }
    }
}
