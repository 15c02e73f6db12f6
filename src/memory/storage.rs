use crate::error::{AyyError, OutOfBoundsSnafu, WriteToReadOnlyMemorySnafu};
use snafu::{ensure, OptionExt};

/// Flat, fixed-size byte store addressed by local offset.
pub trait Storage {
    fn size(&self) -> usize;
    fn load(&self, offset: usize) -> Result<u8, AyyError>;
    fn store(&mut self, offset: usize, data: u8) -> Result<(), AyyError>;
}

/// Immutable image, e.g. a cartridge ROM or the boot program.
#[derive(Clone, Debug)]
pub struct ReadOnlyMemory {
    memory: Box<[u8]>,
}

impl ReadOnlyMemory {
    pub fn new(memory: Vec<u8>) -> ReadOnlyMemory {
        ReadOnlyMemory {
            memory: memory.into_boxed_slice(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }
}

impl Storage for ReadOnlyMemory {
    #[inline]
    fn size(&self) -> usize {
        self.memory.len()
    }

    #[inline]
    fn load(&self, offset: usize) -> Result<u8, AyyError> {
        self.memory.get(offset).copied().ok_or(AyyError::OutOfBounds {
            offset,
            size: self.memory.len(),
        })
    }

    fn store(&mut self, offset: usize, _data: u8) -> Result<(), AyyError> {
        ensure!(
            offset < self.memory.len(),
            OutOfBoundsSnafu {
                offset,
                size: self.memory.len()
            }
        );
        WriteToReadOnlyMemorySnafu { offset }.fail()
    }
}

/// Zero-initialised mutable memory such as VRAM, WRAM, OAM or HRAM.
#[derive(Clone, Debug)]
pub struct ByteArray {
    memory: Vec<u8>,
}

impl ByteArray {
    pub fn new(size: usize) -> ByteArray {
        ByteArray { memory: vec![0; size] }
    }
}

impl Storage for ByteArray {
    #[inline]
    fn size(&self) -> usize {
        self.memory.len()
    }

    #[inline]
    fn load(&self, offset: usize) -> Result<u8, AyyError> {
        self.memory.get(offset).copied().ok_or(AyyError::OutOfBounds {
            offset,
            size: self.memory.len(),
        })
    }

    #[inline]
    fn store(&mut self, offset: usize, data: u8) -> Result<(), AyyError> {
        let size = self.memory.len();
        let slot = self.memory.get_mut(offset).context(OutOfBoundsSnafu { offset, size })?;
        *slot = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn byte_array_is_bounds_checked() {
        let mut ram = ByteArray::new(4);
        ram.store(3, 0x42).unwrap();
        assert_eq!(ram.load(3).unwrap(), 0x42);
        assert_eq!(ram.store(4, 0x42).unwrap_err().kind(), ErrorKind::InvalidArgument);
        assert!(matches!(ram.load(4), Err(AyyError::OutOfBounds { offset: 4, size: 4 })));
    }

    #[test]
    fn read_only_memory_rejects_stores() {
        let mut rom = ReadOnlyMemory::new(vec![1, 2, 3]);
        assert!(matches!(rom.store(1, 9), Err(AyyError::WriteToReadOnlyMemory { offset: 1 })));
        assert!(matches!(rom.store(7, 9), Err(AyyError::OutOfBounds { .. })));
        assert_eq!(rom.load(1).unwrap(), 2);
    }
}
