use crate::memory::addressable::Addressable;
use crate::memory::storage::Storage;
use log::warn;

/// Maps a [`Storage`] into the half-open address range `[start, end)`.
#[derive(Clone, Debug)]
pub struct MemoryWindow<S: Storage> {
    storage: S,
    start: u16,
    end: u16,
    name: &'static str,
}

impl<S: Storage> MemoryWindow<S> {
    /// # Panics
    ///
    /// Panics if the range is empty or larger than the backing storage.
    pub fn new(name: &'static str, storage: S, start: u16, end: u16) -> MemoryWindow<S> {
        assert!(start < end, "empty window {}: ${:04x}..${:04x}", name, start, end);
        assert!(
            (end - start) as usize <= storage.size(),
            "window {} spans {} bytes but storage holds {}",
            name,
            end - start,
            storage.size()
        );

        MemoryWindow {
            storage,
            start,
            end,
            name,
        }
    }

    #[inline]
    pub fn contains(&self, addr: u16) -> bool {
        addr >= self.start && addr < self.end
    }

    #[inline]
    pub fn start(&self) -> u16 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u16 {
        self.end
    }

    #[inline]
    fn offset(&self, addr: u16) -> Option<usize> {
        self.contains(addr).then(|| (addr - self.start) as usize)
    }
}

impl<S: Storage> Addressable for MemoryWindow<S> {
    #[inline]
    fn read(&self, addr: u16) -> Option<u8> {
        self.offset(addr).and_then(|offset| self.storage.load(offset).ok())
    }

    fn write(&mut self, addr: u16, data: u8) {
        if let Some(offset) = self.offset(addr) {
            if let Err(e) = self.storage.store(offset, data) {
                warn!("{}: ignored write of {:02x} to ${:04x}: {}", self.name, data, addr, e);
            }
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::storage::{ByteArray, ReadOnlyMemory};

    #[test]
    fn translates_global_addresses() {
        let mut window = MemoryWindow::new("wram", ByteArray::new(0x2000), 0xc000, 0xe000);
        window.write(0xc010, 0x42);
        assert_eq!(window.read(0xc010), Some(0x42));
        assert_eq!(window.read(0xdfff), Some(0x00));
    }

    #[test]
    fn outside_addresses_are_unmapped() {
        let mut window = MemoryWindow::new("hram", ByteArray::new(0x7f), 0xff80, 0xffff);
        for addr in [0x0000, 0xff7f, 0xffff] {
            window.write(addr, 0x99);
            assert_eq!(window.read(addr), None, "read at ${:04x}", addr);
        }
        for addr in 0xff80..0xffff {
            assert_eq!(window.read(addr), Some(0x00));
        }
    }

    #[test]
    fn read_only_window_ignores_writes() {
        let mut window = MemoryWindow::new("rom", ReadOnlyMemory::new(vec![7; 16]), 0x0000, 0x0010);
        window.write(0x0003, 0x00);
        assert_eq!(window.read(0x0003), Some(7));
    }

    #[test]
    #[should_panic]
    fn window_larger_than_storage_panics() {
        MemoryWindow::new("vram", ByteArray::new(0x10), 0x8000, 0x8020);
    }
}
