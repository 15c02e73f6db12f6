use crate::memory::addressable::Addressable;
use crate::memory::registers::InterruptFlags;
use crate::memory::{INTERRUPT_ENABLE_REGISTER, INTERRUPT_FLAGS_REGISTER};
use log::trace;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    Stat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub fn flag(&self) -> InterruptFlags {
        match self {
            Interrupt::VBlank => InterruptFlags::VBLANK,
            Interrupt::Stat => InterruptFlags::LCD_STAT,
            Interrupt::Timer => InterruptFlags::TIMER,
            Interrupt::Serial => InterruptFlags::SERIAL,
            Interrupt::Joypad => InterruptFlags::JOYPAD,
        }
    }

    pub fn to_address(&self) -> u16 {
        match self {
            Interrupt::VBlank => 0x0040,
            Interrupt::Stat => 0x0048,
            Interrupt::Timer => 0x0050,
            Interrupt::Serial => 0x0058,
            Interrupt::Joypad => 0x0060,
        }
    }

    /// Highest-priority interrupt in `flags`, if any.
    pub fn from_flags(flags: InterruptFlags) -> Option<Interrupt> {
        [
            Interrupt::VBlank,
            Interrupt::Stat,
            Interrupt::Timer,
            Interrupt::Serial,
            Interrupt::Joypad,
        ]
        .into_iter()
        .find(|irq| flags.contains(irq.flag()))
    }
}

impl std::fmt::Display for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Interrupt::VBlank => write!(f, "VBLANK"),
            Interrupt::Stat => write!(f, "STAT"),
            Interrupt::Timer => write!(f, "TIMER"),
            Interrupt::Serial => write!(f, "SERIAL"),
            Interrupt::Joypad => write!(f, "JOYPAD"),
        }
    }
}

/// The processor side of interrupt delivery. Peripherals only ever request.
pub trait InterruptSink {
    fn request(&self, irq: Interrupt);
}

/// Pending-set sink usable without a processor attached.
#[derive(Debug, Default)]
pub struct InterruptLatch {
    pending: Cell<InterruptFlags>,
    requests: Cell<usize>,
}

impl InterruptLatch {
    pub fn new() -> InterruptLatch {
        InterruptLatch::default()
    }

    pub fn pending(&self) -> InterruptFlags {
        self.pending.get()
    }

    /// Total number of requests received, including repeats of an already pending kind.
    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    pub fn acknowledge(&self, irq: Interrupt) {
        self.pending.set(self.pending.get() - irq.flag());
    }

    /// Overwrites the pending set, as a write to IF does.
    pub fn set_pending(&self, flags: InterruptFlags) {
        self.pending.set(flags);
    }
}

impl InterruptSink for InterruptLatch {
    fn request(&self, irq: Interrupt) {
        self.pending.set(self.pending.get() | irq.flag());
        self.requests.set(self.requests.get() + 1);
    }
}

/// IF (0xff0f) over a shared latch, plus IE (0xffff).
pub struct InterruptRegisters {
    latch: Rc<InterruptLatch>,
    enabled: u8,
}

impl InterruptRegisters {
    pub fn new(latch: Rc<InterruptLatch>) -> InterruptRegisters {
        InterruptRegisters { latch, enabled: 0 }
    }

    /// Requested and enabled at the same time.
    pub fn active(&self) -> InterruptFlags {
        self.latch.pending() & InterruptFlags::from(self.enabled)
    }
}

impl Addressable for InterruptRegisters {
    fn read(&self, addr: u16) -> Option<u8> {
        match addr {
            INTERRUPT_FLAGS_REGISTER => Some(self.latch.pending().bits() | 0b1110_0000),
            INTERRUPT_ENABLE_REGISTER => Some(self.enabled),
            _ => None,
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            INTERRUPT_FLAGS_REGISTER => self.latch.set_pending(InterruptFlags::from(data)),
            INTERRUPT_ENABLE_REGISTER => self.enabled = data,
            _ => return,
        }
        trace!("Interrupt register ${:04x} <- {:02x}", addr, data);
    }

    fn name(&self) -> &str {
        "interrupts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_collects_a_pending_set() {
        let latch = InterruptLatch::new();
        latch.request(Interrupt::Timer);
        latch.request(Interrupt::Joypad);
        latch.request(Interrupt::Timer);

        assert_eq!(latch.pending(), InterruptFlags::TIMER | InterruptFlags::JOYPAD);
        assert_eq!(latch.requests(), 3);
        assert_eq!(Interrupt::from_flags(latch.pending()), Some(Interrupt::Timer));

        latch.acknowledge(Interrupt::Timer);
        assert_eq!(Interrupt::from_flags(latch.pending()), Some(Interrupt::Joypad));
        assert_eq!(Interrupt::Joypad.to_address(), 0x0060);
    }

    #[test]
    fn registers_expose_the_latch() {
        let latch = Rc::new(InterruptLatch::new());
        let mut registers = InterruptRegisters::new(latch.clone());
        assert_eq!(registers.read(INTERRUPT_FLAGS_REGISTER), Some(0xe0));

        latch.request(Interrupt::Serial);
        assert_eq!(registers.read(INTERRUPT_FLAGS_REGISTER), Some(0xe8));
        assert!(registers.active().is_empty());

        registers.write(INTERRUPT_ENABLE_REGISTER, 0xff);
        assert_eq!(registers.active(), InterruptFlags::SERIAL);

        registers.write(INTERRUPT_FLAGS_REGISTER, 0x01);
        assert_eq!(latch.pending(), InterruptFlags::VBLANK);
        assert_eq!(registers.read(0xff10), None);
    }
}
