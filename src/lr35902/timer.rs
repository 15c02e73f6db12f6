use crate::clock::Clocked;
use crate::lr35902::irq::{Interrupt, InterruptSink};
use crate::memory::addressable::Addressable;
use crate::memory::registers::TimerControl;
use crate::memory::{DIV_REGISTER, TAC_REGISTER, TIMA_REGISTER, TMA_REGISTER};
use log::{debug, trace};
use std::rc::Rc;

/// Divider bit watched for each TAC clock select value.
const MONITORED_BITS: [u16; 4] = [9, 3, 5, 7];

/// The divider advances by one machine cycle (4 T-cycles) per tick.
const DIVIDER_STEP: u16 = 4;

/// DIV/TIMA/TMA/TAC.
///
/// TIMA is clocked by falling edges of `TAC.enable && divider[bit]`. Every mutation
/// of the divider or of TAC goes through [`Timer::edge_checked`], so periodic ticks,
/// DIV resets and TAC writes all share the same increment rule.
pub struct Timer {
    divider: u16,
    counter: u8,
    reload: u8,
    control: TimerControl,
    irq: Rc<dyn InterruptSink>,
}

impl Timer {
    pub fn new(irq: Rc<dyn InterruptSink>) -> Timer {
        Timer {
            divider: 0,
            counter: 0,
            reload: 0,
            control: TimerControl::empty(),
            irq,
        }
    }

    #[inline]
    pub fn divider(&self) -> u16 {
        self.divider
    }

    #[inline]
    fn signal(&self) -> bool {
        let bit = MONITORED_BITS[(self.control & TimerControl::CLOCK_SELECT).bits() as usize];
        self.control.contains(TimerControl::ENABLE) && self.divider & (1 << bit) != 0
    }

    fn edge_checked(&mut self, mutate: impl FnOnce(&mut Timer)) {
        let before = self.signal();
        mutate(self);
        if before && !self.signal() {
            self.increment();
        }
    }

    fn increment(&mut self) {
        if self.counter == 0xff {
            debug!("TIMA overflow, reloading {:02x}", self.reload);
            self.counter = self.reload;
            self.irq.request(Interrupt::Timer);
        } else {
            self.counter += 1;
        }
    }
}

impl Addressable for Timer {
    fn read(&self, addr: u16) -> Option<u8> {
        match addr {
            DIV_REGISTER => Some((self.divider >> 8) as u8),
            TIMA_REGISTER => Some(self.counter),
            TMA_REGISTER => Some(self.reload),
            TAC_REGISTER => Some(self.control.bits() | 0b1111_1000),
            _ => None,
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            DIV_REGISTER => self.edge_checked(|timer| timer.divider = 0),
            TIMA_REGISTER => self.counter = data,
            TMA_REGISTER => self.reload = data,
            TAC_REGISTER => self.edge_checked(|timer| timer.control = TimerControl::from(data)),
            _ => return,
        }
        trace!("Timer write ${:04x} <- {:02x}", addr, data);
    }

    fn name(&self) -> &str {
        "timer"
    }
}

impl Clocked for Timer {
    #[inline]
    fn advance(&mut self, _tick: u64) {
        self.edge_checked(|timer| timer.divider = timer.divider.wrapping_add(DIVIDER_STEP));
    }
}
