use crate::memory::addressable::Shared;
use std::cell::RefCell;
use std::rc::Rc;

/// A peripheral that advances with the shared clock.
pub trait Clocked {
    /// Called exactly once per global tick. `tick` is the index of the tick being
    /// executed and is only meant for sub-sampling ("act every Nth tick").
    fn advance(&mut self, tick: u64);
}

/// Drives every registered peripheral in registration order, one tick at a time.
#[derive(Default)]
pub struct Clock {
    peripherals: Vec<Rc<RefCell<dyn Clocked>>>,
    ticks: u64,
}

impl Clock {
    pub fn new() -> Clock {
        Clock::default()
    }

    pub fn register<T: Clocked + 'static>(&mut self, peripheral: Shared<T>) {
        self.peripherals.push(peripheral);
    }

    /// Number of ticks executed so far; also the index of the next tick.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self) {
        for peripheral in &self.peripherals {
            peripheral.borrow_mut().advance(self.ticks);
        }
        self.ticks += 1;
    }

    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::addressable::shared;

    struct Recorder {
        id: u8,
        log: Rc<RefCell<Vec<(u8, u64)>>>,
    }

    impl Clocked for Recorder {
        fn advance(&mut self, tick: u64) {
            self.log.borrow_mut().push((self.id, tick));
        }
    }

    #[test]
    fn peripherals_advance_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut clock = Clock::new();
        for id in [2, 0, 1] {
            clock.register(shared(Recorder { id, log: log.clone() }));
        }

        clock.run(2);
        clock.tick();

        assert_eq!(clock.ticks(), 3);
        assert_eq!(
            *log.borrow(),
            vec![(2, 0), (0, 0), (1, 0), (2, 1), (0, 1), (1, 1), (2, 2), (0, 2), (1, 2)]
        );
    }
}
