use crate::lr35902::irq::{Interrupt, InterruptSink};
use crate::memory::addressable::Addressable;
use crate::memory::registers::JoypadSelect;
use crate::memory::JOYPAD_REGISTER;
use log::trace;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    fn is_direction(&self) -> bool {
        matches!(self, Button::Right | Button::Left | Button::Up | Button::Down)
    }

    fn mask(&self) -> u8 {
        match self {
            Button::Right | Button::A => 0b0001,
            Button::Left | Button::B => 0b0010,
            Button::Up | Button::Select => 0b0100,
            Button::Down | Button::Start => 0b1000,
        }
    }
}

/// P1 (0xff00).
///
/// Pressed keys are kept as two active-high line bitmaps. The register only stores
/// the select bits; the reported nibble is derived on demand and is active-low, as
/// on hardware.
pub struct Joypad {
    directions: u8,
    actions: u8,
    select: JoypadSelect,
    irq: Rc<dyn InterruptSink>,
}

impl Joypad {
    pub fn new(irq: Rc<dyn InterruptSink>) -> Joypad {
        Joypad {
            directions: 0,
            actions: 0,
            select: JoypadSelect::all(),
            irq,
        }
    }

    pub fn press(&mut self, button: Button) {
        self.update_button(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.update_button(button, false);
    }

    pub fn update_button(&mut self, button: Button, pressed: bool) {
        let before = self.nibble();

        let line = match button.is_direction() {
            true => &mut self.directions,
            false => &mut self.actions,
        };
        match pressed {
            true => *line |= button.mask(),
            false => *line &= !button.mask(),
        }

        if self.nibble() < before {
            self.irq.request(Interrupt::Joypad);
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        let line = match button.is_direction() {
            true => self.directions,
            false => self.actions,
        };
        line & button.mask() != 0
    }

    /// Low nibble of P1. A bit reads 0 when a key on a selected line is held.
    fn nibble(&self) -> u8 {
        let mut pressed = 0;
        if !self.select.contains(JoypadSelect::DIRECTIONS) {
            pressed |= self.directions;
        }
        if !self.select.contains(JoypadSelect::ACTIONS) {
            pressed |= self.actions;
        }
        !pressed & 0x0f
    }
}

impl Addressable for Joypad {
    fn read(&self, addr: u16) -> Option<u8> {
        match addr {
            JOYPAD_REGISTER => Some(0b1100_0000 | self.select.bits() | self.nibble()),
            _ => None,
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        if addr == JOYPAD_REGISTER {
            trace!("Joypad select <- {:02x}", data);
            self.select = JoypadSelect::from(data);
        }
    }

    fn name(&self) -> &str {
        "joypad"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lr35902::irq::InterruptLatch;

    const SELECT_DIRECTIONS: u8 = 0b0010_0000;
    const SELECT_ACTIONS: u8 = 0b0001_0000;
    const SELECT_BOTH: u8 = 0b0000_0000;
    const SELECT_NONE: u8 = 0b0011_0000;

    fn joypad(select: u8) -> (Joypad, Rc<InterruptLatch>) {
        let latch = Rc::new(InterruptLatch::new());
        let mut joypad = Joypad::new(latch.clone());
        joypad.write(JOYPAD_REGISTER, select);
        (joypad, latch)
    }

    #[test]
    fn idle_register_reads_all_released() {
        let (joypad, _) = joypad(SELECT_NONE);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0xff));
        assert_eq!(joypad.read(0xff01), None);
    }

    #[test]
    fn pressing_a_selected_key_lowers_the_nibble_and_raises() {
        let (mut joypad, latch) = joypad(SELECT_DIRECTIONS);
        joypad.press(Button::Down);

        // 0b1111 -> 0b0111
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1110_0111));
        assert_eq!(latch.requests(), 1);

        // 0b0111 -> 0b0110: still numerically lower.
        joypad.press(Button::Right);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1110_0110));
        assert_eq!(latch.requests(), 2);
    }

    #[test]
    fn pressing_a_key_on_an_unselected_line_does_not_raise() {
        let (mut joypad, latch) = joypad(SELECT_DIRECTIONS);
        joypad.press(Button::Start);

        assert!(joypad.is_pressed(Button::Start));
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1110_1111));
        assert_eq!(latch.requests(), 0);
    }

    #[test]
    fn releasing_never_raises() {
        let (mut joypad, latch) = joypad(SELECT_ACTIONS);
        joypad.press(Button::A);
        assert_eq!(latch.requests(), 1);

        joypad.release(Button::A);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1101_1111));
        assert_eq!(latch.requests(), 1);
    }

    #[test]
    fn key_sharing_a_bit_with_a_held_key_does_not_raise() {
        let (mut joypad, latch) = joypad(SELECT_BOTH);
        joypad.press(Button::Left);
        assert_eq!(latch.requests(), 1);

        // B shares bit 1 with Left, so the nibble stays at 0b1101.
        joypad.press(Button::B);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1100_1101));
        assert_eq!(latch.requests(), 1);

        // Releasing Left keeps bit 1 low through B.
        joypad.release(Button::Left);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1100_1101));
    }

    #[test]
    fn pressing_a_higher_bit_while_a_lower_one_is_held_still_raises() {
        let (mut joypad, latch) = joypad(SELECT_BOTH);
        joypad.press(Button::A);
        joypad.press(Button::Up);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1100_1010));
        assert_eq!(latch.requests(), 2);
    }

    #[test]
    fn select_writes_never_raise() {
        let (mut joypad, latch) = joypad(SELECT_NONE);
        joypad.press(Button::Select);
        assert_eq!(latch.requests(), 0);

        joypad.write(JOYPAD_REGISTER, SELECT_ACTIONS);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1101_1011));
        assert_eq!(latch.requests(), 0);
    }

    #[test]
    fn only_select_bits_are_stored() {
        let (mut joypad, _) = joypad(0b1100_1010);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1100_1111));
        joypad.press(Button::Up);
        assert_eq!(joypad.read(JOYPAD_REGISTER), Some(0b1100_1011));
    }
}
