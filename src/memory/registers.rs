use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InterruptFlags: u8 {
        const VBLANK    = 0b00001;
        const LCD_STAT  = 0b00010;
        const TIMER     = 0b00100;
        const SERIAL    = 0b01000;
        const JOYPAD    = 0b10000;
    }
}

bitflags! {
    /// TAC: input clock select in bits 0-1, enable in bit 2.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TimerControl: u8 {
        const CLOCK_SELECT = 0b011;
        const ENABLE       = 0b100;
    }
}

bitflags! {
    /// SC: bit 7 requests/reports a transfer, bit 0 selects the internal clock.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SerialControl: u8 {
        const INTERNAL_CLOCK = 0b0000_0001;
        const TRANSFER       = 0b1000_0000;
    }
}

bitflags! {
    /// P1 select lines. A line is selected when its bit is *clear*.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct JoypadSelect: u8 {
        const DIRECTIONS = 0b0001_0000;
        const ACTIONS    = 0b0010_0000;
    }
}

impl From<u8> for InterruptFlags {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

impl From<u8> for TimerControl {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

impl From<u8> for SerialControl {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

impl From<u8> for JoypadSelect {
    fn from(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}
