pub mod addressable;
pub mod boot;
pub mod bus;
pub mod mapper;
pub mod registers;
pub mod storage;
pub mod window;

pub const ROM_START: u16 = 0x0000;
pub const ROM_END: u16 = 0x8000;
pub const VRAM_START: u16 = 0x8000;
pub const VRAM_END: u16 = 0xa000;
pub const WORK_RAM_START: u16 = 0xc000;
pub const WORK_RAM_END: u16 = 0xe000;
pub const OAM_START: u16 = 0xfe00;
pub const OAM_END: u16 = 0xfea0;
pub const HIGH_RAM_START: u16 = 0xff80;
pub const HIGH_RAM_END: u16 = 0xffff;

pub const BOOTROM_START: u16 = 0x0000;
pub const BOOTROM_END: u16 = 0x0100;

pub const JOYPAD_REGISTER: u16 = 0xff00;
pub const SERIAL_DATA_REGISTER: u16 = 0xff01;
pub const SERIAL_CONTROL_REGISTER: u16 = 0xff02;
pub const DIV_REGISTER: u16 = 0xff04;
pub const TIMA_REGISTER: u16 = 0xff05;
pub const TMA_REGISTER: u16 = 0xff06;
pub const TAC_REGISTER: u16 = 0xff07;
pub const INTERRUPT_FLAGS_REGISTER: u16 = 0xff0f;
pub const BOOTROM_MAPPER_REGISTER: u16 = 0xff50;
pub const INTERRUPT_ENABLE_REGISTER: u16 = 0xffff;

/// Value observed on the bus when no component claims an address.
pub const OPEN_BUS: u8 = 0xff;
