pub mod clock;
pub mod error;
pub mod gameboy;
pub mod joypad;
pub mod lr35902;
pub mod memory;
pub mod serial;
pub mod video;


pub use error::{AyyError, ErrorKind};
pub use gameboy::GameBoy;
