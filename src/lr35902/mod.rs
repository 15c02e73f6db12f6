pub mod irq;
pub mod timer;

pub const T_CYCLES_PER_SECOND: usize = 4_194_304;
/// One clock tick is one machine cycle.
pub const TICKS_PER_SECOND: usize = T_CYCLES_PER_SECOND / 4;
