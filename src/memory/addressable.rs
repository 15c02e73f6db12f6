use std::cell::RefCell;
use std::rc::Rc;

/// Something that can be placed on the address bus.
///
/// `read` returns `None` for addresses the component does not map. Reads must not
/// change observable state; writes outside the component's range are ignored.
pub trait Addressable {
    fn read(&self, addr: u16) -> Option<u8>;
    fn write(&mut self, addr: u16, data: u8);

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Peripherals are shared between the bus, the clock and the machine that owns them.
pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
