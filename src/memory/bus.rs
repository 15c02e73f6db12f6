use crate::error::{AyyError, InvalidAddressSnafu, InvalidValueSnafu};
use crate::memory::addressable::{Addressable, Shared};
use crate::memory::OPEN_BUS;
use log::{error, trace};
use snafu::ensure;
use std::cell::RefCell;
use std::rc::Rc;

/// The shared address space.
///
/// Components are queried in attachment order. The first component that maps an
/// address answers the read; writes are broadcast to everyone and each component
/// ignores addresses it does not map.
#[derive(Default)]
pub struct Bus {
    components: Vec<Rc<RefCell<dyn Addressable>>>,
}

impl Bus {
    pub fn new() -> Bus {
        Bus { components: Vec::new() }
    }

    pub fn attach<T: Addressable + 'static>(&mut self, component: Shared<T>) {
        self.components.push(component);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn read(&self, addr: u16) -> u8 {
        let mut value = None;

        for component in &self.components {
            let component = component.borrow();
            if let Some(data) = component.read(addr) {
                match value {
                    None => value = Some(data),
                    Some(_) => error!("Bus conflict at ${:04x}: {} also responded", addr, component.name()),
                }
            }
        }

        value.unwrap_or(OPEN_BUS)
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        trace!("Bus write ${:04x} <- {:02x}", addr, data);
        for component in &self.components {
            component.borrow_mut().write(addr, data);
        }
    }

    /// Range-checked variant of [`Bus::read`] for callers holding wide integers.
    pub fn try_read(&self, addr: u32) -> Result<u8, AyyError> {
        Ok(self.read(Self::check_address(addr)?))
    }

    /// Range-checked variant of [`Bus::write`] for callers holding wide integers.
    pub fn try_write(&mut self, addr: u32, data: u32) -> Result<(), AyyError> {
        let addr = Self::check_address(addr)?;
        ensure!(data <= u8::MAX as u32, InvalidValueSnafu { value: data });
        self.write(addr, data as u8);
        Ok(())
    }

    pub fn read16(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn write16(&mut self, addr: u16, data: u16) {
        let [lo, hi] = data.to_le_bytes();
        self.write(addr, lo);
        self.write(addr.wrapping_add(1), hi);
    }

    /// Names of all components that map `addr`. A correctly assembled machine
    /// never has more than one.
    pub fn responders(&self, addr: u16) -> Vec<String> {
        self.components
            .iter()
            .map(|component| component.borrow())
            .filter(|component| component.read(addr).is_some())
            .map(|component| component.name().to_string())
            .collect()
    }

    fn check_address(addr: u32) -> Result<u16, AyyError> {
        ensure!(addr <= u16::MAX as u32, InvalidAddressSnafu { address: addr });
        Ok(addr as u16)
    }
}
