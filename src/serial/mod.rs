pub mod link;

use crate::clock::Clocked;
use crate::lr35902::irq::{Interrupt, InterruptSink};
use crate::memory::addressable::Addressable;
use crate::memory::registers::SerialControl;
use crate::memory::{SERIAL_CONTROL_REGISTER, SERIAL_DATA_REGISTER};
use link::LinkCable;
use log::{debug, info, trace};
use std::rc::Rc;

/// The link is sampled once every this many ticks.
pub const LINK_POLL_INTERVAL: u64 = 8;

/// Polls an external-clock transfer waits for the partner before shifting in
/// the idle line.
pub const EXTERNAL_CLOCK_TIMEOUT_POLLS: u32 = 1024;

/// What an unconnected or silent line shifts in.
const IDLE_LINE: u8 = 0xff;

/// SB/SC.
///
/// A transfer with the internal clock completes at the next link poll: SB is
/// published as the latest sent byte and replaced by the latest received byte.
/// With the external clock the port waits until the partner delivers a fresh byte
/// and answers with SB. Without a cable the transfer completes at the next poll,
/// and a silent partner is given up on after [`EXTERNAL_CLOCK_TIMEOUT_POLLS`];
/// both cases shift in the idle line. Completion clears SC bit 7 and requests SERIAL.
pub struct Serial {
    data: u8,
    control: SerialControl,
    received: u8,
    fresh: bool,
    waited: u32,
    link: Option<LinkCable>,
    output: Vec<u8>,
    irq: Rc<dyn InterruptSink>,
}

impl Serial {
    pub fn new(irq: Rc<dyn InterruptSink>) -> Serial {
        Serial {
            data: 0,
            control: SerialControl::empty(),
            received: IDLE_LINE,
            fresh: false,
            waited: 0,
            link: None,
            output: Vec::new(),
            irq,
        }
    }

    pub fn connect(&mut self, link: LinkCable) {
        info!("Serial port connected to link cable");
        self.link = Some(link);
    }

    pub fn disconnect(&mut self) -> Option<LinkCable> {
        self.received = IDLE_LINE;
        self.fresh = false;
        self.link.take()
    }

    pub fn is_transferring(&self) -> bool {
        self.control.contains(SerialControl::TRANSFER)
    }

    /// Every byte shifted out so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    fn poll_link(&mut self) {
        if let Some(byte) = self.link.as_mut().and_then(|link| link.poll()) {
            trace!("Serial received {:02x}", byte);
            self.received = byte;
            self.fresh = true;
        }
    }

    fn complete_transfer(&mut self) {
        let sent = self.data;
        if let Some(link) = &self.link {
            link.send(sent);
        }
        self.output.push(sent);
        self.data = self.received;
        self.fresh = false;
        self.waited = 0;
        self.control.remove(SerialControl::TRANSFER);

        debug!("Serial transfer complete: sent {:02x}, received {:02x}", sent, self.data);
        self.irq.request(Interrupt::Serial);
    }
}

impl Addressable for Serial {
    fn read(&self, addr: u16) -> Option<u8> {
        match addr {
            SERIAL_DATA_REGISTER => Some(self.data),
            SERIAL_CONTROL_REGISTER => Some(self.control.bits() | 0b0111_1110),
            _ => None,
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            SERIAL_DATA_REGISTER => self.data = data,
            SERIAL_CONTROL_REGISTER => {
                self.control = SerialControl::from(data);
                self.waited = 0;
                if self.is_transferring() {
                    trace!("Serial transfer requested with SB={:02x}", self.data);
                }
            }
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "serial"
    }
}

impl Clocked for Serial {
    fn advance(&mut self, tick: u64) {
        if tick % LINK_POLL_INTERVAL != 0 {
            return;
        }

        self.poll_link();

        if !self.is_transferring() {
            return;
        }
        if self.control.contains(SerialControl::INTERNAL_CLOCK) || self.fresh {
            self.complete_transfer();
            return;
        }

        self.waited += 1;
        if self.link.is_none() || self.waited >= EXTERNAL_CLOCK_TIMEOUT_POLLS {
            debug!("Serial partner silent, shifting in the idle line");
            self.received = IDLE_LINE;
            self.complete_transfer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lr35902::irq::InterruptLatch;
    use crate::memory::registers::InterruptFlags;
    use std::time::Duration;

    fn serial() -> (Serial, Rc<InterruptLatch>) {
        let latch = Rc::new(InterruptLatch::new());
        (Serial::new(latch.clone()), latch)
    }

    fn run(serial: &mut Serial, from: u64, ticks: u64) {
        for tick in from..from + ticks {
            serial.advance(tick);
        }
    }

    #[test]
    fn internal_clock_transfer_without_partner_reads_idle_line() {
        let (mut serial, latch) = serial();
        serial.write(SERIAL_DATA_REGISTER, 0x41);
        serial.write(SERIAL_CONTROL_REGISTER, 0x81);
        assert_eq!(serial.read(SERIAL_CONTROL_REGISTER), Some(0xff));

        serial.advance(0);

        assert_eq!(serial.read(SERIAL_DATA_REGISTER), Some(0xff));
        assert_eq!(serial.read(SERIAL_CONTROL_REGISTER), Some(0x7f));
        assert_eq!(latch.pending(), InterruptFlags::SERIAL);
        assert_eq!(serial.output(), &[0x41]);
    }

    #[test]
    fn transfers_complete_only_on_poll_ticks() {
        let (mut serial, latch) = serial();
        serial.write(SERIAL_DATA_REGISTER, 0x10);
        serial.write(SERIAL_CONTROL_REGISTER, 0x81);

        run(&mut serial, 1, LINK_POLL_INTERVAL - 1);
        assert!(serial.is_transferring());
        assert_eq!(latch.requests(), 0);

        serial.advance(LINK_POLL_INTERVAL);
        assert!(!serial.is_transferring());
        assert_eq!(latch.requests(), 1);
    }

    #[test]
    fn external_clock_without_cable_completes_on_next_poll() {
        let (mut serial, latch) = serial();
        serial.write(SERIAL_DATA_REGISTER, 0x42);
        serial.write(SERIAL_CONTROL_REGISTER, 0x80);

        run(&mut serial, 1, LINK_POLL_INTERVAL - 1);
        assert!(serial.is_transferring());

        serial.advance(LINK_POLL_INTERVAL);
        assert!(!serial.is_transferring());
        assert_eq!(serial.read(SERIAL_DATA_REGISTER), Some(0xff));
        assert_eq!(latch.pending(), InterruptFlags::SERIAL);
        assert_eq!(serial.output(), &[0x42]);
    }

    #[test]
    fn external_clock_gives_up_on_a_silent_partner() {
        let (cable, _partner) = LinkCable::pair().unwrap();
        let (mut serial, latch) = serial();
        serial.connect(cable);
        serial.write(SERIAL_DATA_REGISTER, 0x42);
        serial.write(SERIAL_CONTROL_REGISTER, 0x80);

        let polls = EXTERNAL_CLOCK_TIMEOUT_POLLS as u64;
        run(&mut serial, 0, (polls - 1) * LINK_POLL_INTERVAL);
        assert!(serial.is_transferring());
        assert_eq!(latch.requests(), 0);

        run(&mut serial, (polls - 1) * LINK_POLL_INTERVAL, LINK_POLL_INTERVAL);
        assert!(!serial.is_transferring());
        assert_eq!(serial.read(SERIAL_DATA_REGISTER), Some(0xff));
        assert_eq!(latch.requests(), 1);
    }

    #[test]
    fn disconnect_returns_the_cable_and_idles_the_line() {
        let (cable, _partner) = LinkCable::pair().unwrap();
        let (mut serial, _) = serial();
        serial.connect(cable);
        serial.received = 0x12;

        assert!(serial.disconnect().is_some());
        assert!(serial.disconnect().is_none());

        serial.write(SERIAL_DATA_REGISTER, 0x01);
        serial.write(SERIAL_CONTROL_REGISTER, 0x81);
        serial.advance(0);
        assert_eq!(serial.read(SERIAL_DATA_REGISTER), Some(0xff));
    }

    #[test]
    fn output_collects_every_sent_byte() {
        let (mut serial, _) = serial();
        for byte in b"ok" {
            serial.write(SERIAL_DATA_REGISTER, *byte);
            serial.write(SERIAL_CONTROL_REGISTER, 0x81);
            serial.advance(0);
        }
        assert_eq!(serial.take_output(), b"ok".to_vec());
        assert!(serial.output().is_empty());
    }

    #[test]
    fn two_ports_exchange_bytes_over_a_cable() {
        let (left_cable, right_cable) = LinkCable::pair().unwrap();
        let (mut master, master_irq) = serial();
        let (mut slave, slave_irq) = serial();
        master.connect(left_cable);
        slave.connect(right_cable);

        slave.write(SERIAL_DATA_REGISTER, 0x99);
        slave.write(SERIAL_CONTROL_REGISTER, 0x80);
        master.write(SERIAL_DATA_REGISTER, 0x42);
        master.write(SERIAL_CONTROL_REGISTER, 0x81);

        master.advance(0);
        assert!(!master.is_transferring());
        assert_eq!(master_irq.requests(), 1);

        let mut tick = 0;
        while slave.is_transferring() && tick < 1000 * LINK_POLL_INTERVAL {
            slave.advance(tick);
            tick += LINK_POLL_INTERVAL;
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(!slave.is_transferring(), "slave never saw the master's byte");
        assert_eq!(slave.read(SERIAL_DATA_REGISTER), Some(0x42));
        assert_eq!(slave_irq.requests(), 1);

        // The slave's answer becomes the master's latest received byte.
        let mut tick = 0;
        while !master.fresh && tick < 1000 * LINK_POLL_INTERVAL {
            master.advance(tick);
            tick += LINK_POLL_INTERVAL;
            std::thread::sleep(Duration::from_millis(1));
        }
        master.write(SERIAL_CONTROL_REGISTER, 0x81);
        master.advance(tick);
        assert_eq!(master.read(SERIAL_DATA_REGISTER), Some(0x99));
    }
}
