use crate::clock::Clock;
use crate::joypad::{Button, Joypad};
use crate::lr35902::irq::{InterruptLatch, InterruptRegisters};
use crate::lr35902::timer::Timer;
use crate::memory::addressable::{shared, Shared};
use crate::memory::boot::{BootImage, BootOverlay};
use crate::memory::bus::Bus;
use crate::memory::mapper::Mapper;
use crate::memory::storage::ByteArray;
use crate::memory::window::MemoryWindow;
use crate::memory::*;
use crate::serial::link::LinkCable;
use crate::serial::Serial;
use crate::video::sprite::OamView;
use crate::video::tile::TileData;
use log::info;
use std::cell::Ref;
use std::rc::Rc;

type Ram = MemoryWindow<ByteArray>;

fn ram(name: &'static str, start: u16, end: u16) -> Shared<Ram> {
    shared(MemoryWindow::new(name, ByteArray::new((end - start) as usize), start, end))
}

/// Every peripheral wired to one bus and one clock.
pub struct GameBoy {
    bus: Bus,
    clock: Clock,
    interrupts: Rc<InterruptLatch>,
    cartridge: Shared<BootOverlay>,
    vram: Shared<Ram>,
    oam: Shared<Ram>,
    joypad: Shared<Joypad>,
    serial: Shared<Serial>,
    timer: Shared<Timer>,
}

impl GameBoy {
    /// Without a boot image the machine starts as if the boot program already ran.
    pub fn new(cartridge: Box<dyn Mapper>, boot: Option<BootImage>) -> GameBoy {
        info!("Building machine for {} cartridge", cartridge.name());

        let interrupts = Rc::new(InterruptLatch::new());
        let cartridge = shared(match boot {
            Some(boot) => BootOverlay::new(boot, cartridge),
            None => BootOverlay::skipped(cartridge),
        });
        let vram = ram("vram", VRAM_START, VRAM_END);
        let wram = ram("wram", WORK_RAM_START, WORK_RAM_END);
        let oam = ram("oam", OAM_START, OAM_END);
        let hram = ram("hram", HIGH_RAM_START, HIGH_RAM_END);
        let timer = shared(Timer::new(interrupts.clone()));
        let joypad = shared(Joypad::new(interrupts.clone()));
        let serial = shared(Serial::new(interrupts.clone()));

        let mut bus = Bus::new();
        bus.attach(cartridge.clone());
        bus.attach(vram.clone());
        bus.attach(wram);
        bus.attach(oam.clone());
        bus.attach(hram);
        bus.attach(joypad.clone());
        bus.attach(serial.clone());
        bus.attach(timer.clone());
        bus.attach(shared(InterruptRegisters::new(interrupts.clone())));

        let mut clock = Clock::new();
        clock.register(timer.clone());
        clock.register(serial.clone());

        GameBoy {
            bus,
            clock,
            interrupts,
            cartridge,
            vram,
            oam,
            joypad,
            serial,
            timer,
        }
    }

    pub fn tick(&mut self) {
        self.clock.tick();
    }

    pub fn run(&mut self, ticks: u64) {
        self.clock.run(ticks);
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bus.read(addr)
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        self.bus.write(addr, data);
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn interrupts(&self) -> &InterruptLatch {
        &self.interrupts
    }

    pub fn press(&mut self, button: Button) {
        self.joypad.borrow_mut().press(button);
    }

    pub fn release(&mut self, button: Button) {
        self.joypad.borrow_mut().release(button);
    }

    /// Name and current (ROM, RAM) banks of the inserted cartridge.
    pub fn cartridge_banks(&self) -> (String, u16, u8) {
        let overlay = self.cartridge.borrow();
        let cartridge = overlay.cartridge();
        (cartridge.name(), cartridge.current_rom_bank(), cartridge.current_ram_bank())
    }

    pub fn boot_active(&self) -> bool {
        self.cartridge.borrow().is_active()
    }

    pub fn divider(&self) -> u16 {
        self.timer.borrow().divider()
    }

    pub fn connect_link(&mut self, link: LinkCable) {
        self.serial.borrow_mut().connect(link);
    }

    /// Bytes the serial port has shifted out since the last call.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.serial.borrow_mut().take_output()
    }

    /// Borrows OAM for an [`OamView`]; no bus access may happen while it is held.
    pub fn oam(&self) -> Ref<'_, Ram> {
        self.oam.borrow()
    }

    /// Borrows VRAM for a [`TileData`] view; no bus access may happen while it is held.
    pub fn vram(&self) -> Ref<'_, Ram> {
        self.vram.borrow()
    }

    pub fn sprites_on_line(&self, scanline: usize, height: usize) -> Vec<usize> {
        OamView::new(&*self.oam()).sprites_on_line(scanline, height)
    }

    pub fn tile_row(&self, tile_index: u8, row: u8, unsigned_mode: bool) -> (u8, u8) {
        TileData::new(&*self.vram()).row(tile_index, row, unsigned_mode)
    }
}
