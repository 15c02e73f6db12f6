use ayycore::error::AyyError;
use ayycore::lr35902::irq::Interrupt;
use ayycore::memory::boot::BootImage;
use ayycore::memory::mapper;
use ayycore::serial::link::LinkCable;
use ayycore::GameBoy;
use clap::Parser;
use log::{error, info, LevelFilter, SetLoggerError};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ayycore", about = "Runs the Game Boy peripheral core against a cartridge")]
struct Args {
    /// Cartridge image (.gb or .zip)
    rom: PathBuf,

    /// Boot image to map over $0000-$00ff; skipped when absent
    #[arg(short, long)]
    boot: Option<PathBuf>,

    /// Number of machine cycles to run
    #[arg(short, long, default_value_t = ayycore::lr35902::TICKS_PER_SECOND as u64)]
    ticks: u64,

    /// Wait for a link cable partner on this address
    #[arg(long, conflicts_with = "connect")]
    listen: Option<String>,

    /// Connect the link cable to this address
    #[arg(long)]
    connect: Option<String>,

    #[arg(short, long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn setup_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

fn run(args: Args) -> Result<(), AyyError> {
    let cartridge = mapper::load(&args.rom)?;
    let boot = args.boot.as_ref().map(BootImage::load).transpose()?;
    let mut gb = GameBoy::new(cartridge, boot);

    if let Some(addr) = &args.listen {
        gb.connect_link(LinkCable::listen(addr)?);
    } else if let Some(addr) = &args.connect {
        gb.connect_link(LinkCable::connect(addr)?);
    }

    gb.run(args.ticks);
    info!("Ran {} ticks, DIV={:04x}", gb.ticks(), gb.divider());

    let (mapper, rom_bank, ram_bank) = gb.cartridge_banks();
    info!("Cartridge {}: ROM bank {}, RAM bank {}", mapper, rom_bank, ram_bank);

    let mut pending = gb.interrupts().pending();
    while let Some(irq) = Interrupt::from_flags(pending) {
        info!("Pending interrupt: {} (vector ${:04x})", irq, irq.to_address());
        pending.remove(irq.flag());
    }

    let output = gb.take_serial_output();
    if !output.is_empty() {
        println!("{}", String::from_utf8_lossy(&output));
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = setup_logger(args.log_level) {
        eprintln!("Failed to set up logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        error!("{} ({:?})", e, e.kind());
        std::process::exit(1);
    }
}
