#[cfg(feature = "sdl")]
mod ui;

use std::error::Error;
use std::fs;
use std::time::Instant;

use log::{info, warn};

use chip8vm::prelude::{Chip, Clock, Disassembler, Fault, Profile};

struct Options {
    rom: Vec<u8>,
    profile: Profile,
    hz: u32,
    seed: Option<u64>,
    fast: bool,
    headless: bool,
    steps: u32,
    scale: u32,
}

fn main() -> Result<(), Box<dyn Error>> {

    env_logger::init();

    let args = clap::Command::new("CHIP-8 virtual machine")
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .arg(clap::Arg::new("rom")
             .help("ROM file name.")
             .value_name("ROM")
             .required(true)
             .index(1))
        .arg(clap::Arg::new("profile")
             .help("Behaviour of the shift and block load/store opcodes.")
             .long("profile")
             .short('p')
             .value_parser(["default", "original", "modern"])
             .default_value("default"))
        .arg(clap::Arg::new("hz")
             .help("Instructions per second.")
             .long("hz")
             .value_parser(clap::value_parser!(u32).range(1..))
             .default_value("500"))
        .arg(clap::Arg::new("seed")
             .help("Seed for the RND instruction.")
             .long("seed")
             .value_parser(clap::value_parser!(u64)))
        .arg(clap::Arg::new("fast")
             .help("Run emulation as fast as possible.")
             .long("fast")
             .short('f')
             .action(clap::ArgAction::SetTrue))
        .arg(clap::Arg::new("disasm")
             .help("Print a listing of the ROM and exit.")
             .long("disasm")
             .short('d')
             .action(clap::ArgAction::SetTrue))
        .arg(clap::Arg::new("headless")
             .help("Run without a window and print the final screen.")
             .long("headless")
             .action(clap::ArgAction::SetTrue))
        .arg(clap::Arg::new("steps")
             .help("Instructions to run in headless mode.")
             .long("steps")
             .value_parser(clap::value_parser!(u32))
             .default_value("1000"))
        .arg(clap::Arg::new("scale")
             .help("Window pixels per screen pixel.")
             .long("scale")
             .value_parser(clap::value_parser!(u32).range(1..64))
             .default_value("14"))
        .get_matches();

    let rom_name = args.get_one::<String>("rom").expect("required by clap");
    let rom = fs::read(rom_name)?;

    if flag(&args, "disasm") {
        print!("{}", Disassembler::new(&rom).listing());
        return Ok(());
    }

    let profile = match args.get_one::<String>("profile").map(String::as_str) {
        Some("original") => Profile::original(),
        Some("modern") => Profile::modern(),
        _ => Profile::default(),
    };

    let options = Options {
        rom,
        profile,
        hz: *args.get_one::<u32>("hz").expect("has default"),
        seed: args.get_one::<u64>("seed").copied(),
        fast: flag(&args, "fast"),
        headless: flag(&args, "headless"),
        steps: *args.get_one::<u32>("steps").expect("has default"),
        scale: *args.get_one::<u32>("scale").expect("has default"),
    };
    info!("rom={} profile={:?} hz={} fast={} scale={}", rom_name, options.profile, options.hz, options.fast, options.scale);

    if options.headless {
        run_headless(&options)
    } else {
        run_window(&options)
    }
}

#[cfg(not(feature = "sdl"))]
fn run_window(options: &Options) -> Result<(), Box<dyn Error>> {
    warn!("built without the `sdl` feature, running headless");
    run_headless(options)
}

fn flag(args: &clap::ArgMatches, name: &str) -> bool {
    args.get_one::<bool>(name).copied().unwrap_or(false)
}

fn machine(options: &Options) -> Result<Chip, Fault> {
    let mut chip = match options.seed {
        Some(seed) => Chip::new_seed(seed, options.profile),
        None => Chip::new(options.profile),
    };
    chip.load_program(&options.rom)?;
    Ok(chip)
}

fn report(cycles: u64, start: Instant) {
    let duration_ms = start.elapsed().as_millis().max(1);
    let cps: f64 = 1000.0 * cycles as f64 / duration_ms as f64;

    info!("Execution time: {} ms", duration_ms);
    info!("Cycles: {}", cycles);
    info!("Cycles per second: {:.0}", cps);
}

/// Run a fixed number of instructions, then print the screen as text.
fn run_headless(options: &Options) -> Result<(), Box<dyn Error>> {
    let mut chip = machine(options)?;
    let mut clock = Clock::new(options.hz);

    let start = Instant::now();
    let result = clock.run_steps(&mut chip, options.steps);

    print!("{}", chip.framebuffer().to_ascii());
    println!("{}", chip.dump_regs());
    if chip.is_awaiting_key() {
        warn!("stopped while waiting for a key press");
    }

    let tick = result?;
    report(tick.cycles, start);
    Ok(())
}

#[cfg(feature = "sdl")]
fn run_window(options: &Options) -> Result<(), Box<dyn Error>> {
    use std::thread::sleep;
    use std::time::Duration;

    use chip8vm::arch;

    use crate::ui::Event;

    // Instructions per loop iteration in fast mode.
    const FAST_BATCH: u32 = 1000;

    let mut chip = machine(options)?;
    let mut clock = Clock::new(options.hz);
    let mut ui = ui::Ui::new("CHIP-8", options.scale)?;

    // Key buffer handed to the machine wholesale before each batch.
    let mut keys = [false; arch::NKEYS];

    let start = Instant::now();
    let mut last = start;
    let mut cycles: u64 = 0;
    let mut running = true;

    while running {
        for e in ui.events.poll_iter() {
            match e {
                Event::Quit => { info!("Quit!"); running = false },
                Event::KeyPress(key) => keys[key as usize] = true,
                Event::KeyUnpress(key) => keys[key as usize] = false,
            }
        }
        chip.set_keys(keys);

        let now = Instant::now();
        let tick = if options.fast {
            clock.run_steps(&mut chip, FAST_BATCH)
        } else {
            clock.run_for(&mut chip, now - last)
        };
        last = now;

        match tick {
            Ok(tick) => cycles += tick.cycles,
            Err(fault) => {
                println!("{}", chip.dump_regs());
                return Err(fault.into());
            },
        }

        ui.audio.set(chip.is_sound_on());

        if chip.needs_redraw() {
            ui.display.present_frame(chip.get_frame())?;
            chip.ack_redraw();
        }

        if !options.fast {
            sleep(Duration::from_millis(1));
        }
    }

    report(cycles, start);
    Ok(())
}
