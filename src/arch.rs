//! Architectural constants of the machine.

pub const RAMSIZE: u32 = 0x1000;
pub const ADDR_MASK: u16 = 0x0FFF;

pub const NVREGS: u32 = 0x10;
/// Register used as carry, borrow and collision flag.
pub const VF: u8 = 0xF;

/// Levels of subroutine nesting.
pub const STACKSIZE: u32 = 16;

pub const DISPLAY_WIDTH: u32 = 64;
pub const DISPLAY_HEIGHT: u32 = 32;
pub const DISPLAY_SIZE: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT) as usize;

pub const NKEYS: usize = 16;

/// Hexadecimal digit glyphs, 0x0 to 0xF.
pub const NSPRITES: u32 = 0x10;
pub const SPRITE_HEIGHT: u16 = 5;
pub const FONT_ADDR: u16 = 0x050;

/// Programs are loaded here, the lower space historically held the interpreter.
pub const PROGRAM_START: u16 = 0x200;

/// Delay and sound timers count down at this rate.
pub const TIMER_HZ: u32 = 60;
pub const DEFAULT_CPU_HZ: u32 = 500;
