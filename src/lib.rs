//! CHIP-8 virtual machine core.
//!
//! The crate owns machine state and instruction semantics only. Showing the
//! frame, reading the keyboard, sounding the tone and reading ROM files are
//! left to the caller, which talks to the machine through [`chip::Chip`]:
//!
//! * `load_program` to copy a ROM image to 0x200,
//! * `set_keys` before each step,
//! * [`clock::Clock`] to step instructions and timers,
//! * `needs_redraw` / `get_frame` / `ack_redraw` to render.
pub mod arch;
pub mod chip;
pub mod clock;
pub mod disasm;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod instr;
pub mod keypad;
pub mod profile;
mod ram;
mod regs;
mod stack;
pub mod util;

pub mod prelude {
    pub use super::{
        chip::Chip,
        clock::{Clock, Tick},
        disasm::Disassembler,
        error::{Fault, Result},
        framebuffer::Frame,
        instr::Op,
        profile::Profile,
    };
}
