//! Disassembler.
use std::fmt::{self, Write as FmtWrite};

use crate::arch;
use crate::instr::Op;

pub struct Disassembler<'a> {
    bytecode: &'a [u8],
    origin: u16,
}

impl<'a> Disassembler<'a> {
    /// Listing of a program image as it would be loaded at 0x200.
    pub fn new(bytecode: &'a [u8]) -> Self {
        Self::with_origin(bytecode, arch::PROGRAM_START)
    }

    pub fn with_origin(bytecode: &'a [u8], origin: u16) -> Self {
        Self { bytecode, origin }
    }

    /// Write one line per instruction word.
    ///
    /// Sprite data is interleaved with code in most programs, so words that
    /// don't decode are listed as `???` rather than stopping the listing.
    pub fn write_listing<W: FmtWrite>(&self, w: &mut W) -> fmt::Result {
        for (n, chunk) in self.bytecode.chunks(2).enumerate() {
            let addr = self.origin as usize + n * 2;
            match *chunk {
                [hi, lo] => {
                    let word = u16::from_be_bytes([hi, lo]);
                    match Op::decode(word) {
                        Ok(op) => writeln!(w, "{:04X}: {:04X}  {}", addr, word, op)?,
                        Err(_) => writeln!(w, "{:04X}: {:04X}  ???", addr, word)?,
                    }
                }
                [byte] => writeln!(w, "{:04X}: {:02X}    DB {:#04x}", addr, byte, byte)?,
                _ => unreachable!("chunks(2) yields one or two bytes"),
            }
        }
        Ok(())
    }

    pub fn listing(&self) -> String {
        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_listing(&mut s);
        s
    }
}
