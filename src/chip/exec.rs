//! Opcode semantics.
use log::trace;

use super::Chip;
use crate::arch;
use crate::error::{Fault, Result};
use crate::font;
use crate::instr::Op;

macro_rules! trace_instr {
    ($self:ident, $fmt: expr $(, $($arg:tt)* )? ) =>
    {
        trace!(concat!("[PC:0x{:04x}] ", $fmt), $self.regs.pc, $( $( $arg )* )? );
    };
}

/// Tallest sprite DXYN can draw.
const MAX_SPRITE_ROWS: usize = 0xF;

impl Chip {
    /// Apply one decoded operation and move PC to the next instruction.
    ///
    /// On a stack fault nothing has been modified.
    pub(crate) fn execute(&mut self, op: Op) -> Result<()> {
        trace_instr!(self, "{}", op);

        let pc = self.regs.pc;
        let next = pc.wrapping_add(2);
        let skip = pc.wrapping_add(4);
        let skip_if = |cond: bool| if cond { skip } else { next };

        self.regs.pc = match op {
            Op::Cls => {
                self.framebuffer.clear();
                self.redraw = true;
                next
            },

            // The call pushed the address of the following instruction.
            Op::Ret => self.stack.pop().map_err(|_| Fault::StackUnderflow { pc })?,

            Op::Jp { nnn } => nnn,

            Op::Call { nnn } => {
                self.stack.push(next).map_err(|_| Fault::StackOverflow { pc })?;
                nnn
            },

            Op::SeImm { x, nn } => skip_if(self.regs.vx[x] == nn),

            Op::SneImm { x, nn } => skip_if(self.regs.vx[x] != nn),

            Op::SeReg { x, y } => skip_if(self.regs.vx[x] == self.regs.vx[y]),

            Op::SneReg { x, y } => skip_if(self.regs.vx[x] != self.regs.vx[y]),

            Op::LdImm { x, nn } => {
                self.regs.vx[x] = nn;
                next
            },

            Op::AddImm { x, nn } => {
                // No carry out.
                self.regs.vx[x] = self.regs.vx[x].wrapping_add(nn);
                next
            },

            Op::LdReg { x, y } => {
                self.regs.vx[x] = self.regs.vx[y];
                next
            },

            Op::Or { x, y } => {
                self.regs.vx[x] |= self.regs.vx[y];
                next
            },

            Op::And { x, y } => {
                self.regs.vx[x] &= self.regs.vx[y];
                next
            },

            Op::Xor { x, y } => {
                self.regs.vx[x] ^= self.regs.vx[y];
                next
            },

            Op::AddReg { x, y } => {
                let sum = self.regs.vx[x] as u16 + self.regs.vx[y] as u16;
                self.regs.write_vx(x, sum);
                // VF := carry
                self.regs.set_flag(sum > 0xFF);
                next
            },

            Op::Sub { x, y } => {
                let (vx, vy) = (self.regs.vx[x], self.regs.vx[y]);
                self.regs.write_vx(x, (vx as u16).wrapping_sub(vy as u16));
                // VF := not borrow
                self.regs.set_flag(vx >= vy);
                next
            },

            Op::Subn { x, y } => {
                let (vx, vy) = (self.regs.vx[x], self.regs.vx[y]);
                self.regs.write_vx(x, (vy as u16).wrapping_sub(vx as u16));
                self.regs.set_flag(vy >= vx);
                next
            },

            Op::Shr { x, y } => {
                let src = if self.profile.shift_uses_vy { self.regs.vx[y] } else { self.regs.vx[x] };
                self.regs.vx[x] = src >> 1;
                self.regs.set_flag(src & 0x01 != 0);
                next
            },

            Op::Shl { x, y } => {
                let src = if self.profile.shift_uses_vy { self.regs.vx[y] } else { self.regs.vx[x] };
                self.regs.write_vx(x, (src as u16) << 1);
                self.regs.set_flag(src & 0x80 != 0);
                next
            },

            Op::LdI { nnn } => {
                self.regs.i = nnn;
                next
            },

            Op::JpV0 { nnn } => nnn + self.regs.vx[0] as u16,

            Op::Rnd { x, nn } => {
                let rnd: u8 = self.rnd.rand_range(0..0x100) as u8;
                self.regs.vx[x] = rnd & nn;
                next
            },

            Op::Drw { x, y, n } => {
                self.draw(x, y, n);
                next
            },

            Op::Skp { x } => skip_if(self.keypad.is_pressed(self.regs.vx[x])),

            Op::Sknp { x } => skip_if(!self.keypad.is_pressed(self.regs.vx[x])),

            Op::LdVxDt { x } => {
                self.regs.vx[x] = self.regs.dt;
                next
            },

            Op::LdVxK { x } => match self.keypad.first_pressed() {
                Some(key) => {
                    trace_instr!(self, "key {:X} -> V{:X}", key, x);
                    self.regs.vx[x] = key;
                    self.awaiting_key = false;
                    next
                },
                None => {
                    if !self.awaiting_key {
                        trace_instr!(self, "awaiting key");
                    }
                    self.awaiting_key = true;
                    pc
                },
            },

            Op::LdDtVx { x } => {
                self.regs.dt = self.regs.vx[x];
                next
            },

            Op::LdStVx { x } => {
                self.regs.st = self.regs.vx[x];
                next
            },

            Op::AddIVx { x } => {
                self.regs.i = self.regs.i.wrapping_add(self.regs.vx[x] as u16);
                next
            },

            Op::LdFVx { x } => {
                self.regs.i = font::glyph_addr(self.regs.vx[x]);
                next
            },

            Op::LdBVx { x } => {
                let v = self.regs.vx[x];
                let i = self.regs.i;
                self.ram.write_u8(i, v / 100);
                self.ram.write_u8(i.wrapping_add(1), (v / 10) % 10);
                self.ram.write_u8(i.wrapping_add(2), v % 10);
                next
            },

            Op::LdMemVx { x } => {
                for r in 0..=x {
                    self.ram.write_u8(self.regs.i.wrapping_add(r as u16), self.regs.vx[r]);
                }
                if self.profile.store_advances_i {
                    self.regs.i = self.regs.i.wrapping_add(x as u16 + 1);
                }
                next
            },

            Op::LdVxMem { x } => {
                for r in 0..=x {
                    self.regs.vx[r] = self.ram.read_u8(self.regs.i.wrapping_add(r as u16));
                }
                if self.profile.load_advances_i {
                    self.regs.i = self.regs.i.wrapping_add(x as u16 + 1);
                }
                next
            },
        };

        Ok(())
    }

    /// DXYN: XOR `n` rows from memory at I onto the screen at (VX, VY).
    fn draw(&mut self, x: u8, y: u8, n: u8) {
        let start_x = self.regs.vx[x];
        let start_y = self.regs.vx[y];

        let rows = (n as usize).min(MAX_SPRITE_ROWS);
        let mut sprite = [0u8; MAX_SPRITE_ROWS];
        for (row, line) in sprite.iter_mut().take(rows).enumerate() {
            *line = self.ram.read_u8(self.regs.i.wrapping_add(row as u16));
        }

        self.regs.set_flag(false);
        let collision = self.framebuffer.draw_sprite(&sprite[..rows], start_x, start_y);
        if collision {
            self.regs.vx[arch::VF] = 1;
        }
        self.redraw = true;
    }
}
