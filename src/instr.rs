//! Instruction decoding.
use std::fmt;

/// Raw operand fields of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instr {
    pub opcode: u16,
    pub c: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Instr {
    pub fn new(opcode: u16) -> Self {
        Instr {
            opcode,
            c: ((opcode & 0xf000) >> 12) as u8,
            x: ((opcode & 0x0f00) >> 8) as u8,
            y: ((opcode & 0x00f0) >> 4) as u8,
            n: (opcode & 0x000f) as u8,
            nn: (opcode & 0x00ff) as u8,
            nnn: (opcode & 0x0fff) as u16,
        }
    }
}

/// Every operation of the baseline instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1NNN
    Jp { nnn: u16 },
    /// 2NNN
    Call { nnn: u16 },
    /// 3XNN
    SeImm { x: u8, nn: u8 },
    /// 4XNN
    SneImm { x: u8, nn: u8 },
    /// 5XY0
    SeReg { x: u8, y: u8 },
    /// 6XNN
    LdImm { x: u8, nn: u8 },
    /// 7XNN
    AddImm { x: u8, nn: u8 },
    /// 8XY0
    LdReg { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddReg { x: u8, y: u8 },
    /// 8XY5
    Sub { x: u8, y: u8 },
    /// 8XY6
    Shr { x: u8, y: u8 },
    /// 8XY7
    Subn { x: u8, y: u8 },
    /// 8XYE
    Shl { x: u8, y: u8 },
    /// 9XY0
    SneReg { x: u8, y: u8 },
    /// ANNN
    LdI { nnn: u16 },
    /// BNNN
    JpV0 { nnn: u16 },
    /// CXNN
    Rnd { x: u8, nn: u8 },
    /// DXYN
    Drw { x: u8, y: u8, n: u8 },
    /// EX9E
    Skp { x: u8 },
    /// EXA1
    Sknp { x: u8 },
    /// FX07
    LdVxDt { x: u8 },
    /// FX0A
    LdVxK { x: u8 },
    /// FX15
    LdDtVx { x: u8 },
    /// FX18
    LdStVx { x: u8 },
    /// FX1E
    AddIVx { x: u8 },
    /// FX29
    LdFVx { x: u8 },
    /// FX33
    LdBVx { x: u8 },
    /// FX55
    LdMemVx { x: u8 },
    /// FX65
    LdVxMem { x: u8 },
}

/// The word has no mapping in the instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported(pub u16);

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported instruction {:04X}", self.0)
    }
}

impl std::error::Error for Unsupported {}

impl Op {
    /// Map an instruction word onto its operation.
    ///
    /// Families 0x0, 0x8, 0xE and 0xF dispatch again on `n` or `nn`; the
    /// others ignore the low bits they don't use. 0NNN (machine code call)
    /// is not part of the baseline set.
    pub fn decode(word: u16) -> Result<Op, Unsupported> {
        let op = match Instr::new(word) {
            Instr { c: 0x0, nn: 0xE0, .. } => Op::Cls,
            Instr { c: 0x0, nn: 0xEE, .. } => Op::Ret,
            Instr { c: 0x1, nnn, .. } => Op::Jp { nnn },
            Instr { c: 0x2, nnn, .. } => Op::Call { nnn },
            Instr { c: 0x3, x, nn, .. } => Op::SeImm { x, nn },
            Instr { c: 0x4, x, nn, .. } => Op::SneImm { x, nn },
            Instr { c: 0x5, x, y, .. } => Op::SeReg { x, y },
            Instr { c: 0x6, x, nn, .. } => Op::LdImm { x, nn },
            Instr { c: 0x7, x, nn, .. } => Op::AddImm { x, nn },
            Instr { c: 0x8, x, y, n: 0x0, .. } => Op::LdReg { x, y },
            Instr { c: 0x8, x, y, n: 0x1, .. } => Op::Or { x, y },
            Instr { c: 0x8, x, y, n: 0x2, .. } => Op::And { x, y },
            Instr { c: 0x8, x, y, n: 0x3, .. } => Op::Xor { x, y },
            Instr { c: 0x8, x, y, n: 0x4, .. } => Op::AddReg { x, y },
            Instr { c: 0x8, x, y, n: 0x5, .. } => Op::Sub { x, y },
            Instr { c: 0x8, x, y, n: 0x6, .. } => Op::Shr { x, y },
            Instr { c: 0x8, x, y, n: 0x7, .. } => Op::Subn { x, y },
            Instr { c: 0x8, x, y, n: 0xE, .. } => Op::Shl { x, y },
            Instr { c: 0x9, x, y, .. } => Op::SneReg { x, y },
            Instr { c: 0xA, nnn, .. } => Op::LdI { nnn },
            Instr { c: 0xB, nnn, .. } => Op::JpV0 { nnn },
            Instr { c: 0xC, x, nn, .. } => Op::Rnd { x, nn },
            Instr { c: 0xD, x, y, n, .. } => Op::Drw { x, y, n },
            Instr { c: 0xE, x, nn: 0x9E, .. } => Op::Skp { x },
            Instr { c: 0xE, x, nn: 0xA1, .. } => Op::Sknp { x },
            Instr { c: 0xF, x, nn: 0x07, .. } => Op::LdVxDt { x },
            Instr { c: 0xF, x, nn: 0x0A, .. } => Op::LdVxK { x },
            Instr { c: 0xF, x, nn: 0x15, .. } => Op::LdDtVx { x },
            Instr { c: 0xF, x, nn: 0x18, .. } => Op::LdStVx { x },
            Instr { c: 0xF, x, nn: 0x1E, .. } => Op::AddIVx { x },
            Instr { c: 0xF, x, nn: 0x29, .. } => Op::LdFVx { x },
            Instr { c: 0xF, x, nn: 0x33, .. } => Op::LdBVx { x },
            Instr { c: 0xF, x, nn: 0x55, .. } => Op::LdMemVx { x },
            Instr { c: 0xF, x, nn: 0x65, .. } => Op::LdVxMem { x },
            _ => return Err(Unsupported(word)),
        };
        Ok(op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Op::Cls => write!(f, "CLS"),
            Op::Ret => write!(f, "RET"),
            Op::Jp { nnn } => write!(f, "JP {:#x}", nnn),
            Op::Call { nnn } => write!(f, "CALL {:#x}", nnn),
            Op::SeImm { x, nn } => write!(f, "SE V{:X}, {:#x}", x, nn),
            Op::SneImm { x, nn } => write!(f, "SNE V{:X}, {:#x}", x, nn),
            Op::SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Op::LdImm { x, nn } => write!(f, "LD V{:X}, {:#x}", x, nn),
            Op::AddImm { x, nn } => write!(f, "ADD V{:X}, {:#x}", x, nn),
            Op::LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Op::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Op::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Op::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Op::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Op::Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Op::Shr { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Op::Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Op::Shl { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Op::SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Op::LdI { nnn } => write!(f, "LD I, {:#x}", nnn),
            Op::JpV0 { nnn } => write!(f, "JP V0, {:#x}", nnn),
            Op::Rnd { x, nn } => write!(f, "RND V{:X}, {:#x}", x, nn),
            Op::Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:#x}", x, y, n),
            Op::Skp { x } => write!(f, "SKP V{:X}", x),
            Op::Sknp { x } => write!(f, "SKNP V{:X}", x),
            Op::LdVxDt { x } => write!(f, "LD V{:X}, DT", x),
            Op::LdVxK { x } => write!(f, "LD V{:X}, K", x),
            Op::LdDtVx { x } => write!(f, "LD DT, V{:X}", x),
            Op::LdStVx { x } => write!(f, "LD ST, V{:X}", x),
            Op::AddIVx { x } => write!(f, "ADD I, V{:X}", x),
            Op::LdFVx { x } => write!(f, "LD F, V{:X}", x),
            Op::LdBVx { x } => write!(f, "LD B, V{:X}", x),
            Op::LdMemVx { x } => write!(f, "LD [I], V{:X}", x),
            Op::LdVxMem { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
