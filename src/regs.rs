use crate::arch;
use crate::util;

type VxRegs = util::Array<u8, {arch::NVREGS as usize}>;

pub struct RegMap {
    pub vx: VxRegs,
    pub dt: u8,
    pub st: u8,
    /// Index register. Only the lower 12 bits address memory.
    pub i: u16,
    pub pc: u16,
}

impl RegMap {
    pub fn new() -> Self {
        RegMap {
            vx: VxRegs::new(),
            dt: 0,
            st: 0,
            i: 0,
            pc: arch::PROGRAM_START,
        }
    }

    /// Store a wide intermediate result, keeping only the low byte.
    #[inline]
    pub fn write_vx(&mut self, x: u8, value: u16) {
        self.vx[x & 0xF] = (value & 0xFF) as u8;
    }

    #[inline]
    pub fn set_flag(&mut self, set: bool) {
        self.vx[arch::VF] = set as u8;
    }
}

impl Default for RegMap {
    fn default() -> Self {
        Self::new()
    }
}
