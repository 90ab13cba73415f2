use crate::arch;
use crate::error::{Fault, Result};
use crate::util;

type RamBuf = util::Array<u8, { arch::RAMSIZE as usize }>;

/// Main memory. Every address is masked to 12 bits before use.
pub struct Ram {
    mem: RamBuf,
}

#[inline(always)]
fn mask(addr: u16) -> u16 {
    addr & arch::ADDR_MASK
}

impl Ram {
    pub fn new() -> Ram {
        Ram {
            mem: RamBuf::new(),
        }
    }

    pub fn clear(&mut self) {
        self.mem.clear();
    }

    pub fn write_u8(&mut self, addr: u16, value: u8) {
        self.mem[mask(addr)] = value;
    }

    pub fn read_u8(&self, addr: u16) -> u8 {
        self.mem[mask(addr)]
    }

    /// Big-endian word; the second byte wraps around the end of memory.
    pub fn read_u16(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read_u8(addr), self.read_u8(addr.wrapping_add(1))])
    }

    #[cfg(test)]
    pub fn write_u16(&mut self, addr: u16, v: u16) {
        let [hi, lo] = v.to_be_bytes();
        self.write_u8(addr, hi);
        self.write_u8(addr.wrapping_add(1), lo);
    }

    #[cfg(test)]
    pub fn load_block_u16(&mut self, addr: u16, buf: &[u16]) {
        let mut addr = addr;
        for op in buf {
            self.write_u16(addr, *op);
            addr += 2;
        }
    }

    /// Copy `buf` verbatim to `addr`, returning the address just past it.
    ///
    /// Blocks running past the end of memory are rejected whole, nothing is written.
    pub fn load_block_u8(&mut self, addr: u16, buf: &[u8]) -> Result<u16> {
        let start = mask(addr) as usize;
        let capacity = arch::RAMSIZE as usize - start;
        if buf.len() > capacity {
            return Err(Fault::Load { len: buf.len(), capacity });
        }
        self.mem[start..start + buf.len()].copy_from_slice(buf);
        Ok((start + buf.len()) as u16)
    }

    /// Read-only view of `len` bytes starting at `addr`, clamped to the end of memory.
    pub fn slice(&self, addr: u16, len: usize) -> &[u8] {
        let start = mask(addr) as usize;
        let end = (start + len).min(arch::RAMSIZE as usize);
        &self.mem[start..end]
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::arch;
    use crate::error::Fault;
    use crate::ram::Ram;

    #[test]
    fn clear_when_created() {
        let ram = Ram::new();

        for i in 0..arch::RAMSIZE as u16 {
            assert_eq!(ram.read_u8(i), 0);
        }
    }

    #[test]
    fn write_u8_read_u8() {
        let mut ram = Ram::new();

        ram.write_u8(0x0, 0x00);
        ram.write_u8(0x1, 0x10);

        assert_eq!(ram.read_u8(0x0), 0x00);
        assert_eq!(ram.read_u8(0x1), 0x10);

        ram.write_u8(0xff0, 0x00);
        ram.write_u8(0xff1, 0x10);

        assert_eq!(ram.read_u8(0xff0), 0x00);
        assert_eq!(ram.read_u8(0xff1), 0x10);
    }

    #[test]
    fn addresses_masked_to_12_bits() {
        let mut ram = Ram::new();

        ram.write_u8(0x1234, 0xAB);
        assert_eq!(ram.read_u8(0x234), 0xAB);
        assert_eq!(ram.read_u8(0xF234), 0xAB);
    }

    #[test]
    fn write_u16_read_u8() {
        let mut ram = Ram::new();

        ram.write_u16(0x0, 0x1122);
        assert_eq!(ram.read_u8(0x0), 0x11);
        assert_eq!(ram.read_u8(0x1), 0x22);
        assert_eq!(ram.read_u16(0x0), 0x1122);
    }

    #[test]
    fn read_u16_wraps_at_end() {
        let mut ram = Ram::new();

        ram.write_u8(0xFFF, 0x12);
        ram.write_u8(0x000, 0x34);
        assert_eq!(ram.read_u16(0xFFF), 0x1234);
    }

    #[test]
    fn load_block_u8() {
        let mut ram = Ram::new();

        let data = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
        let mut addr = 0x200;
        let end = ram.load_block_u8(addr, &data).unwrap();
        assert_eq!(end, 0x206);
        for bb in data {
            assert_eq!(ram.read_u8(addr), bb);
            addr += 1;
        }
    }

    #[test]
    fn load_block_u8_fills_to_end() {
        let mut ram = Ram::new();

        let data = vec![0xAA; 0x1000 - 0x200];
        assert_eq!(ram.load_block_u8(0x200, &data), Ok(0x1000));
        assert_eq!(ram.read_u8(0xFFF), 0xAA);
    }

    #[test]
    fn load_block_u8_too_large() {
        let mut ram = Ram::new();

        let data = vec![0xAA; 0x1000 - 0x200 + 1];
        assert_eq!(
            ram.load_block_u8(0x200, &data),
            Err(Fault::Load { len: 0xE01, capacity: 0xE00 })
        );
        // Nothing is written on failure.
        assert_eq!(ram.read_u8(0x200), 0);
    }

    #[test]
    fn slice_clamped() {
        let mut ram = Ram::new();
        ram.write_u8(0xFFE, 1);
        ram.write_u8(0xFFF, 2);

        assert_eq!(ram.slice(0xFFE, 4), &[1, 2]);
    }
}
