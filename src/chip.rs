use log::{debug, error, info};

use crate::arch;
use crate::error::{Fault, Result};
use crate::font;
use crate::framebuffer::{Frame, Framebuffer};
use crate::instr::{Op, Unsupported};
use crate::keypad::{Keypad, Keys};
use crate::profile::Profile;
use crate::ram::Ram;
use crate::regs::RegMap;
use crate::stack::Stack;

mod exec;

/// The whole machine: memory, registers, stack, timers, keypad and display.
///
/// A `Chip` only moves forward when the caller steps it with [`Chip::cycle`]
/// and [`Chip::cycle_timers`], usually through a [`crate::clock::Clock`].
pub struct Chip {
    ram: Ram,
    regs: RegMap,
    stack: Stack,
    keypad: Keypad,
    framebuffer: Framebuffer,
    /// Frame changed since the renderer last acknowledged it.
    redraw: bool,
    /// Stuck on FX0A until a key goes down.
    awaiting_key: bool,
    /// First fault of the run, replayed until reset.
    fault: Option<Fault>,
    rnd: oorandom::Rand32,
    seed: u64,
    profile: Profile,
}

impl Chip {
    /// Machine with a random number generator seeded from the OS.
    pub fn new(profile: Profile) -> Chip {
        let mut seed_bytes: [u8; 8] = [0u8; 8];
        if let Err(err) = getrandom::getrandom(&mut seed_bytes) {
            // RND quality is not worth failing over.
            debug!("getrandom failed ({}), using fixed seed", err);
        }
        let seed: u64 = u64::from_le_bytes(seed_bytes);

        Chip::new_seed(seed, profile)
    }

    pub fn new_seed(seed: u64, profile: Profile) -> Chip {
        let mut chip = Chip {
            ram: Ram::new(),
            regs: RegMap::new(),
            stack: Stack::new(),
            keypad: Keypad::new(),
            framebuffer: Framebuffer::new(),
            redraw: false,
            awaiting_key: false,
            fault: None,
            rnd: oorandom::Rand32::new(seed),
            seed,
            profile,
        };
        chip.reset();
        chip
    }

    /// Back to power-on state: everything zeroed, font loaded, PC at 0x200.
    ///
    /// The loaded program is erased too.
    pub fn reset(&mut self) {
        self.ram.clear();
        self.regs = RegMap::new();
        self.stack.clear();
        self.keypad.clear();
        self.framebuffer.clear();
        self.redraw = false;
        self.awaiting_key = false;
        self.fault = None;
        self.rnd = oorandom::Rand32::new(self.seed);

        let mut addr = arch::FONT_ADDR;
        for glyph in font::FONTSET.iter() {
            for (row, line) in glyph.iter().enumerate() {
                self.ram.write_u8(addr + row as u16, *line);
            }
            addr += arch::SPRITE_HEIGHT;
        }
        debug!("reset, seed={:#x}", self.seed);
    }

    /// Copy a program image verbatim to 0x200.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let end = self.ram.load_block_u8(arch::PROGRAM_START, program)?;
        info!("loaded {} bytes, {:#05x}..{:#05x}", program.len(), arch::PROGRAM_START, end);
        Ok(())
    }

    /// Instruction word at PC. Does not move PC.
    pub fn fetch(&self) -> u16 {
        self.ram.read_u16(self.regs.pc)
    }

    /// Fetch, decode and execute one instruction.
    ///
    /// After a fault the machine refuses to step and keeps returning that
    /// fault until [`Chip::reset`].
    pub fn cycle(&mut self) -> Result<()> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }

        let pc = self.regs.pc;
        let word = self.fetch();
        let result = Op::decode(word)
            .map_err(|Unsupported(word)| Fault::Decode { pc, word })
            .and_then(|op| self.execute(op));

        if let Err(fault) = result {
            error!("{}", fault);
            self.fault = Some(fault);
        }
        result
    }

    /// Count both timers down by one, stopping at zero.
    ///
    /// Returns true when the sound timer was running, meaning a tone should
    /// be sounded for this timer period.
    pub fn cycle_timers(&mut self) -> bool {
        let tone = self.regs.st > 0;

        if self.regs.dt > 0 {
            self.regs.dt -= 1;
        }

        if self.regs.st > 0 {
            self.regs.st -= 1;
        }
        debug!("cycle_timers, dt={}, st={}", self.regs.dt, self.regs.st);
        tone
    }

    pub fn is_sound_on(&self) -> bool {
        self.regs.st > 0
    }

    /// Overwrite the keypad state, one entry per key 0x0 to 0xF.
    pub fn set_keys(&mut self, keys: Keys) {
        self.keypad.set_keys(keys);
    }

    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn key_unpress(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn keys(&self) -> &Keys {
        self.keypad.keys()
    }

    pub fn get_frame(&self) -> &Frame {
        self.framebuffer.get_frame()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Called by the renderer once it has consumed the current frame.
    pub fn ack_redraw(&mut self) {
        self.redraw = false;
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key
    }

    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn v(&self, x: u8) -> u8 {
        self.regs.vx[x & 0xF]
    }

    pub fn index(&self) -> u16 {
        self.regs.i
    }

    pub fn delay_timer(&self) -> u8 {
        self.regs.dt
    }

    pub fn sound_timer(&self) -> u8 {
        self.regs.st
    }

    pub fn stack_depth(&self) -> u8 {
        self.stack.depth()
    }

    pub fn read_mem(&self, addr: u16) -> u8 {
        self.ram.read_u8(addr)
    }

    /// Up to `len` bytes of memory from `addr`, cut short at the end of memory.
    pub fn mem_slice(&self, addr: u16, len: usize) -> &[u8] {
        self.ram.slice(addr, len)
    }

    /// One-line register dump for logs.
    pub fn dump_regs(&self) -> String {
        let mut s = format!("PC={:#05x} I={:#05x} DT={} ST={} STACK={:x?} V=[", self.regs.pc, self.regs.i, self.regs.dt, self.regs.st, self.stack.frames());
        for (n, v) in self.regs.vx.iter().enumerate() {
            if n > 0 {
                s.push(' ');
            }
            s.push_str(&format!("{:02X}", v));
        }
        s.push(']');
        s
    }
}

#[cfg(test)]
mod tests {
    use super::Chip;
    use crate::error::Fault;
    use crate::profile::Profile;

    fn bytes(code: &[u16]) -> Vec<u8> {
        code.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn new() {
        let _ = Chip::new(Profile::default());
    }

    #[test]
    fn reset_state() {
        let chip = Chip::new_seed(1, Profile::default());
        assert_eq!(chip.pc(), 0x200);
        assert_eq!(chip.index(), 0);
        assert_eq!(chip.stack_depth(), 0);
        assert_eq!(chip.delay_timer(), 0);
        assert_eq!(chip.sound_timer(), 0);
        assert!(!chip.needs_redraw());
        assert!(chip.get_frame().is_zero());
        for x in 0..16 {
            assert_eq!(chip.v(x), 0);
        }
    }

    #[test]
    fn fontset_loaded() {
        let chip = Chip::new_seed(1, Profile::default());
        // Glyph "0" and glyph "F".
        assert_eq!(chip.read_mem(0x050), 0xF0);
        assert_eq!(chip.read_mem(0x051), 0x90);
        assert_eq!(chip.read_mem(0x050 + 75), 0xF0);
        assert_eq!(chip.read_mem(0x050 + 79), 0x80);
        assert_eq!(chip.read_mem(0x050 + 80), 0x00);
    }

    #[test]
    fn load_and_fetch() {
        let mut chip = Chip::new_seed(1, Profile::default());
        chip.load_program(&bytes(&[0x6A12, 0x00E0])).unwrap();
        assert_eq!(chip.fetch(), 0x6A12);
        // Fetch does not advance.
        assert_eq!(chip.fetch(), 0x6A12);
        assert_eq!(chip.pc(), 0x200);
    }

    #[test]
    fn load_too_large() {
        let mut chip = Chip::new_seed(1, Profile::default());
        let program = vec![0u8; 0xE01];
        assert_eq!(
            chip.load_program(&program),
            Err(Fault::Load { len: 0xE01, capacity: 0xE00 })
        );
        assert!(chip.load_program(&program[1..]).is_ok());
    }

    #[test]
    fn reset_erases_program() {
        let mut chip = Chip::new_seed(1, Profile::default());
        chip.load_program(&bytes(&[0x6A12, 0x1202])).unwrap();
        chip.cycle().unwrap();
        chip.reset();

        assert_eq!(chip.pc(), 0x200);
        assert_eq!(chip.v(0xA), 0);
        assert_eq!(chip.fetch(), 0x0000);
    }

    #[test]
    fn decode_fault_latched() {
        let mut chip = Chip::new_seed(1, Profile::default());
        chip.load_program(&bytes(&[0x6001, 0xF0FF, 0x6002])).unwrap();

        assert_eq!(chip.cycle(), Ok(()));
        let fault = Fault::Decode { pc: 0x202, word: 0xF0FF };
        assert_eq!(chip.cycle(), Err(fault));
        assert_eq!(chip.fault(), Some(fault));

        // No further execution.
        assert_eq!(chip.cycle(), Err(fault));
        assert_eq!(chip.pc(), 0x202);
        assert_eq!(chip.v(0), 1);

        chip.reset();
        assert_eq!(chip.fault(), None);
    }

    #[test]
    fn timers_saturate() {
        let mut chip = Chip::new_seed(1, Profile::default());
        chip.load_program(&bytes(&[0x6003, 0xF015, 0x6002, 0xF018])).unwrap();
        for _ in 0..4 {
            chip.cycle().unwrap();
        }
        assert_eq!(chip.delay_timer(), 3);
        assert_eq!(chip.sound_timer(), 2);
        assert!(chip.is_sound_on());

        assert!(chip.cycle_timers());
        assert_eq!(chip.delay_timer(), 2);
        assert_eq!(chip.sound_timer(), 1);

        assert!(chip.cycle_timers());
        assert_eq!(chip.delay_timer(), 1);
        assert_eq!(chip.sound_timer(), 0);
        assert!(!chip.is_sound_on());

        assert!(!chip.cycle_timers());
        assert_eq!(chip.delay_timer(), 0);

        assert!(!chip.cycle_timers());
        assert_eq!(chip.delay_timer(), 0);
        assert_eq!(chip.sound_timer(), 0);
    }

    #[test]
    fn redraw_ack() {
        let mut chip = Chip::new_seed(1, Profile::default());
        chip.load_program(&bytes(&[0x00E0])).unwrap();
        chip.cycle().unwrap();
        assert!(chip.needs_redraw());
        chip.ack_redraw();
        assert!(!chip.needs_redraw());
    }

    #[test]
    fn set_keys_wholesale() {
        let mut chip = Chip::new_seed(1, Profile::default());
        chip.key_press(0x3);

        let mut keys = [false; 16];
        keys[0xA] = true;
        chip.set_keys(keys);

        assert!(!chip.keys()[0x3]);
        assert!(chip.keys()[0xA]);
    }

    #[test]
    fn mem_slice() {
        let mut chip = Chip::new_seed(1, Profile::default());
        chip.load_program(&bytes(&[0x1234])).unwrap();
        assert_eq!(chip.mem_slice(0x200, 2), &[0x12, 0x34]);
        assert_eq!(chip.mem_slice(0xFFF, 8).len(), 1);
    }

    #[test]
    fn dump_regs() {
        let chip = Chip::new_seed(1, Profile::default());
        let s = chip.dump_regs();
        assert!(s.starts_with("PC=0x200 I=0x000"));
        assert!(s.ends_with("00 00]"));
    }
}
