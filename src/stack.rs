//! Subroutine call stack.
use crate::arch;
use crate::util;

type StackBuf = util::Array<u16, {arch::STACKSIZE as usize}>;

/// Return addresses with an explicit depth counter in `0..=STACKSIZE`.
pub struct Stack {
    buf: StackBuf,
    sp: u8,
}

/// Push on a full stack or pop from an empty one.
#[derive(Debug, PartialEq, Eq)]
pub enum StackError {
    Overflow,
    Underflow,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            buf: StackBuf::new(),
            sp: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.sp = 0;
    }

    pub fn depth(&self) -> u8 {
        self.sp
    }

    pub fn push(&mut self, addr: u16) -> Result<(), StackError> {
        if self.sp as u32 >= arch::STACKSIZE {
            return Err(StackError::Overflow);
        }
        self.buf[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        if self.sp == 0 {
            return Err(StackError::Underflow);
        }
        self.sp -= 1;
        Ok(self.buf[self.sp])
    }

    /// Live entries, bottom first.
    pub fn frames(&self) -> &[u16] {
        &self.buf[..self.sp as usize]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Stack, StackError};

    #[test]
    fn push_pop() {
        let mut s = Stack::new();
        s.push(0x202).unwrap();
        s.push(0x304).unwrap();
        assert_eq!(s.depth(), 2);
        assert_eq!(s.frames(), &[0x202, 0x304]);

        assert_eq!(s.pop(), Ok(0x304));
        assert_eq!(s.pop(), Ok(0x202));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn underflow() {
        let mut s = Stack::new();
        assert_eq!(s.pop(), Err(StackError::Underflow));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn overflow_on_17th_push() {
        let mut s = Stack::new();
        for n in 0..16 {
            assert_eq!(s.push(0x200 + n * 2), Ok(()));
        }
        assert_eq!(s.push(0x400), Err(StackError::Overflow));
        assert_eq!(s.depth(), 16);
        assert_eq!(s.pop(), Ok(0x21E));
    }
}
