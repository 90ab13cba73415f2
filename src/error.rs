//! Machine faults.
use std::fmt::{self, Display, Formatter};

pub type Result<T> = std::result::Result<T, Fault>;

/// Fatal conditions that stop the current run.
///
/// None of these are transient: they come from the loaded program, so
/// the machine must be reset before it can step again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Instruction word matches no known opcode.
    Decode { pc: u16, word: u16 },
    /// Subroutine call with the stack already full.
    StackOverflow { pc: u16 },
    /// Return with an empty stack.
    StackUnderflow { pc: u16 },
    /// Program does not fit between its load address and the end of memory.
    Load { len: usize, capacity: usize },
}

impl Fault {
    /// Address of the faulting instruction, if the fault happened while executing.
    pub fn pc(&self) -> Option<u16> {
        match *self {
            Self::Decode { pc, .. } | Self::StackOverflow { pc } | Self::StackUnderflow { pc } => Some(pc),
            Self::Load { .. } => None,
        }
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { pc, word } => write!(f, "unsupported instruction {:04X} at {:#05x}", word, pc),
            Self::StackOverflow { pc } => write!(f, "call stack overflow at {:#05x}", pc),
            Self::StackUnderflow { pc } => write!(f, "call stack underflow at {:#05x}", pc),
            Self::Load { len, capacity } => write!(f, "program of {} bytes exceeds {} bytes of memory", len, capacity),
        }
    }
}

impl std::error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::Fault;

    #[test]
    fn display() {
        let f = Fault::Decode { pc: 0x204, word: 0xE0FF };
        assert_eq!(f.to_string(), "unsupported instruction E0FF at 0x204");
        assert_eq!(f.pc(), Some(0x204));

        let f = Fault::Load { len: 4000, capacity: 3584 };
        assert_eq!(f.to_string(), "program of 4000 bytes exceeds 3584 bytes of memory");
        assert_eq!(f.pc(), None);
    }
}
