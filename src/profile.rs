/// Behaviour of the opcodes that interpreter lineages disagree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// 8XY6/8XYE copy VY into VX before shifting.
    pub shift_uses_vy: bool,
    /// FX55 leaves I pointing past the stored range.
    pub store_advances_i: bool,
    /// FX65 leaves I pointing past the loaded range.
    pub load_advances_i: bool,
}

impl Profile {
    /// COSMAC VIP interpreter.
    pub fn original() -> Profile {
        Profile {
            shift_uses_vy: true,
            store_advances_i: true,
            load_advances_i: true,
        }
    }

    pub fn modern() -> Profile {
        Profile {
            shift_uses_vy: false,
            store_advances_i: false,
            load_advances_i: false,
        }
    }
}

/// Shifts work on VX in place, FX55 keeps I, FX65 advances I.
impl Default for Profile {
    fn default() -> Self {
        Profile {
            shift_uses_vy: false,
            store_advances_i: false,
            load_advances_i: true,
        }
    }
}
