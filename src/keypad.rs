//! Hex keypad state, written by the input front end and read by the engine.
use crate::arch::NKEYS;

pub type Keys = [bool; NKEYS];

pub struct Keypad {
    keys: Keys,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [false; NKEYS],
        }
    }

    /// Overwrite the whole keypad state.
    pub fn set_keys(&mut self, keys: Keys) {
        self.keys = keys;
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn press(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = true;
    }

    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = false;
    }

    pub fn clear(&mut self) {
        self.keys = [false; NKEYS];
    }

    /// Key values come from registers, only the low nibble names a key.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// Lowest-numbered key currently down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|i| i as u8)
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Keypad;

    #[test]
    fn press_release() {
        let mut k = Keypad::new();
        assert_eq!(k.first_pressed(), None);

        k.press(0x7);
        k.press(0xC);
        assert!(k.is_pressed(0x7));
        assert!(!k.is_pressed(0x1));
        assert_eq!(k.first_pressed(), Some(0x7));

        k.release(0x7);
        assert_eq!(k.first_pressed(), Some(0xC));
        // High nibble is ignored.
        assert!(k.is_pressed(0x1C));
    }

    #[test]
    fn set_keys_overwrites() {
        let mut k = Keypad::new();
        k.press(0x1);

        let mut keys = [false; 16];
        keys[0xF] = true;
        k.set_keys(keys);

        assert!(!k.is_pressed(0x1));
        assert_eq!(k.first_pressed(), Some(0xF));

        k.clear();
        assert_eq!(k.first_pressed(), None);
    }
}
