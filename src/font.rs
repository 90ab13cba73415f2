use crate::arch;

pub type Glyph = [u8; arch::SPRITE_HEIGHT as usize];

/// Hexadecimal digits 0x0 to 0xF, 4 pixels wide and 5 rows high.
pub const FONTSET: [Glyph; arch::NSPRITES as usize] = [
    [0xF0, 0x90, 0x90, 0x90, 0xF0], // 0
    [0x20, 0x60, 0x20, 0x20, 0x70], // 1
    [0xF0, 0x10, 0xF0, 0x80, 0xF0], // 2
    [0xF0, 0x10, 0xF0, 0x10, 0xF0], // 3
    [0x90, 0x90, 0xF0, 0x10, 0x10], // 4
    [0xF0, 0x80, 0xF0, 0x10, 0xF0], // 5
    [0xF0, 0x80, 0xF0, 0x90, 0xF0], // 6
    [0xF0, 0x10, 0x20, 0x40, 0x40], // 7
    [0xF0, 0x90, 0xF0, 0x90, 0xF0], // 8
    [0xF0, 0x90, 0xF0, 0x10, 0xF0], // 9
    [0xF0, 0x90, 0xF0, 0x90, 0x90], // A
    [0xE0, 0x90, 0xE0, 0x90, 0xE0], // B
    [0xF0, 0x80, 0x80, 0x80, 0xF0], // C
    [0xE0, 0x90, 0x90, 0x90, 0xE0], // D
    [0xF0, 0x80, 0xF0, 0x80, 0xF0], // E
    [0xF0, 0x80, 0xF0, 0x80, 0x80], // F
];

/// Memory address of the glyph for `digit`; only the low nibble is used.
#[inline]
pub fn glyph_addr(digit: u8) -> u16 {
    arch::FONT_ADDR + arch::SPRITE_HEIGHT * (digit & 0xF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_addresses() {
        assert_eq!(glyph_addr(0x0), 0x050);
        assert_eq!(glyph_addr(0x1), 0x055);
        assert_eq!(glyph_addr(0xF), 0x050 + 75);
        assert_eq!(glyph_addr(0x1A), glyph_addr(0xA));
    }
}
