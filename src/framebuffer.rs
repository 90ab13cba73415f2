use crate::arch;
use crate::util;

// Each pixel is stored as 1 or 0, row-major: index = y * width + x.
pub type Frame = util::Array<u8, {arch::DISPLAY_SIZE}>;

const WIDTH: usize = arch::DISPLAY_WIDTH as usize;
const HEIGHT: usize = arch::DISPLAY_HEIGHT as usize;

pub struct Framebuffer {
    frame: Frame,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            frame: Frame::new(),
        }
    }

    pub fn clear(&mut self) {
        self.frame.clear();
    }

    pub fn get_frame(&self) -> &Frame {
        &self.frame
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.frame[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    pub fn rows(&self) -> impl Iterator<Item=&[u8]> {
        self.frame.as_slice().chunks(WIDTH)
    }

    #[cfg(test)]
    fn fill_frame_u8(&mut self, v: u8) {
        for (j, px) in self.frame.as_mut_slice().iter_mut().enumerate() {
            let mask = 0x80u8 >> (j % 8);
            *px = (v & mask != 0) as u8;
        }
    }

    /// XOR an 8-pixel-wide sprite onto the frame, one byte per row.
    ///
    /// Each pixel wraps around both edges independently. Returns true if any
    /// pixel that was already lit got switched off.
    pub fn draw_sprite(&mut self, sprite: &[u8], start_x: u8, start_y: u8) -> bool {
        let mut collision = false;

        for (row, line) in sprite.iter().enumerate() {
            let frame_y = (start_y as usize + row) % HEIGHT;

            for col in 0..8 {
                if line & (0x80u8 >> col) == 0 {
                    continue;
                }
                let frame_x = (start_x as usize + col) % WIDTH;
                let idx = frame_y * WIDTH + frame_x;

                let frame_bit = self.frame[idx];
                if frame_bit == 1 {
                    collision = true;
                }
                self.frame[idx] = frame_bit ^ 1;
            }
        }

        collision
    }

    /// One text line per row, `#` for lit pixels.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((WIDTH + 1) * HEIGHT);
        for row in self.rows() {
            out.extend(row.iter().map(|&p| if p == 1 { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
