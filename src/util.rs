use std::ops::Index;
use std::ops::IndexMut;
use std::ops::Range;
use std::ops::RangeTo;
use num::Zero;

/// Fixed-size, zero-initialised buffer.
///
/// Indexable by any of the integer widths the machine decodes operands into,
/// so that a register nibble can index the register file without casts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Array<T: Zero + Copy, const SIZE: usize> {
    buf: [T; SIZE],
}

impl<T: Zero + Copy, const SIZE: usize> Array<T, SIZE> {
    pub fn new() -> Self {
        Self {
            buf: [T::zero(); SIZE],
        }
    }

    pub fn len(&self) -> usize {
        SIZE
    }

    pub fn iter(&self) -> impl Iterator<Item=&T> {
        self.buf.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buf
    }

    pub fn clear(&mut self) {
        self.buf = [T::zero(); SIZE];
    }

    pub fn is_zero(&self) -> bool {
        self.buf.iter().all(|v| v.is_zero())
    }
}

impl<T: Zero + Copy, const SIZE: usize> Default for Array<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_index_slice {
    ($t:ty) => {
        impl <T: Zero + Copy, const SIZE: usize> Index<$t> for Array<T, SIZE> {
            type Output = [T];

            fn index(&self, i: $t) -> &Self::Output {
                self.buf.index(i)
            }
        }

        impl <T: Zero + Copy, const SIZE: usize> IndexMut<$t> for Array<T, SIZE> {
            fn index_mut(&mut self, i: $t) -> &mut Self::Output {
                self.buf.index_mut(i)
            }
        }
    }
}

impl_index_slice!(Range<usize>);
impl_index_slice!(RangeTo<usize>);

macro_rules! impl_index {
    ($t:ty) => {
        impl <T: Zero + Copy, const SIZE: usize> Index<$t> for Array<T, SIZE> {
            type Output = T;

            fn index(&self, i: $t) -> &Self::Output {
                &self.buf[i as usize]
            }
        }

        impl <T: Zero + Copy, const SIZE: usize> IndexMut<$t> for Array<T, SIZE> {
            fn index_mut(&mut self, i: $t) -> &mut T {
                &mut self.buf[i as usize]
            }
        }

    };
}

impl_index!(u32);
impl_index!(u16);
impl_index!(u8);
impl_index!(usize);
// Bare integer literals default to i32.
impl_index!(i32);

#[cfg(test)]
mod tests {
    use super::Array;

    #[test]
    fn arr_u8() {
        let mut a: Array<u8, 4> = Array::<u8, 4>::new();

        let _ = a[0..2];
        let _ = a[..2];
        a[0usize] = 0;
        a[1u32] = 1;
        a[2u8] = 2;
        a[3u16] = 3;
        a[3] = 3u8;
        assert_eq!(a.as_slice(), &[0, 1, 2, 3]);
        assert!(!a.is_zero());

        a[1..3].copy_from_slice(&[7, 8]);
        assert_eq!(a.as_slice(), &[0, 7, 8, 3]);

        a.clear();
        assert!(a.is_zero());
        assert_eq!(a.len(), 4);
    }
}
