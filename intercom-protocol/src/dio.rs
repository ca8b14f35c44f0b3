//! Digital I/O line states
//!
//! Eight boolean lines packed into one byte, line `n` in bit `n`. The side
//! that owns the physical I/O writes them; the other side mirrors them.

use crate::frame::FrameError;

/// Number of digital lines in a frame
pub const DIO_LINES: u8 = 8;

/// Packed digital I/O lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dio(u8);

impl Dio {
    /// All lines low
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Read one line
    pub fn get(self, line: u8) -> Result<bool, FrameError> {
        let mask = Self::mask(line)?;
        Ok(self.0 & mask != 0)
    }

    /// Drive one line
    pub fn set(&mut self, line: u8, high: bool) -> Result<(), FrameError> {
        let mask = Self::mask(line)?;
        if high {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
        Ok(())
    }

    fn mask(line: u8) -> Result<u8, FrameError> {
        if line >= DIO_LINES {
            return Err(FrameError::IndexOutOfRange);
        }
        Ok(1 << line)
    }
}
