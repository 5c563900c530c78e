//! Bit-level view over the single header bytes gif uses to multiplex several fields.
//!
//! Bits are numbered the way GIF89a draws them: index 0 is the most significant bit
//! (value 128) and index 7 the least significant (value 1). A multi-bit field occupies a run of
//! contiguous indices with its own most significant bit at the lowest index.
//!
//! ```text
//!  index:  0   1   2   3   4   5   6   7
//!  value: 128  64  32  16  8   4   2   1
//! ```

use crate::common::GifError;

const BITS: usize = 8;

/// A byte of data in a gif stream which contains a number of data items.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PackedFields(u8);

impl PackedFields {
    /// All bits cleared.
    pub fn new() -> Self {
        Self(0)
    }

    /// The byte the fields currently pack into.
    pub fn to_byte(self) -> u8 {
        self.0
    }

    pub fn get_bit(&self, index: usize) -> Result<bool, GifError> {
        check_index(index)?;
        Ok(self.0 & mask(index) != 0)
    }

    pub fn set_bit(&mut self, index: usize, value: bool) -> Result<(), GifError> {
        check_index(index)?;
        if value {
            self.0 |= mask(index);
        } else {
            self.0 &= !mask(index);
        }
        Ok(())
    }

    /// Reads the `length` bit field starting at `start`, most significant bit first.
    pub fn get_bits(&self, start: usize, length: usize) -> Result<u8, GifError> {
        check_range(start, length)?;
        Ok((start..start + length).fold(0, |acc, index| {
            (acc << 1) | u8::from(self.0 & mask(index) != 0)
        }))
    }

    /// Packs the `length` low-order bits of `value` into `[start, start + length)`. Higher bits of
    /// `value` are discarded.
    pub fn set_bits(&mut self, start: usize, length: usize, value: u8) -> Result<(), GifError> {
        check_range(start, length)?;
        for (shift, index) in (start..start + length).rev().enumerate() {
            if (value >> shift) & 1 == 1 {
                self.0 |= mask(index);
            } else {
                self.0 &= !mask(index);
            }
        }
        Ok(())
    }
}

impl From<u8> for PackedFields {
    fn from(byte: u8) -> Self {
        Self(byte)
    }
}

impl From<PackedFields> for u8 {
    fn from(fields: PackedFields) -> Self {
        fields.to_byte()
    }
}

#[inline]
fn mask(index: usize) -> u8 {
    0x80 >> index
}

fn check_index(index: usize) -> Result<(), GifError> {
    if index >= BITS {
        return Err(GifError::BitIndexOutOfRange(index));
    }
    Ok(())
}

fn check_range(start: usize, length: usize) -> Result<(), GifError> {
    check_index(start)?;
    if length < 1 || length > BITS - start {
        return Err(GifError::BitRangeOutOfRange { start, length });
    }
    Ok(())
}
