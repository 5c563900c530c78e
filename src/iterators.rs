use core::{iter::Copied, slice::Iter};

use crate::common::GifError;

/// Forward-only cursor over a gif source.
///
/// Every component reads through one of these and claims exactly the bytes it consumed, so the
/// offset after a read is always the offset of the next block in the stream. `None` from the
/// underlying iterator means the stream is exhausted for good.
#[derive(Clone, Debug)]
pub struct ByteIterator<S: Iterator<Item = u8>> {
    iterator: S,
    offset: usize,
}

pub type SliceIter<'a> = Copied<Iter<'a, u8>>;

impl<'a> ByteIterator<SliceIter<'a>> {
    pub fn from_slice(slice: &'a [u8]) -> Self {
        Self::new(slice.iter().copied())
    }
}

impl<S: Iterator<Item = u8>> ByteIterator<S> {
    pub fn new(iterator: S) -> Self {
        Self {
            iterator,
            offset: 0,
        }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reads the next byte, `None` once the stream is exhausted.
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.iterator.next()?;
        self.offset += 1;
        Some(byte)
    }

    /// Reads up to `len` bytes into `out`, returning how many were read. Fewer than `len` means
    /// the stream ran dry.
    pub fn read_up_to<E: Extend<u8>>(&mut self, len: usize, out: &mut E) -> usize {
        let before = self.offset;
        out.extend(core::iter::from_fn(|| self.next_byte()).take(len));
        self.offset - before
    }

    pub(crate) fn take_byte(&mut self) -> Result<u8, GifError> {
        self.next_byte().ok_or(GifError::UnexpectedEof(self.offset))
    }

    pub(crate) fn take_u16_le(&mut self) -> Result<u16, GifError> {
        self.take_arr().map(u16::from_le_bytes)
    }

    #[inline]
    pub(crate) fn take_arr<const N: usize>(&mut self) -> Result<[u8; N], GifError> {
        let mut arr = [0; N];
        for slot in arr.iter_mut() {
            *slot = self.take_byte()?;
        }
        Ok(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn offsets_track_consumed_bytes() {
        let mut bytes = ByteIterator::from_slice(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(bytes.take_byte(), Ok(1));
        assert_eq!(bytes.take_u16_le(), Ok(0x0302));
        assert_eq!(bytes.offset(), 3);
        assert_eq!(bytes.take_arr::<2>(), Ok([4, 5]));
        assert_eq!(bytes.offset(), 5);
        assert_eq!(bytes.next_byte(), Some(6));
        assert_eq!(bytes.next_byte(), None);
        assert_eq!(bytes.offset(), 6);
        assert_eq!(bytes.take_byte(), Err(GifError::UnexpectedEof(6)));
    }

    #[test]
    fn read_up_to_stops_at_end_of_stream() {
        let mut bytes = ByteIterator::from_slice(&[9, 8, 7]);
        let mut out = Vec::new();
        assert_eq!(bytes.read_up_to(2, &mut out), 2);
        assert_eq!(out, [9, 8]);
        assert_eq!(bytes.read_up_to(5, &mut out), 1);
        assert_eq!(out, [9, 8, 7]);
        assert_eq!(bytes.read_up_to(5, &mut out), 0);
        assert_eq!(bytes.offset(), 3);
    }

    #[test]
    fn works_over_any_byte_iterator() {
        let mut bytes = ByteIterator::new((0u8..=255).rev());
        assert_eq!(bytes.take_arr::<3>(), Ok([255, 254, 253]));
        assert_eq!(bytes.offset(), 3);
    }
}
