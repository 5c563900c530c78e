use alloc::{format, vec::Vec};
use smallvec::SmallVec;

use crate::{
    common::GifError,
    iterators::ByteIterator,
    status::{ErrorState, GifComponent, Status},
};

/// Payloads up to this size live inline. Covers identification blocks and netscape sub-blocks.
const INLINE_PAYLOAD: usize = 16;

/// One length-prefixed sub-block: `[size][size bytes]`. A zero size terminates a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    declared_size: u8,
    data: SmallVec<[u8; INLINE_PAYLOAD]>,
    status: Status,
}

impl DataBlock {
    /// Reads one block. Never fails: running out of input is recorded as
    /// [`ErrorState::END_OF_INPUT_STREAM`] and whatever payload was available is kept.
    pub fn read<S: Iterator<Item = u8>>(bytes: &mut ByteIterator<S>) -> Self {
        let mut status = Status::new();
        let mut data: SmallVec<[u8; INLINE_PAYLOAD]> = SmallVec::new();

        let declared_size = match bytes.next_byte() {
            Some(size) => size,
            None => {
                status.set(
                    ErrorState::END_OF_INPUT_STREAM,
                    format!(
                        "end of input stream at offset {} while reading a block size",
                        bytes.offset()
                    ),
                );
                return Self {
                    declared_size: 0,
                    data,
                    status,
                };
            }
        };

        let read = bytes.read_up_to(declared_size as usize, &mut data);
        if read < declared_size as usize {
            status.set(
                ErrorState::END_OF_INPUT_STREAM,
                format!(
                    "end of input stream: block declared {} bytes but only {} could be read",
                    declared_size, read
                ),
            );
        }
        log::trace!("data block of {}/{} bytes", read, declared_size);

        Self {
            declared_size,
            data,
            status,
        }
    }

    /// Builds a block from an in-memory payload which must be exactly `declared_size` long.
    pub fn new(declared_size: u8, data: &[u8]) -> Result<Self, GifError> {
        if data.len() != declared_size as usize {
            return Err(GifError::BlockSizeMismatch {
                declared: declared_size,
                actual: data.len(),
            });
        }
        Ok(Self {
            declared_size,
            data: SmallVec::from_slice(data),
            status: Status::new(),
        })
    }

    pub fn from_payload(data: &[u8]) -> Result<Self, GifError> {
        let declared_size =
            u8::try_from(data.len()).map_err(|_| GifError::BlockTooLong(data.len()))?;
        Self::new(declared_size, data)
    }

    /// The zero-length block closing a chain.
    pub fn terminator() -> Self {
        Self {
            declared_size: 0,
            data: SmallVec::new(),
            status: Status::new(),
        }
    }

    /// The size byte as it appeared in the stream.
    pub fn declared_size(&self) -> u8 {
        self.declared_size
    }

    /// Number of payload bytes actually held, less than declared if the stream ended early.
    pub fn actual_size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, index: usize) -> Result<u8, GifError> {
        self.data
            .get(index)
            .copied()
            .ok_or(GifError::BlockIndexOutOfRange {
                index,
                len: self.data.len(),
            })
    }

    pub fn is_terminator(&self) -> bool {
        self.declared_size == 0
    }

    /// Bytes this block occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        1 + self.data.len()
    }

    /// Writes `[size][payload]`. The size written is the payload actually held, so a truncated
    /// block is re-emitted as a well formed shorter one.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.data.len() as u8);
        out.extend_from_slice(&self.data);
    }
}

impl GifComponent for DataBlock {
    fn status(&self) -> &Status {
        &self.status
    }
}

/// Reads blocks until a terminator or the end of the stream, discarding their payloads.
pub(crate) fn skip_sub_blocks<S: Iterator<Item = u8>>(
    bytes: &mut ByteIterator<S>,
    status: &mut Status,
) {
    loop {
        let block = DataBlock::read(bytes);
        if block.test_state(ErrorState::END_OF_INPUT_STREAM) {
            status.absorb(block.status());
            return;
        }
        if block.is_terminator() {
            return;
        }
    }
}
