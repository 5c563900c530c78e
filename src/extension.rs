//! The Application Extension (GIF89a section 26), label `0xFF`.
//!
//! ```text
//! [0x0B]["NETSCAPE" "2.0"][size][data]...[size][data][0x00]
//!  \_identification block_/ \______application data______/
//! ```
//!
//! The introducer and label bytes in front of it belong to the enclosing stream.

use alloc::{format, string::String, vec::Vec};

use crate::{
    block::DataBlock,
    common::{Block, ExtensionLabel, GifError},
    iterators::ByteIterator,
    status::{ErrorState, GifComponent, Status},
};

pub(crate) const IDENTIFICATION_LEN: usize = 11;
const IDENTIFIER_LEN: usize = 8;

/// Application specific data, identified by an 8 character application identifier and a 3
/// character authentication code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationExtension {
    identification_block: DataBlock,
    application_identifier: String,
    authentication_code: String,
    application_data: Vec<DataBlock>,
    status: Status,
}

impl ApplicationExtension {
    /// Builds an extension from blocks already in memory.
    pub fn new(
        identification_block: DataBlock,
        application_data: Vec<DataBlock>,
    ) -> Result<Self, GifError> {
        Self::assemble(identification_block, application_data, Status::new())
    }

    /// Reads the identification block and the chain of data blocks after it, up to and including
    /// the terminator. A stream that runs out part way through still yields an extension, flagged
    /// with [`ErrorState::END_OF_INPUT_STREAM`].
    pub fn read<S: Iterator<Item = u8>>(bytes: &mut ByteIterator<S>) -> Result<Self, GifError> {
        let start = bytes.offset();
        let mut status = Status::new();
        let identification_block = DataBlock::read(bytes);
        status.absorb(identification_block.status());

        let mut application_data = Vec::new();
        if !identification_block.test_state(ErrorState::END_OF_INPUT_STREAM) {
            loop {
                let block = DataBlock::read(bytes);
                status.absorb(block.status());
                let done = block.is_terminator()
                    || block.test_state(ErrorState::END_OF_INPUT_STREAM);
                application_data.push(block);
                if done {
                    break;
                }
            }
        }
        log::trace!(
            "application extension of {} data blocks, {} bytes",
            application_data.len(),
            bytes.offset() - start
        );

        Self::assemble(identification_block, application_data, status)
    }

    /// Reads an extension from the front of `data`, returning it with the number of bytes it
    /// occupied.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), GifError> {
        let mut bytes = ByteIterator::from_slice(data);
        let extension = Self::read(&mut bytes)?;
        Ok((extension, bytes.offset()))
    }

    fn assemble(
        identification_block: DataBlock,
        application_data: Vec<DataBlock>,
        mut status: Status,
    ) -> Result<Self, GifError> {
        let len = identification_block.actual_size();
        if len < IDENTIFICATION_LEN {
            return Err(GifError::IdentificationBlockTooShort(len));
        }
        if len > IDENTIFICATION_LEN {
            status.set(
                ErrorState::IDENTIFICATION_BLOCK_TOO_LONG,
                format!(
                    "the identification block should be 11 bytes long but is {} bytes long, \
                     additional bytes are ignored",
                    len
                ),
            );
        }

        let identification = identification_block.data();
        let application_identifier = as_chars(&identification[..IDENTIFIER_LEN]);
        let authentication_code = as_chars(&identification[IDENTIFIER_LEN..IDENTIFICATION_LEN]);

        Ok(Self {
            identification_block,
            application_identifier,
            authentication_code,
            application_data,
            status,
        })
    }

    pub fn identification_block(&self) -> &DataBlock {
        &self.identification_block
    }

    /// Eight characters identifying the application that owns the extension.
    pub fn application_identifier(&self) -> &str {
        &self.application_identifier
    }

    /// Three characters authenticating the application identifier.
    pub fn authentication_code(&self) -> &str {
        &self.authentication_code
    }

    /// Data blocks after the identification block, including the terminator when there was one.
    pub fn application_data(&self) -> &[DataBlock] {
        &self.application_data
    }

    pub fn is_netscape(&self) -> bool {
        self.application_identifier == "NETSCAPE" && self.authentication_code == "2.0"
    }

    /// Writes the identification block and data chain, closing the chain with a terminator if it
    /// does not already end with one.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        self.identification_block.write_to(out);
        for block in self.application_data.iter() {
            block.write_to(out);
        }
        if !self
            .application_data
            .last()
            .map_or(false, |block| block.actual_size() == 0)
        {
            DataBlock::terminator().write_to(out);
        }
    }

    /// [`write_to`](Self::write_to), preceded by the extension introducer and label.
    pub fn write_with_introducer(&self, out: &mut Vec<u8>) {
        out.push(Block::Extension as u8);
        out.push(ExtensionLabel::App as u8);
        self.write_to(out);
    }
}

impl GifComponent for ApplicationExtension {
    fn status(&self) -> &Status {
        &self.status
    }
}

fn as_chars(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
