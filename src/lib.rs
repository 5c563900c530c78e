//! A small block-level model of the GIF89a container, for no-std environments but usable
//! anywhere.
//!
//! A gif stream is a chain of self-describing blocks. This crate reads and writes that framing:
//!
//! * [`DataBlock`]: one length-prefixed sub-block, `[size][size bytes]`, with `size == 0`
//!   terminating a chain.
//! * [`ApplicationExtension`]: an 11 byte identification block followed by a terminated chain of
//!   data blocks.
//! * [`NetscapeExtension`]: the `NETSCAPE2.0` application extension carrying an animation's
//!   [`LoopCount`].
//! * [`PackedFields`]: bit-level access to the header bytes that multiplex several fields.
//! * [`GifInfo`]: a walk over a whole stream collecting descriptors, color tables, extensions and
//!   frame locations. Image data is framed, never decoded.
//!
//! Parsing distinguishes two kinds of trouble. Malformed input that leaves nothing sensible to
//! build is a [`GifError`]. Input that is merely degraded, such as a stream that ends part way
//! through a block chain, still yields a value whose [`Status`] records what went wrong; inspect
//! it through [`GifComponent`].
//!
//! ```
//! use gifblocks::{ApplicationExtension, GifComponent, LoopCount, NetscapeExtension};
//!
//! let mut bytes = Vec::new();
//! NetscapeExtension::new(0)?.application_extension().write_to(&mut bytes);
//!
//! let (extension, consumed) = ApplicationExtension::from_bytes(&bytes)?;
//! assert_eq!(consumed, bytes.len());
//! assert_eq!(extension.application_identifier(), "NETSCAPE");
//!
//! let netscape = NetscapeExtension::try_from(extension)?;
//! assert_eq!(netscape.loop_count(), Some(LoopCount::Infinite));
//! assert!(netscape.status().is_ok());
//! # Ok::<(), gifblocks::GifError>(())
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod block;
mod common;
mod extension;
mod header;
mod iterators;
mod netscape;
mod packed;
mod status;
#[cfg(test)]
mod test_utils;

pub use block::DataBlock;
pub use common::{Block, ExtensionLabel, GifError};
pub use extension::ApplicationExtension;
pub use header::{
    ColorTable, DisposalMethod, FrameInfo, GifInfo, GraphicsControl, Header, ImageDescriptor,
    LogicalScreenDescriptor, ParseOptions, Strictness,
};
pub use iterators::{ByteIterator, SliceIter};
pub use netscape::{LoopCount, NetscapeExtension};
pub use packed::PackedFields;
pub use status::{Diagnostic, ErrorState, GifComponent, Status};
