//! Soft status carried by every parsed value.
//!
//! Parsing a gif is forgiving: a stream that ends early or a block that is longer than it should
//! be still produces a value. What went wrong is recorded here as a set of flags plus a message
//! per occurrence, in the order they were raised.

use alloc::{string::String, vec::Vec};
use bitflags::bitflags;

bitflags! {
    /// Non-exclusive status flags. An empty set means the value was well formed.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct ErrorState: u32 {
        /// The stream ended before a block was complete.
        const END_OF_INPUT_STREAM = 1 << 0;
        /// An application identification block held more than 11 bytes.
        const IDENTIFICATION_BLOCK_TOO_LONG = 1 << 1;
        /// A netscape extension had no loop count sub-block.
        const LOOP_COUNT_MISSING = 1 << 2;
        /// An extension label outside GIF89a was skipped.
        const UNKNOWN_EXTENSION = 1 << 3;
        /// A fixed size block declared an unexpected size.
        const UNEXPECTED_BLOCK_SIZE = 1 << 4;
        /// The version was neither 87a nor 89a.
        const UNKNOWN_VERSION = 1 << 5;
        /// The stream ended without a trailer.
        const MISSING_TRAILER = 1 << 6;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub state: ErrorState,
    pub message: String,
}

/// Flags raised while building a value, and why.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    state: ErrorState,
    diagnostics: Vec<Diagnostic>,
}

impl Status {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ErrorState {
        self.state
    }

    /// True when every flag in `state` has been raised.
    pub fn test(&self, state: ErrorState) -> bool {
        self.state.contains(state)
    }

    pub fn is_ok(&self) -> bool {
        self.state.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn set(&mut self, state: ErrorState, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{:?}: {}", state, message);
        self.state |= state;
        self.diagnostics.push(Diagnostic { state, message });
    }

    /// Folds the status of a part into the status of the value built from it.
    pub(crate) fn absorb(&mut self, other: &Status) {
        self.state |= other.state;
        self.diagnostics.extend(other.diagnostics.iter().cloned());
    }
}

/// Anything that carries a [`Status`].
pub trait GifComponent {
    fn status(&self) -> &Status;

    fn error_state(&self) -> ErrorState {
        self.status().state()
    }

    fn test_state(&self, state: ErrorState) -> bool {
        self.status().test(state)
    }
}

impl GifComponent for Status {
    fn status(&self) -> &Status {
        self
    }
}
