//! The Netscape looping extension, an application extension with identifier `NETSCAPE` and
//! authentication code `2.0`. See <http://www.let.rug.nl/~kleiweg/gif/netscape.html>.
//!
//! Its data holds a 3 byte sub-block `[1, lo, hi]` with the number of times to play the
//! animation, little endian.

use alloc::vec;

use crate::{
    block::DataBlock,
    common::GifError,
    extension::ApplicationExtension,
    status::{ErrorState, GifComponent, Status},
};

const IDENTIFICATION: &[u8; 11] = b"NETSCAPE2.0";
const LOOP_SUB_BLOCK: u8 = 1;
const NO_REPEAT_WIRE: u16 = 0xffff;

/// How many times an animation repeats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LoopCount {
    /// Loop forever. Stored as 0.
    Infinite,
    /// Play once. Stored as -1, which goes on the wire as `0xFFFF`.
    NoRepeat,
    /// Repeat `n` times, for `n` in 1 to 65534.
    Times(u16),
}

impl LoopCount {
    /// Interprets the raw integer form: 0 forever, -1 never, anything else that many times.
    pub fn from_raw(raw: i32) -> Result<Self, GifError> {
        match raw {
            0 => Ok(LoopCount::Infinite),
            -1 => Ok(LoopCount::NoRepeat),
            1..=0xfffe => Ok(LoopCount::Times(raw as u16)),
            _ => Err(GifError::LoopCountOutOfRange(raw)),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            LoopCount::Infinite => 0,
            LoopCount::NoRepeat => -1,
            LoopCount::Times(n) => n as i32,
        }
    }

    pub fn from_le_bytes(bytes: [u8; 2]) -> Self {
        match u16::from_le_bytes(bytes) {
            0 => LoopCount::Infinite,
            NO_REPEAT_WIRE => LoopCount::NoRepeat,
            n => LoopCount::Times(n),
        }
    }

    pub fn to_le_bytes(self) -> [u8; 2] {
        match self {
            LoopCount::Infinite => [0, 0],
            LoopCount::NoRepeat => NO_REPEAT_WIRE.to_le_bytes(),
            LoopCount::Times(n) => n.to_le_bytes(),
        }
    }
}

/// An application extension controlling how many times an animation is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetscapeExtension {
    extension: ApplicationExtension,
    loop_count: Option<LoopCount>,
    status: Status,
}

impl NetscapeExtension {
    /// `repeat_count` is 0 to repeat forever, -1 to not repeat, or the number of repetitions.
    pub fn new(repeat_count: i32) -> Result<Self, GifError> {
        LoopCount::from_raw(repeat_count).and_then(Self::with_loop_count)
    }

    /// Fails for `Times(0)` and `Times(0xFFFF)`, which share their wire form with
    /// [`LoopCount::Infinite`] and [`LoopCount::NoRepeat`].
    pub fn with_loop_count(loop_count: LoopCount) -> Result<Self, GifError> {
        if let LoopCount::Times(n @ (0 | NO_REPEAT_WIRE)) = loop_count {
            return Err(GifError::LoopCountOutOfRange(i32::from(n)));
        }
        let [lo, hi] = loop_count.to_le_bytes();
        let extension = ApplicationExtension::new(
            DataBlock::from_payload(IDENTIFICATION)?,
            vec![
                DataBlock::new(3, &[LOOP_SUB_BLOCK, lo, hi])?,
                DataBlock::terminator(),
            ],
        )?;
        let status = extension.status().clone();
        Ok(Self {
            extension,
            loop_count: Some(loop_count),
            status,
        })
    }

    /// The loop count, `None` if the extension carried no loop count sub-block.
    pub fn loop_count(&self) -> Option<LoopCount> {
        self.loop_count
    }

    pub fn application_extension(&self) -> &ApplicationExtension {
        &self.extension
    }

    pub fn into_inner(self) -> ApplicationExtension {
        self.extension
    }
}

impl TryFrom<ApplicationExtension> for NetscapeExtension {
    type Error = GifError;

    fn try_from(extension: ApplicationExtension) -> Result<Self, Self::Error> {
        if extension.application_identifier() != "NETSCAPE" {
            return Err(GifError::NotNetscapeIdentifier(
                extension.application_identifier().into(),
            ));
        }
        if extension.authentication_code() != "2.0" {
            return Err(GifError::NotNetscapeAuthenticationCode(
                extension.authentication_code().into(),
            ));
        }

        let mut loop_count = None;
        for block in extension.application_data() {
            if block.actual_size() == 0 {
                break;
            }
            if let [LOOP_SUB_BLOCK, lo, hi, ..] = *block.data() {
                loop_count = Some(LoopCount::from_le_bytes([lo, hi]));
            }
        }

        let mut status = extension.status().clone();
        if loop_count.is_none() {
            status.set(
                ErrorState::LOOP_COUNT_MISSING,
                "the netscape extension holds no loop count sub-block",
            );
        }
        Ok(Self {
            extension,
            loop_count,
            status,
        })
    }
}

impl GifComponent for NetscapeExtension {
    fn status(&self) -> &Status {
        &self.status
    }
}

impl AsRef<ApplicationExtension> for NetscapeExtension {
    fn as_ref(&self) -> &ApplicationExtension {
        &self.extension
    }
}
