use alloc::string::String;
use thiserror::Error;

/// Known GIF block labels.
///
/// Note that the block uniquely specifies the layout of bytes that follow and how they are
/// framed. For example, the header always has a fixed length but is followed by a variable amount
/// of additional data. An image descriptor may be followed by a local color table depending on
/// information read in it. Therefore, it doesn't make sense to continue parsing after encountering
/// an unknown block as the semantics of following bytes are unclear.
///
/// The extension block provides a common framing for an arbitrary amount of application specific
/// data which may be ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Block {
    /// Image block.
    Image = 0x2C,
    /// Extension block.
    Extension = 0x21,
    /// Image trailer.
    Trailer = 0x3B,
}

/// Known GIF Extension labels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ExtensionLabel {
    /// Graphic control extension.
    Graphics = 0xf9,
    /// Application extension.
    App = 0xff,
    /// Plain text extension.
    Text = 0x01,
    /// Comment extension
    Comment = 0xfe,
}

impl ExtensionLabel {
    pub fn from_u8(n: u8) -> Result<Self, GifError> {
        match n {
            0xf9 => Ok(ExtensionLabel::Graphics),
            0xff => Ok(ExtensionLabel::App),
            0x01 => Ok(ExtensionLabel::Text),
            0xfe => Ok(ExtensionLabel::Comment),
            _ => Err(GifError::IncorrectExtension(n)),
        }
    }
}

impl Block {
    /// Try to parse from u8
    pub fn from_u8(n: u8) -> Result<Self, GifError> {
        match n {
            0x2C => Ok(Block::Image),
            0x21 => Ok(Block::Extension),
            0x3B => Ok(Block::Trailer),
            _ => Err(GifError::IncorrectBlockLabel(n)),
        }
    }
}

/// Hard failures. Anything returned as a `GifError` aborted construction of the value being
/// built; recoverable conditions are reported through [`Status`](crate::Status) instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GifError {
    /// Malformed GIF file
    #[error("not a gif file, signature was {0:?}")]
    BadGifFile([u8; 3]),
    /// Version was neither 87a nor 89a
    #[error("unsupported gif version {0:?}")]
    UnknownVersion([u8; 3]),
    /// EoF came early
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),
    /// The stream ended without a trailer
    #[error("stream ended without a trailer")]
    MissingTrailer,
    /// Invalid block label
    #[error("invalid block label {0:#04x}")]
    IncorrectBlockLabel(u8),
    /// Invalid extension label
    #[error("invalid extension label {0:#04x}")]
    IncorrectExtension(u8),
    #[error("index must be between 0 and 7, supplied index: {0}")]
    BitIndexOutOfRange(usize),
    #[error(
        "length must be greater than zero and start index plus length must not exceed 8, \
         supplied length: {length}, supplied start index: {start}"
    )]
    BitRangeOutOfRange { start: usize, length: usize },
    #[error("index {index} is outside a data block holding {len} bytes")]
    BlockIndexOutOfRange { index: usize, len: usize },
    #[error("declared block size {declared} does not match payload of {actual} bytes")]
    BlockSizeMismatch { declared: u8, actual: usize },
    #[error("a data block holds at most 255 bytes, got {0}")]
    BlockTooLong(usize),
    #[error("the identification block should be 11 bytes long but is only {0} bytes")]
    IdentificationBlockTooShort(usize),
    #[error(
        "the application identifier is not 'NETSCAPE' therefore this application extension \
         is not a netscape extension, application identifier: {0}"
    )]
    NotNetscapeIdentifier(String),
    #[error(
        "the application authentication code is not '2.0' therefore this application \
         extension is not a netscape extension, application authentication code: {0}"
    )]
    NotNetscapeAuthenticationCode(String),
    #[error("loop count must be between -1 and 65534, got {0}")]
    LoopCountOutOfRange(i32),
    #[error("{field} must be between {min} and {max}, got {value}")]
    FieldOutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },
}
