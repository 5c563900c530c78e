use alloc::{format, string::String, vec::Vec};

use crate::{
    block::{skip_sub_blocks, DataBlock},
    common::{Block, ExtensionLabel, GifError},
    extension::ApplicationExtension,
    iterators::{ByteIterator, SliceIter},
    netscape::{LoopCount, NetscapeExtension},
    packed::PackedFields,
    status::{ErrorState, GifComponent, Status},
};

use smallvec::SmallVec;

const SIGNATURE: &[u8; 3] = b"GIF";
const VERSIONS: [&[u8; 3]; 2] = [b"87a", b"89a"];
const GRAPHICS_CONTROL_LEN: u8 = 4;

/// How to treat streams that bend the format.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Strictness {
    /// Unknown versions, unknown extensions and a missing trailer are errors.
    Strict,
    /// The same conditions are recorded on the [`GifComponent::status`] of the [`GifInfo`] and
    /// parsing carries on.
    #[default]
    Lenient,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    strictness: Strictness,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }
}

/// Everything structural about a gif stream: descriptors, color tables, extensions and where the
/// frames live. Image data is framed but not decoded.
#[derive(Debug, Clone)]
pub struct GifInfo {
    header: Header,
    screen: LogicalScreenDescriptor,
    global_table: Option<ColorTable>,
    frames: Vec<FrameInfo>,
    application_extensions: Vec<ApplicationExtension>,
    netscape: Option<NetscapeExtension>,
    comments: Vec<String>,
    status: Status,
}

impl GifInfo {
    pub fn from_slice(data: &[u8]) -> Result<Self, GifError> {
        let mut bytes: ByteIterator<SliceIter> = ByteIterator::from_slice(data);
        Self::parser(&mut bytes, &ParseOptions::default())
    }

    pub fn parser<S: Iterator<Item = u8>>(
        raw_header: &mut ByteIterator<S>,
        options: &ParseOptions,
    ) -> Result<Self, GifError> {
        let mut status = Status::new();
        let header = Header::parser(raw_header, options, &mut status)?;
        let screen = LogicalScreenDescriptor::parser(raw_header)?;
        let global_table = match screen.color_table_len() {
            0 => None,
            len => Some(ColorTable::new(len, raw_header)?),
        };

        let mut frames = Vec::new();
        let mut application_extensions = Vec::new();
        let mut netscape = None;
        let mut comments = Vec::new();
        let mut control_info = None;
        loop {
            let label = match raw_header.next_byte() {
                Some(label) => label,
                None if options.is_strict() => return Err(GifError::MissingTrailer),
                None => {
                    status.set(
                        ErrorState::MISSING_TRAILER,
                        format!(
                            "stream ended at offset {} without a trailer",
                            raw_header.offset()
                        ),
                    );
                    break;
                }
            };

            match Block::from_u8(label)? {
                Block::Image => {
                    let offset = raw_header.offset() - 1;
                    log::trace!("found an image at {}", offset);
                    let descriptor = ImageDescriptor::parser(raw_header)?;
                    let local_table = match descriptor.color_table_len() {
                        0 => None,
                        len => Some(ColorTable::new(len, raw_header)?),
                    };
                    let min_code_size = raw_header.take_byte()?;
                    skip_sub_blocks(raw_header, &mut status);
                    frames.push(FrameInfo {
                        offset,
                        descriptor,
                        local_table,
                        control: control_info.take(),
                        min_code_size,
                    });
                }

                Block::Trailer => break,

                Block::Extension => {
                    let extension = raw_header.take_byte()?;
                    match ExtensionLabel::from_u8(extension) {
                        Ok(ExtensionLabel::Graphics) => {
                            log::trace!(
                                "found a graphics extension at {}",
                                raw_header.offset() - 2
                            );
                            control_info = Some(GraphicsControl::parse(raw_header, &mut status)?);
                        }
                        Ok(ExtensionLabel::App) => {
                            let offset = raw_header.offset() - 2;
                            let app = ApplicationExtension::read(raw_header)?;
                            log::debug!(
                                "found application extension {}{}",
                                app.application_identifier(),
                                app.authentication_code()
                            );
                            status.absorb(app.status());
                            if app.is_netscape() {
                                let looping = NetscapeExtension::try_from(app.clone())?;
                                if looping.loop_count().is_none() {
                                    status.set(
                                        ErrorState::LOOP_COUNT_MISSING,
                                        format!(
                                            "netscape extension at offset {} has no loop count",
                                            offset
                                        ),
                                    );
                                }
                                netscape = Some(looping);
                            }
                            application_extensions.push(app);
                        }
                        Ok(ExtensionLabel::Comment) => {
                            comments.push(read_comment(raw_header, &mut status));
                        }
                        Ok(ExtensionLabel::Text) => {
                            log::trace!("skipping plain text at {}", raw_header.offset());
                            // a preceding graphic control extension belongs to this text
                            control_info = None;
                            skip_sub_blocks(raw_header, &mut status);
                        }
                        Err(err) if options.is_strict() => return Err(err),
                        Err(_) => {
                            status.set(
                                ErrorState::UNKNOWN_EXTENSION,
                                format!(
                                    "skipped unknown extension {:#04x} at offset {}",
                                    extension,
                                    raw_header.offset() - 2
                                ),
                            );
                            skip_sub_blocks(raw_header, &mut status);
                        }
                    }
                }
            }
        }

        Ok(Self {
            header,
            screen,
            global_table,
            frames,
            application_extensions,
            netscape,
            comments,
            status,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn screen(&self) -> &LogicalScreenDescriptor {
        &self.screen
    }

    pub fn global_table(&self) -> Option<&ColorTable> {
        self.global_table.as_ref()
    }

    pub fn frames(&self) -> &[FrameInfo] {
        &self.frames
    }

    pub fn num_images(&self) -> usize {
        self.frames.len()
    }

    pub fn application_extensions(&self) -> &[ApplicationExtension] {
        &self.application_extensions
    }

    /// The last netscape extension in the stream.
    pub fn netscape(&self) -> Option<&NetscapeExtension> {
        self.netscape.as_ref()
    }

    pub fn loop_count(&self) -> Option<LoopCount> {
        self.netscape.as_ref().and_then(NetscapeExtension::loop_count)
    }

    /// Whether the animation plays more than once.
    pub fn can_loop(&self) -> bool {
        !matches!(self.loop_count(), None | Some(LoopCount::NoRepeat))
    }

    /// Delay after each frame in milliseconds, 0 for frames without a graphic control extension.
    pub fn frame_delays_ms(&self) -> Vec<u32> {
        self.frames
            .iter()
            .map(|frame| frame.control.as_ref().map_or(0, GraphicsControl::delay_ms))
            .collect()
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }
}

impl GifComponent for GifInfo {
    fn status(&self) -> &Status {
        &self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: [u8; 3],
}

impl Header {
    pub fn parser<S: Iterator<Item = u8>>(
        raw_header: &mut ByteIterator<S>,
        options: &ParseOptions,
        status: &mut Status,
    ) -> Result<Header, GifError> {
        let signature: [u8; 3] = raw_header.take_arr()?;
        if &signature != SIGNATURE {
            return Err(GifError::BadGifFile(signature));
        }

        let version: [u8; 3] = raw_header.take_arr()?;
        if !VERSIONS.contains(&&version) {
            if options.is_strict() {
                return Err(GifError::UnknownVersion(version));
            }
            status.set(
                ErrorState::UNKNOWN_VERSION,
                format!("unknown gif version {:?}", version),
            );
        }
        Ok(Header { version })
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(SIGNATURE);
        out.extend_from_slice(&self.version);
    }
}

/// Logical screen descriptor. Its packed byte is laid out as
///
/// ```text
/// bit   0      1 2 3         4      5 6 7
///       global color-res    sort   table size
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogicalScreenDescriptor {
    pub width: u16,
    pub height: u16,
    pub global_color_table: bool,
    /// Bits per primary color, 1 to 8.
    pub color_resolution: u8,
    pub sorted: bool,
    /// The 3 bit size field; the table holds `2^(size + 1)` entries.
    pub color_table_size: u8,
    pub background_color_index: u8,
    pub pixel_aspect_ratio: u8,
}

impl LogicalScreenDescriptor {
    pub fn parser<S: Iterator<Item = u8>>(
        raw_header: &mut ByteIterator<S>,
    ) -> Result<Self, GifError> {
        let width = raw_header.take_u16_le()?;
        let height = raw_header.take_u16_le()?;
        let packed = PackedFields::from(raw_header.take_byte()?);
        let background_color_index = raw_header.take_byte()?;
        let pixel_aspect_ratio = raw_header.take_byte()?;

        Ok(Self {
            width,
            height,
            global_color_table: packed.get_bit(0)?,
            color_resolution: packed.get_bits(1, 3)? + 1,
            sorted: packed.get_bit(4)?,
            color_table_size: packed.get_bits(5, 3)?,
            background_color_index,
            pixel_aspect_ratio,
        })
    }

    /// Number of entries in the global color table, 0 when there is none.
    pub fn color_table_len(&self) -> usize {
        table_len(self.global_color_table, self.color_table_size)
    }

    pub fn to_packed(&self) -> Result<PackedFields, GifError> {
        let color_resolution = check_field("color resolution", self.color_resolution, 1, 8)?;
        let color_table_size = check_field("color table size", self.color_table_size, 0, 7)?;
        let mut packed = PackedFields::new();
        packed.set_bit(0, self.global_color_table)?;
        packed.set_bits(1, 3, color_resolution - 1)?;
        packed.set_bit(4, self.sorted)?;
        packed.set_bits(5, 3, color_table_size)?;
        Ok(packed)
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), GifError> {
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.push(self.to_packed()?.to_byte());
        out.push(self.background_color_index);
        out.push(self.pixel_aspect_ratio);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    table: SmallVec<[[u8; 3]; 256]>,
}

impl ColorTable {
    pub fn new<S: Iterator<Item = u8>>(
        len: usize,
        iter: &mut ByteIterator<S>,
    ) -> Result<Self, GifError> {
        let mut table = SmallVec::with_capacity(len);
        for _ in 0..len {
            table.push(iter.take_arr()?);
        }
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// RGB triple at `idx`.
    pub fn get(&self, idx: u8) -> Option<[u8; 3]> {
        self.table.get(idx as usize).copied()
    }
}

/// Process for displaying next image in the file
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DisposalMethod {
    #[default]
    NotSpecified,
    DoNotDispose,
    OverwriteWithBG,
    OverwriteWithPrev,
    Reserved(u8),
}

impl From<u8> for DisposalMethod {
    fn from(n: u8) -> Self {
        match n & 0b111 {
            0 => DisposalMethod::NotSpecified,
            1 => DisposalMethod::DoNotDispose,
            2 => DisposalMethod::OverwriteWithBG,
            3 => DisposalMethod::OverwriteWithPrev,
            n => DisposalMethod::Reserved(n),
        }
    }
}

impl From<DisposalMethod> for u8 {
    fn from(method: DisposalMethod) -> Self {
        match method {
            DisposalMethod::NotSpecified => 0,
            DisposalMethod::DoNotDispose => 1,
            DisposalMethod::OverwriteWithBG => 2,
            DisposalMethod::OverwriteWithPrev => 3,
            DisposalMethod::Reserved(n) => n & 0b111,
        }
    }
}

/// Graphic control extension. Packed byte:
///
/// ```text
/// bit   0 1 2      3 4 5      6           7
///       reserved   disposal   user input  transparent
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsControl {
    pub disposal_method: DisposalMethod,
    pub user_input: bool,
    ///table index for a transparent color
    pub transparent_idx: Option<u8>,
    ///Delay time, in hundredths of a second
    pub delay_time: u16,
}

impl GraphicsControl {
    /// Parses the extension body after its label, including the block terminator.
    pub fn parse<S: Iterator<Item = u8>>(
        raw_header: &mut ByteIterator<S>,
        status: &mut Status,
    ) -> Result<Self, GifError> {
        let block = DataBlock::read(raw_header);
        if block.test_state(ErrorState::END_OF_INPUT_STREAM) {
            status.absorb(block.status());
            return Err(GifError::UnexpectedEof(raw_header.offset()));
        }
        if block.declared_size() != GRAPHICS_CONTROL_LEN {
            status.set(
                ErrorState::UNEXPECTED_BLOCK_SIZE,
                format!(
                    "graphic control extension should be {} bytes long but is {}",
                    GRAPHICS_CONTROL_LEN,
                    block.declared_size()
                ),
            );
        }
        let mut body = [0u8; GRAPHICS_CONTROL_LEN as usize];
        for (slot, byte) in body.iter_mut().zip(block.data()) {
            *slot = *byte;
        }
        if !block.is_terminator() {
            skip_sub_blocks(raw_header, status);
        }

        let [ctrl, delay_lo, delay_hi, transparent_idx] = body;
        let ctrl = PackedFields::from(ctrl);
        Ok(Self {
            disposal_method: DisposalMethod::from(ctrl.get_bits(3, 3)?),
            user_input: ctrl.get_bit(6)?,
            transparent_idx: ctrl.get_bit(7)?.then_some(transparent_idx),
            delay_time: u16::from_le_bytes([delay_lo, delay_hi]),
        })
    }

    pub fn get_transparent_idx(&self) -> Option<u8> {
        self.transparent_idx
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_time as u32 * 10
    }

    pub fn to_packed(&self) -> Result<PackedFields, GifError> {
        let mut packed = PackedFields::new();
        packed.set_bits(3, 3, self.disposal_method.into())?;
        packed.set_bit(6, self.user_input)?;
        packed.set_bit(7, self.transparent_idx.is_some())?;
        Ok(packed)
    }

    /// Writes the whole extension, introducer through terminator.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), GifError> {
        out.push(Block::Extension as u8);
        out.push(ExtensionLabel::Graphics as u8);
        out.push(GRAPHICS_CONTROL_LEN);
        out.push(self.to_packed()?.to_byte());
        out.extend_from_slice(&self.delay_time.to_le_bytes());
        out.push(self.transparent_idx.unwrap_or(0));
        out.push(0);
        Ok(())
    }
}

/// Image descriptor. Packed byte:
///
/// ```text
/// bit   0      1          2      3 4        5 6 7
///       local  interlace  sort   reserved   table size
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub local_color_table: bool,
    pub interlaced: bool,
    pub sorted: bool,
    pub color_table_size: u8,
}

impl ImageDescriptor {
    /// Parses the descriptor after its separator byte.
    pub fn parser<S: Iterator<Item = u8>>(
        raw_header: &mut ByteIterator<S>,
    ) -> Result<ImageDescriptor, GifError> {
        let left = raw_header.take_u16_le()?;
        let top = raw_header.take_u16_le()?;
        let width = raw_header.take_u16_le()?;
        let height = raw_header.take_u16_le()?;
        let packed = PackedFields::from(raw_header.take_byte()?);

        Ok(Self {
            left,
            top,
            width,
            height,
            local_color_table: packed.get_bit(0)?,
            interlaced: packed.get_bit(1)?,
            sorted: packed.get_bit(2)?,
            color_table_size: packed.get_bits(5, 3)?,
        })
    }

    pub fn color_table_len(&self) -> usize {
        table_len(self.local_color_table, self.color_table_size)
    }

    pub fn num_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn to_packed(&self) -> Result<PackedFields, GifError> {
        let mut packed = PackedFields::new();
        packed.set_bit(0, self.local_color_table)?;
        packed.set_bit(1, self.interlaced)?;
        packed.set_bit(2, self.sorted)?;
        packed.set_bits(
            5,
            3,
            check_field("color table size", self.color_table_size, 0, 7)?,
        )?;
        Ok(packed)
    }

    /// Writes the separator and descriptor.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), GifError> {
        out.push(Block::Image as u8);
        for field in [self.left, self.top, self.width, self.height] {
            out.extend_from_slice(&field.to_le_bytes());
        }
        out.push(self.to_packed()?.to_byte());
        Ok(())
    }
}

/// Where a frame lives and how it is described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// Stream offset of the image separator.
    pub offset: usize,
    pub descriptor: ImageDescriptor,
    pub local_table: Option<ColorTable>,
    /// Graphic control extension immediately preceding the image, if any.
    pub control: Option<GraphicsControl>,
    /// LZW minimum code size heading the image data.
    pub min_code_size: u8,
}

fn table_len(present: bool, size: u8) -> usize {
    if present {
        1 << (size as usize + 1)
    } else {
        0
    }
}

/// Rejects values a packed field cannot hold.
fn check_field(field: &'static str, value: u8, min: u8, max: u8) -> Result<u8, GifError> {
    if value < min || value > max {
        return Err(GifError::FieldOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

fn read_comment<S: Iterator<Item = u8>>(
    raw_header: &mut ByteIterator<S>,
    status: &mut Status,
) -> String {
    let mut comment = String::new();
    loop {
        let block = DataBlock::read(raw_header);
        comment.extend(block.data().iter().map(|&b| char::from(b)));
        if block.test_state(ErrorState::END_OF_INPUT_STREAM) {
            status.absorb(block.status());
            break;
        }
        if block.is_terminator() {
            break;
        }
    }
    comment
}
