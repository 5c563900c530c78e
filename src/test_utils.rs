use std::vec::Vec;

use crate::{
    header::{GraphicsControl, Header, ImageDescriptor, LogicalScreenDescriptor},
    netscape::{LoopCount, NetscapeExtension},
};

/// Assembles small synthetic gif streams. Image data is a fixed dummy chain since nothing here
/// decodes it.
pub(crate) struct GifBuilder {
    screen: LogicalScreenDescriptor,
    body: Vec<u8>,
}

impl GifBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: LogicalScreenDescriptor {
                width,
                height,
                color_resolution: 8,
                ..Default::default()
            },
            body: Vec::new(),
        }
    }

    /// Adds a global table of `2^(size + 1)` entries.
    pub fn global_table(mut self, size: u8) -> Self {
        self.screen.global_color_table = true;
        self.screen.color_table_size = size;
        self
    }

    pub fn netscape(mut self, loop_count: LoopCount) -> Self {
        NetscapeExtension::with_loop_count(loop_count)
            .unwrap()
            .application_extension()
            .write_with_introducer(&mut self.body);
        self
    }

    /// Adds a frame covering the screen, with a graphic control extension when `delay` is set
    /// and a local table of `2^(size + 1)` entries when `local_table` is set.
    pub fn frame(mut self, delay: Option<u16>, local_table: Option<u8>) -> Self {
        if let Some(delay_time) = delay {
            GraphicsControl {
                delay_time,
                ..Default::default()
            }
            .write_to(&mut self.body)
            .unwrap();
        }
        let descriptor = ImageDescriptor {
            width: self.screen.width,
            height: self.screen.height,
            local_color_table: local_table.is_some(),
            color_table_size: local_table.unwrap_or(0),
            ..Default::default()
        };
        descriptor.write_to(&mut self.body).unwrap();
        self.body
            .extend(std::iter::repeat(0x80).take(descriptor.color_table_len() * 3));
        self.body.extend_from_slice(&[2, 3, 0x8c, 0x2d, 0x99, 1, 0x01, 0]);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn build_without_trailer(self) -> Vec<u8> {
        let mut out = Vec::new();
        Header { version: *b"89a" }.write_to(&mut out);
        self.screen.write_to(&mut out).unwrap();
        out.extend(std::iter::repeat(0x40).take(self.screen.color_table_len() * 3));
        out.extend_from_slice(&self.body);
        out
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = self.build_without_trailer();
        out.push(0x3b);
        out
    }
}
