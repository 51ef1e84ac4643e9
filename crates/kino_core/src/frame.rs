//! Render output frames.

use std::path::Path;

use crate::color::Rgba;
use crate::texture::TextureResult;

const CHANNELS: u32 = 4;

/// A single rendered frame: a tightly packed RGBA8 buffer that can be
/// exported as an image file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Frame {
    /// Creates an empty (transparent black) frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0; (width * height * CHANNELS) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba {
        let i = ((y * self.width + x) * CHANNELS) as usize;
        Rgba::new(
            self.buffer[i],
            self.buffer[i + 1],
            self.buffer[i + 2],
            self.buffer[i + 3],
        )
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let i = ((y * self.width + x) * CHANNELS) as usize;
        self.buffer[i] = color.r;
        self.buffer[i + 1] = color.g;
        self.buffer[i + 2] = color.b;
        self.buffer[i + 3] = color.a;
    }

    /// The raw RGBA byte buffer, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.buffer
    }

    /// Export the frame; the image format is inferred from the extension
    /// (png, bmp, ...).
    pub fn save(&self, path: &Path) -> TextureResult<()> {
        image::save_buffer(
            path,
            &self.buffer,
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }

    /// Load a frame back from an image file.
    pub fn load(path: &Path) -> TextureResult<Self> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            buffer: img.into_raw(),
        })
    }
}
