//! Texture storage and sampling.

use std::path::Path;

use kino_math::DVec2;
use thiserror::Error;

use crate::color::Rgba;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A texture that can be assigned to actors and materials within a scene.
///
/// Pixels are stored row-major, top row first. UV coordinates wrap into
/// [0, 1] with `u` running left to right and `v = 0` at the top row; the
/// per-shape UV mappings already produce image-oriented coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Texture {
    /// Construct a texture filled with the given color.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// A 1x1 solid-color texture.
    pub fn solid(color: Rgba) -> Self {
        Self::filled(1, 1, color)
    }

    /// Construct from raw pixels. The pixel count must match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Load a texture from an image file on disk.
    pub fn from_file(path: &Path) -> TextureResult<Self> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| Rgba::new(p.0[0], p.0[1], p.0[2], p.0[3]))
            .collect();

        log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texture dimensions as a vector, for shader inputs.
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64)
    }

    /// Get the pixel at integer coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Nearest-neighbor sample at wrapped UV coordinates.
    pub fn sample(&self, uv: DVec2) -> Rgba {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);
        let x = (u * (self.width - 1) as f64).round() as u32;
        let y = (v * (self.height - 1) as f64).round() as u32;
        self.pixel(x.min(self.width - 1), y.min(self.height - 1))
    }
}

impl Default for Texture {
    /// A 1x1 fully transparent texture.
    fn default() -> Self {
        Self::solid(Rgba::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_sample() {
        let tex = Texture::solid(Rgba::opaque(10, 20, 30));
        assert_eq!(tex.sample(DVec2::new(0.0, 0.0)), Rgba::opaque(10, 20, 30));
        assert_eq!(tex.sample(DVec2::new(0.9, 0.4)), Rgba::opaque(10, 20, 30));
    }

    #[test]
    fn test_sample_corners() {
        // 2x2 checker: top row red/green, bottom row blue/white
        let tex = Texture::from_pixels(
            2,
            2,
            vec![
                Rgba::opaque(255, 0, 0),
                Rgba::opaque(0, 255, 0),
                Rgba::opaque(0, 0, 255),
                Rgba::WHITE,
            ],
        );
        assert_eq!(tex.sample(DVec2::new(0.0, 0.0)), Rgba::opaque(255, 0, 0));
        assert_eq!(tex.sample(DVec2::new(1.0 - 1e-9, 0.0)), Rgba::opaque(0, 255, 0));
        assert_eq!(tex.sample(DVec2::new(0.0, 1.0 - 1e-9)), Rgba::opaque(0, 0, 255));
    }

    #[test]
    fn test_sample_wraps() {
        let tex = Texture::from_pixels(2, 1, vec![Rgba::BLACK, Rgba::WHITE]);
        assert_eq!(
            tex.sample(DVec2::new(1.25, 0.0)),
            tex.sample(DVec2::new(0.25, 0.0))
        );
        assert_eq!(
            tex.sample(DVec2::new(-0.75, 0.0)),
            tex.sample(DVec2::new(0.25, 0.0))
        );
    }

    #[test]
    fn test_default_is_transparent() {
        let tex = Texture::default();
        assert_eq!(tex.sample(DVec2::ZERO).a, 0);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Texture::from_file(Path::new("no_such_texture.png")).is_err());
    }
}
