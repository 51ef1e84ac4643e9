//! Color types and composition.

/// An 8-bit RGBA color. The default is fully transparent black.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
}

/// A floating-point RGBA color with channels in [0, 1].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FRgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl FRgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grayscale color, used by the depth-map output pass.
    pub const fn gray(v: f64) -> Self {
        Self {
            r: v,
            g: v,
            b: v,
            a: 1.0,
        }
    }

    /// Scale the RGB channels, leaving alpha untouched.
    pub fn scale_rgb(&self, s: f64) -> FRgba {
        FRgba::new(self.r * s, self.g * s, self.b * s, self.a)
    }
}

impl From<Rgba> for FRgba {
    fn from(c: Rgba) -> Self {
        FRgba::new(
            c.r as f64 / 255.0,
            c.g as f64 / 255.0,
            c.b as f64 / 255.0,
            c.a as f64 / 255.0,
        )
    }
}

impl From<FRgba> for Rgba {
    fn from(c: FRgba) -> Self {
        let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba::new(to_byte(c.r), to_byte(c.g), to_byte(c.b), to_byte(c.a))
    }
}

/// Blend two colors based on the top color's alpha.
///
/// `top` is the color closer to the camera. The RGB result is
/// `top.rgb * top.a + bottom.rgb * (1 - top.a)`; the result alpha is the top
/// alpha passed through unchanged rather than accumulated over-composition.
/// Painter's-algorithm folds over depth-sorted samples rely on exactly this
/// rule.
pub fn alpha_blend(top: FRgba, bottom: FRgba) -> FRgba {
    let t = top.a;
    FRgba::new(
        top.r * t + bottom.r * (1.0 - t),
        top.g * t + bottom.g * (1.0 - t),
        top.b * t + bottom.b * (1.0 - t),
        top.a,
    )
}
