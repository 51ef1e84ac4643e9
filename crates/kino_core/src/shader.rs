//! Shader hook types.
//!
//! Shaders are plain closures held in explicit ordered lists; a chain is
//! applied front to back, each stage receiving the previous stage's output.

use std::sync::Arc;

use kino_math::DVec2;

use crate::color::FRgba;

/// A fragment shader: `(color_in, frag_coord, resolution, time) -> color_out`.
pub type FragShader = Arc<dyn Fn(FRgba, DVec2, DVec2, f64) -> FRgba + Send + Sync>;

/// A coordinate shader remapping a screen position before ray generation:
/// `(pos_in, resolution, time) -> pos_out`.
pub type CoordShader = Arc<dyn Fn(DVec2, DVec2, f64) -> DVec2 + Send + Sync>;

/// Wrap a closure as a [`FragShader`].
pub fn frag_shader(f: impl Fn(FRgba, DVec2, DVec2, f64) -> FRgba + Send + Sync + 'static) -> FragShader {
    Arc::new(f)
}

/// Wrap a closure as a [`CoordShader`].
pub fn coord_shader(f: impl Fn(DVec2, DVec2, f64) -> DVec2 + Send + Sync + 'static) -> CoordShader {
    Arc::new(f)
}

/// Run a fragment shader chain in order.
pub fn run_frag_chain(
    shaders: &[FragShader],
    mut color: FRgba,
    coord: DVec2,
    res: DVec2,
    time: f64,
) -> FRgba {
    for shader in shaders {
        color = shader(color, coord, res, time);
    }
    color
}

/// Run a coordinate shader chain in order.
pub fn run_coord_chain(shaders: &[CoordShader], mut pos: DVec2, res: DVec2, time: f64) -> DVec2 {
    for shader in shaders {
        pos = shader(pos, res, time);
    }
    pos
}
