//! Ray intersection primitives.
//!
//! All primitive geometry is expressed relative to the active camera: actor
//! positions are stored camera-relative and rays carry camera-relative
//! origins. Each shape answers `intersects(ray, min_depth)` with ordered
//! roots; roots closer than `min_depth` (the near clip, or an
//! already-closer hit during shadow tests) are rejected.

mod cube;
mod cuboid;
mod sphere;
mod triangle;

pub use cube::{Cube, CubeFace};
pub use cuboid::Cuboid;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Ordered quadric roots along a ray. `near <= far` always holds; `near` is
/// infinite when the nearer root was culled by `min_depth` (the ray origin
/// is inside the shape).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Roots {
    pub near: f64,
    pub far: f64,
}

/// Solve `a*t^2 + b*t + c = 0` and keep the roots at or beyond `min_depth`.
///
/// Returns `None` when there is no real root past `min_depth`, or when the
/// equation degenerates (`a == 0`) - degenerate geometry never divides by
/// zero.
pub fn solve_quadratic(a: f64, b: f64, c: f64, min_depth: f64) -> Option<Roots> {
    if a == 0.0 || !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt = discriminant.sqrt();
    let t0 = (-b - sqrt) / (2.0 * a);
    let t1 = (-b + sqrt) / (2.0 * a);
    let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };

    if far < min_depth {
        return None;
    }
    Some(Roots {
        near: if near < min_depth { f64::INFINITY } else { near },
        far,
    })
}
