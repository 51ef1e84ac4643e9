use crate::DVec3;

/// A ray in 3D space with origin, direction, and the precomputed
/// component-wise inverse of the direction.
///
/// Rays represent a line starting at `origin` and traveling in `direction`.
/// The inverse is cached at construction so that slab tests against bounding
/// boxes avoid a division per axis per query.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
    pub inv: DVec3,
}

impl Ray {
    /// Create a new ray. A zero direction component yields an infinite
    /// inverse component, which the slab test handles.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            inv: direction.recip(),
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}
