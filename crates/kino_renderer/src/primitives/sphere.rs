//! Ellipsoid intersection.

use kino_math::{DVec3, Ray, Rotor};

use super::{solve_quadratic, Roots};

/// A rotated ellipsoid, positioned relative to the active camera.
///
/// The quadric `|R (x - pos)|^2 scaled by radii = 1` is expanded in world
/// space through the rotor coefficient groups, so no per-ray rotation is
/// needed. The squared radii and rotor are cached; rebuilding the sphere is
/// required whenever its rotation or radii change.
#[derive(Debug, Copy, Clone)]
pub struct Sphere {
    pub position: DVec3,
    radii2: DVec3,
    rotor: Rotor,
}

impl Sphere {
    pub fn new(position: DVec3, radii: DVec3, rotation: DVec3) -> Self {
        Self {
            position,
            radii2: radii * radii,
            rotor: Rotor::new(rotation),
        }
    }

    pub fn rotor(&self) -> &Rotor {
        &self.rotor
    }

    /// Roots of the ellipsoid equation along `ray`, `min_depth`-filtered.
    pub fn intersects(&self, ray: &Ray, min_depth: f64) -> Option<Roots> {
        let p = self.position - ray.origin;
        let s = ray.direction;

        let mut a = 0.0;
        let mut b = 0.0;
        let mut c = -1.0;
        for axis in 0..3 {
            let (ga, gb, gc) = self.rotor.axis_quadric(axis, s, p);
            a += ga / self.radii2[axis];
            b += gb / self.radii2[axis];
            c += gc / self.radii2[axis];
        }

        solve_quadratic(a, b, c, min_depth)
    }
}
