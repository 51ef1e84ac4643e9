//! Rotated box intersection.

use kino_math::{DVec3, Ray, Rotor};

use super::{solve_quadratic, Roots};

/// Slack for the dominant-axis containment check. Note the Cube variant
/// validates with a far looser 1e-3 face-plane tolerance.
const FACE_EPSILON: f64 = 1e-14;

/// A rotated box, positioned relative to the active camera.
///
/// Each pair of opposing faces is one quadratic (the squared rotated
/// component along that axis equals the squared half-extent). A candidate
/// root is real only if, rotated back into the box frame, the tested axis
/// is the dominant normalized component - the other components then lie
/// within the face square. The comparison carries a little slack so
/// floating error at the boundary does not drop true grazing hits.
#[derive(Debug, Copy, Clone)]
pub struct Cuboid {
    pub position: DVec3,
    half: DVec3,
    rotor: Rotor,
}

impl Cuboid {
    pub fn new(position: DVec3, half_extents: DVec3, rotation: DVec3) -> Self {
        Self {
            position,
            half: half_extents,
            rotor: Rotor::new(rotation),
        }
    }

    pub fn rotor(&self) -> &Rotor {
        &self.rotor
    }

    pub fn half_extents(&self) -> DVec3 {
        self.half
    }

    /// The hit offset rotated into the box frame, normalized per axis so
    /// face planes sit at +-1.
    pub fn local_at(&self, ray: &Ray, t: f64) -> DVec3 {
        self.rotor.rotate(ray.at(t) - self.position) / self.half
    }

    fn validate(&self, ray: &Ray, t: f64, axis: usize) -> bool {
        let local = self.local_at(ray, t).abs();
        let q = local[axis];
        (0..3).all(|other| other == axis || q + FACE_EPSILON >= local[other])
    }

    /// Roots against the box faces, `min_depth`-filtered.
    pub fn intersects(&self, ray: &Ray, min_depth: f64) -> Option<Roots> {
        let p = self.position - ray.origin;
        let s = ray.direction;

        let mut near = f64::INFINITY;
        let mut far = f64::INFINITY;

        for axis in 0..3 {
            let (a, b, mut c) = self.rotor.axis_quadric(axis, s, p);
            c -= self.half[axis] * self.half[axis];
            let Some(roots) = solve_quadratic(a, b, c, min_depth) else {
                continue;
            };

            if self.validate(ray, roots.far, axis) {
                far = roots.far;
            }
            if roots.near.is_finite() && self.validate(ray, roots.near, axis) {
                near = roots.near;
            }
            if near.is_finite() && far.is_finite() {
                break;
            }
        }

        far.is_finite().then_some(Roots { near, far })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_hit() {
        let cuboid = Cuboid::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ONE, DVec3::ZERO);
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);

        let roots = cuboid.intersects(&ray, 0.0).unwrap();
        assert!((roots.near - 4.0).abs() < 1e-9);
        assert!((roots.far - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_miss_beside_box() {
        let cuboid = Cuboid::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ONE, DVec3::ZERO);
        let ray = Ray::new(DVec3::new(3.0, 0.0, 0.0), DVec3::Z);
        assert!(cuboid.intersects(&ray, 0.0).is_none());
    }

    #[test]
    fn test_off_center_hit_through_side() {
        let cuboid = Cuboid::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ONE, DVec3::ZERO);
        // Enters through the -X face
        let ray = Ray::new(DVec3::new(-5.0, 0.0, 5.0), DVec3::X);
        let roots = cuboid.intersects(&ray, 0.0).unwrap();
        assert!((roots.near - 4.0).abs() < 1e-9);
        assert!((roots.far - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_45_degrees_widens_silhouette() {
        use std::f64::consts::FRAC_PI_4;
        // Rotated about Y by 45 degrees, the box's diagonal faces the ray.
        let plain = Cuboid::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ONE, DVec3::ZERO);
        let turned = Cuboid::new(
            DVec3::new(0.0, 0.0, 5.0),
            DVec3::ONE,
            DVec3::new(0.0, FRAC_PI_4, 0.0),
        );

        // x = 1.2 misses the axis-aligned box but hits the rotated one
        // (diagonal half-width sqrt(2)).
        let ray = Ray::new(DVec3::new(1.2, 0.0, 0.0), DVec3::Z);
        assert!(plain.intersects(&ray, 0.0).is_none());
        assert!(turned.intersects(&ray, 0.0).is_some());
    }

    #[test]
    fn test_min_depth_culls_near_face() {
        let cuboid = Cuboid::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ONE, DVec3::ZERO);
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        let roots = cuboid.intersects(&ray, 4.5).unwrap();
        assert_eq!(roots.near, f64::INFINITY);
        assert!((roots.far - 6.0).abs() < 1e-9);
    }
}
