//! Rotated cube intersection with face reporting.

use kino_math::{DVec3, Ray, Rotor};

use super::{solve_quadratic, Roots};

/// Face-plane tolerance. Much looser than the Cuboid's 1e-14 slack;
/// preserved per shape.
const FACE_EPSILON: f64 = 1e-3;

/// Rotation substituted on the Y axis to dodge the face-selection
/// singularity of an exactly axis-aligned cube.
const ROTATION_NUDGE: f64 = 1e-14;

/// Which face of a cube a root hit. Needed for planar UV mapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, true) => CubeFace::PosX,
            (0, false) => CubeFace::NegX,
            (1, true) => CubeFace::PosY,
            (1, false) => CubeFace::NegY,
            (2, true) => CubeFace::PosZ,
            _ => CubeFace::NegZ,
        }
    }

    /// Outward unit normal in the cube's local frame.
    pub fn local_normal(&self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::X,
            CubeFace::NegX => -DVec3::X,
            CubeFace::PosY => DVec3::Y,
            CubeFace::NegY => -DVec3::Y,
            CubeFace::PosZ => DVec3::Z,
            CubeFace::NegZ => -DVec3::Z,
        }
    }
}

/// Like [`super::Cuboid`], but each accepted root also reports the face it
/// lies on, and a candidate must sit on the face plane within the (loose)
/// tolerance.
#[derive(Debug, Copy, Clone)]
pub struct Cube {
    pub position: DVec3,
    half: DVec3,
    rotor: Rotor,
}

impl Cube {
    pub fn new(position: DVec3, half_extents: DVec3, rotation: DVec3) -> Self {
        let rotation = DVec3::new(
            rotation.x,
            if rotation.y == 0.0 {
                ROTATION_NUDGE
            } else {
                rotation.y
            },
            rotation.z,
        );
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

    /// The hit offset rotated into the cube frame, normalized per axis so
    /// face planes sit at +-1.
    pub fn local_at(&self, ray: &Ray, t: f64) -> DVec3 {
        self.rotor.rotate(ray.at(t) - self.position) / self.half
    }

    fn validate(&self, ray: &Ray, t: f64, axis: usize) -> Option<CubeFace> {
        let local = self.local_at(ray, t);
        let abs = local.abs();
        let q = abs[axis];
        let on_face = (q - 1.0).abs() <= FACE_EPSILON;
        let dominant = (0..3).all(|other| other == axis || q > abs[other]);
        (on_face && dominant).then(|| CubeFace::from_axis(axis, local[axis] > 0.0))
    }

    /// Roots against the cube faces plus the face each root hit,
    /// `min_depth`-filtered.
    pub fn intersects(&self, ray: &Ray, min_depth: f64) -> Option<(Roots, CubeFace, CubeFace)> {
        let p = self.position - ray.origin;
        let s = ray.direction;

        let mut near = f64::INFINITY;
        let mut far = f64::INFINITY;
        let mut near_face = CubeFace::PosX;
        let mut far_face = CubeFace::PosX;

        for axis in 0..3 {
            let (a, b, mut c) = self.rotor.axis_quadric(axis, s, p);
            c -= self.half[axis] * self.half[axis];
            let Some(roots) = solve_quadratic(a, b, c, min_depth) else {
                continue;
            };

            if let Some(face) = self.validate(ray, roots.far, axis) {
                far = roots.far;
                far_face = face;
            }
            if roots.near.is_finite() {
                if let Some(face) = self.validate(ray, roots.near, axis) {
                    near = roots.near;
                    near_face = face;
                }
            }
            if near.is_finite() && far.is_finite() {
                break;
            }
        }

        far.is_finite()
            .then_some((Roots { near, far }, near_face, far_face))
    }
}
