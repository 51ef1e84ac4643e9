//! Virtual camera and ray generation.

use kino_math::{DVec2, DVec3, Ray, Rotor};

/// Virtual camera for viewing the scene.
///
/// A `focal_length` of 0 selects orthographic projection: rays share the
/// rotated forward direction and their origins sweep a screen plane of
/// world-space extent `screen_size`. Any other focal length is perspective:
/// rays fan out from the camera center through a screen plane sized by
/// `fov` at the focal distance.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// World position of the camera center.
    pub center: DVec3,
    /// Rotation of the view direction, radians per axis.
    pub rotation: DVec3,
    /// Horizontal/vertical field of view in degrees (perspective only).
    pub fov: DVec2,
    /// Focal distance; 0 selects orthographic projection.
    pub focal_length: f64,
    /// World extent of the screen plane (orthographic only).
    pub screen_size: DVec2,
}

impl Camera {
    pub fn perspective(center: DVec3, rotation: DVec3, fov_degrees: DVec2, focal_length: f64) -> Self {
        Self {
            center,
            rotation,
            fov: fov_degrees,
            focal_length,
            screen_size: DVec2::ZERO,
        }
    }

    pub fn orthographic(center: DVec3, rotation: DVec3, screen_size: DVec2) -> Self {
        Self {
            center,
            rotation,
            fov: DVec2::ZERO,
            focal_length: 0.0,
            screen_size,
        }
    }

    /// Precompute per-frame ray generation state (the rotor and screen
    /// extents) for a target resolution.
    pub fn caster(&self, resolution: DVec2) -> RayCaster {
        let rotor = Rotor::new(self.rotation);
        let mode = if self.focal_length == 0.0 {
            Projection::Orthographic {
                half: self.screen_size / 2.0,
            }
        } else {
            Projection::Perspective {
                half: DVec2::new(
                    self.focal_length * (self.fov.x.to_radians() / 2.0).tan(),
                    self.focal_length * (self.fov.y.to_radians() / 2.0).tan(),
                ),
                focal_length: self.focal_length,
            }
        };
        RayCaster {
            rotor,
            resolution,
            mode,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(DVec3::ZERO, DVec3::ZERO, DVec2::splat(60.0), 1.0)
    }
}

enum Projection {
    Orthographic { half: DVec2 },
    Perspective { half: DVec2, focal_length: f64 },
}

/// Screen-position-to-ray converter for one camera at one resolution.
/// Rays are camera-relative: a perspective origin is the zero vector.
pub struct RayCaster {
    rotor: Rotor,
    resolution: DVec2,
    mode: Projection,
}

impl RayCaster {
    /// World ray (camera-relative) through the given screen position.
    pub fn ray(&self, screen_pos: DVec2) -> Ray {
        let mut norm = screen_pos * 2.0 / self.resolution - DVec2::ONE;
        norm.y = -norm.y;

        match &self.mode {
            Projection::Orthographic { half } => {
                let origin = self
                    .rotor
                    .rotate(DVec3::new(half.x * norm.x, half.y * norm.y, 0.0));
                let direction = self.rotor.rotate(DVec3::Z);
                Ray::new(origin, direction)
            }
            Projection::Perspective { half, focal_length } => {
                let direction = self
                    .rotor
                    .rotate(DVec3::new(half.x * norm.x, half.y * norm.y, *focal_length))
                    .normalize();
                Ray::new(DVec3::ZERO, direction)
            }
        }
    }
}
