//! Textured mesh triangles grouped into faces.

use std::sync::Arc;

use kino_core::{Material, MeshFace, MeshTriangle};
use kino_math::{Aabb, DVec2, DVec3, Ray, Rotor};

use crate::primitives::Triangle;

/// A triangle with per-vertex UV coordinates for texture sampling.
///
/// Transforming a face triangle produces a new value; the wrapped
/// [`Triangle`] rebuilds its cached plane data from the moved vertices.
#[derive(Debug, Copy, Clone)]
pub struct FaceTriangle {
    pub triangle: Triangle,
    pub uv: [DVec2; 3],
}

impl FaceTriangle {
    pub fn new(triangle: Triangle, uv: [DVec2; 3]) -> Self {
        Self { triangle, uv }
    }

    pub fn from_mesh(t: &MeshTriangle) -> Self {
        Self {
            triangle: Triangle::new(t.positions[0], t.positions[1], t.positions[2]),
            uv: t.uvs,
        }
    }

    /// A copy placed by scale, rotation, and translation (applied in that
    /// order). UVs are untouched.
    pub fn transformed(&self, size: DVec3, rotor: &Rotor, position: DVec3) -> Self {
        let place = |v: DVec3| rotor.rotate(v * size) + position;
        Self {
            triangle: Triangle::new(
                place(self.triangle.v0),
                place(self.triangle.v1),
                place(self.triangle.v2),
            ),
            uv: self.uv,
        }
    }

    /// Intersect and interpolate the UV triple at the hit's barycentric
    /// weights.
    pub fn sample(&self, ray: &Ray, min_depth: f64) -> Option<(DVec2, f64)> {
        let (depth, w) = self.triangle.intersects(ray, min_depth)?;
        let uv = self.uv[0] * w.x + self.uv[1] * w.y + self.uv[2] * w.z;
        Some((uv, depth))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_point_set([self.triangle.v0, self.triangle.v1, self.triangle.v2])
    }

    pub fn centroid(&self) -> DVec3 {
        self.triangle.centroid()
    }
}

/// A material applied to one or more triangles.
#[derive(Debug, Clone)]
pub struct Face {
    pub material: Arc<Material>,
    pub triangles: Vec<FaceTriangle>,
}

impl Face {
    pub fn from_mesh(face: &MeshFace) -> Self {
        Self {
            material: face.material.clone(),
            triangles: face.triangles.iter().map(FaceTriangle::from_mesh).collect(),
        }
    }

    pub fn transformed(&self, size: DVec3, rotor: &Rotor, position: DVec3) -> Self {
        Self {
            material: self.material.clone(),
            triangles: self
                .triangles
                .iter()
                .map(|t| t.transformed(size, rotor, position))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_face_triangle() -> FaceTriangle {
        FaceTriangle::new(
            Triangle::new(
                DVec3::new(-1.0, -1.0, 5.0),
                DVec3::new(1.0, -1.0, 5.0),
                DVec3::new(0.0, 1.0, 5.0),
            ),
            [DVec2::new(0.0, 1.0), DVec2::new(1.0, 1.0), DVec2::new(0.5, 0.0)],
        )
    }

    #[test]
    fn test_uv_at_centroid() {
        let ft = unit_face_triangle();
        let ray = Ray::new(DVec3::ZERO, ft.centroid().normalize());
        let (uv, _) = ft.sample(&ray, 0.0).unwrap();
        // Equal weights average the three UVs.
        assert!((uv.x - 0.5).abs() < 1e-9);
        assert!((uv.y - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_round_trip() {
        let ft = unit_face_triangle();
        let size = DVec3::new(2.0, 3.0, 0.5);
        let rotation = DVec3::new(0.3, -0.8, 1.1);
        let position = DVec3::new(4.0, -2.0, 7.0);

        let rotor = Rotor::new(rotation);
        let placed = ft.transformed(size, &rotor, position);

        // Undo: translate back, inverse-rotate, unscale.
        let undo = |v: DVec3| rotor.inverse_rotate(v - position) / size;
        assert!((undo(placed.triangle.v0) - ft.triangle.v0).length() < 1e-9);
        assert!((undo(placed.triangle.v1) - ft.triangle.v1).length() < 1e-9);
        assert!((undo(placed.triangle.v2) - ft.triangle.v2).length() < 1e-9);
        assert_eq!(placed.uv, ft.uv);
    }

    #[test]
    fn test_bounds_encloses_vertices() {
        let ft = unit_face_triangle();
        let b = ft.bounds();
        assert!(b.x.min <= -1.0 && b.x.max >= 1.0);
        assert!(b.y.min <= -1.0 && b.y.max >= 1.0);
        assert!(b.z.contains(5.0));
    }
}
