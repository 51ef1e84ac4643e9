//! Mesh geometry representation.
//!
//! A mesh is a list of faces, each holding a material and the triangles it
//! was tessellated into. This is the renderer-agnostic interchange form
//! produced by the OBJ loader; the renderer turns it into its own
//! intersection structures.

use std::sync::Arc;

use kino_math::{Aabb, DVec2, DVec3};

use crate::material::Material;

/// A single triangle with per-vertex UV coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangle {
    pub positions: [DVec3; 3],
    pub uvs: [DVec2; 3],
}

impl MeshTriangle {
    pub fn new(positions: [DVec3; 3], uvs: [DVec2; 3]) -> Self {
        Self { positions, uvs }
    }
}

/// A face: one material applied to one or more triangles.
#[derive(Clone, Debug)]
pub struct MeshFace {
    pub material: Arc<Material>,
    pub triangles: Vec<MeshTriangle>,
}

/// Triangle-mesh geometry grouped by face.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub faces: Vec<MeshFace>,
}

impl Mesh {
    pub fn new(faces: Vec<MeshFace>) -> Self {
        Self { faces }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(|f| f.triangles.is_empty())
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.triangles.len()).sum()
    }

    /// Bounding box over every vertex of every face.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_point_set(
            self.faces
                .iter()
                .flat_map(|f| f.triangles.iter())
                .flat_map(|t| t.positions),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(z: f64) -> MeshTriangle {
        MeshTriangle::new(
            [
                DVec3::new(-1.0, -1.0, z),
                DVec3::new(1.0, -1.0, z),
                DVec3::new(0.0, 1.0, z),
            ],
            [DVec2::ZERO, DVec2::X, DVec2::new(0.5, 1.0)],
        )
    }

    #[test]
    fn test_triangle_count() {
        let mesh = Mesh::new(vec![
            MeshFace {
                material: Arc::new(Material::default()),
                triangles: vec![tri(0.0), tri(1.0)],
            },
            MeshFace {
                material: Arc::new(Material::default()),
                triangles: vec![tri(2.0)],
            },
        ]);
        assert_eq!(mesh.triangle_count(), 3);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_bounds() {
        let mesh = Mesh::new(vec![MeshFace {
            material: Arc::new(Material::default()),
            triangles: vec![tri(0.0), tri(3.0)],
        }]);
        let b = mesh.bounds();
        assert_eq!(b.x.min, -1.0);
        assert_eq!(b.x.max, 1.0);
        assert_eq!(b.z.max, 3.0);
    }

    #[test]
    fn test_empty_mesh() {
        assert!(Mesh::default().is_empty());
        assert_eq!(Mesh::default().triangle_count(), 0);
    }
}
