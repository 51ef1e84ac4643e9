//! Placed triangle-mesh geometry.

use kino_core::{Mesh, Rgba};
use kino_math::{DVec2, DVec3, Ray, Rotor};

use crate::bvh::Bvh;
use crate::face::Face;

/// One true hit of a ray against a model triangle.
#[derive(Debug, Copy, Clone)]
pub struct ModelHit {
    pub color: Rgba,
    pub uv: DVec2,
    pub normal: DVec3,
    pub distance: f64,
}

/// A mesh's faces plus the BVH over all their triangles.
///
/// Immutable once built. When an actor or the camera moves, a new model is
/// produced by re-placing the base model's triangles - the BVH partition is
/// bound to fixed triangle positions, so it is rebuilt rather than patched.
#[derive(Debug, Clone)]
pub struct Model {
    faces: Vec<Face>,
    /// Flat triangle id -> (face, triangle-within-face).
    tri_refs: Vec<(u32, u32)>,
    bvh: Option<Bvh>,
}

impl Model {
    /// Build a model from interchange mesh data, at rest (unplaced).
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self::from_faces(mesh.faces.iter().map(Face::from_mesh).collect())
    }

    fn from_faces(faces: Vec<Face>) -> Self {
        let mut tri_refs = Vec::new();
        for (fi, face) in faces.iter().enumerate() {
            for ti in 0..face.triangles.len() {
                tri_refs.push((fi as u32, ti as u32));
            }
        }

        let triangles: Vec<_> = tri_refs
            .iter()
            .map(|&(fi, ti)| faces[fi as usize].triangles[ti as usize])
            .collect();
        let bvh = Bvh::build(&triangles);

        Self {
            faces,
            tri_refs,
            bvh,
        }
    }

    /// A copy of this model with every triangle scaled, rotated, and
    /// translated, and the BVH rebuilt over the moved triangles.
    pub fn transformed(&self, size: DVec3, rotation: DVec3, position: DVec3) -> Self {
        let rotor = Rotor::new(rotation);
        Self::from_faces(
            self.faces
                .iter()
                .map(|f| f.transformed(size, &rotor, position))
                .collect(),
        )
    }

    pub fn triangle_count(&self) -> usize {
        self.tri_refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tri_refs.is_empty()
    }

    /// All true hits along the ray, in BVH-candidate order. A ray may cross
    /// several mesh faces; depth sorting is the caller's concern.
    pub fn sample(&self, ray: &Ray, min_depth: f64) -> Vec<ModelHit> {
        let Some(bvh) = &self.bvh else {
            return Vec::new();
        };

        let mut candidates = Vec::new();
        bvh.candidates(ray, &mut candidates);

        let mut hits = Vec::new();
        for id in candidates {
            let (fi, ti) = self.tri_refs[id as usize];
            let face = &self.faces[fi as usize];
            let triangle = &face.triangles[ti as usize];
            if let Some((uv, distance)) = triangle.sample(ray, min_depth) {
                hits.push(ModelHit {
                    color: face.material.diffuse.sample(uv),
                    uv,
                    normal: triangle.triangle.normal(),
                    distance,
                });
            }
        }
        hits
    }
}
