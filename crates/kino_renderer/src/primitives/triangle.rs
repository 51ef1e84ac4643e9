//! Triangle intersection with barycentric weights.

use kino_math::{DVec3, Ray};

/// A triangle with cached edge vectors, unit normal, and plane offset.
///
/// Vertices are ordered counter-clockwise. A new triangle must be built
/// whenever the vertices move; the cached derivations are never patched in
/// place.
#[derive(Debug, Copy, Clone)]
pub struct Triangle {
    pub v0: DVec3,
    pub v1: DVec3,
    pub v2: DVec3,
    v01: DVec3,
    v12: DVec3,
    v20: DVec3,
    unit_norm: DVec3,
    d: f64,
}

impl Triangle {
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3) -> Self {
        let v01 = v1 - v0;
        let v12 = v2 - v1;
        let v20 = v0 - v2;
        let normal = (v2 - v0).cross(v01);
        let unit_norm = normal.normalize_or_zero();
        let d = -unit_norm.dot(v0);
        Self {
            v0,
            v1,
            v2,
            v01,
            v12,
            v20,
            unit_norm,
            d,
        }
    }

    /// Unit surface normal (zero for a degenerate triangle).
    pub fn normal(&self) -> DVec3 {
        self.unit_norm
    }

    pub fn centroid(&self) -> DVec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Intersection depth and barycentric weights `(w0, w1, w2)` for the
    /// three vertices. The weights sum to 1 and drive UV interpolation.
    ///
    /// A ray parallel to the triangle plane (`n . s == 0`) never hits, and
    /// never divides by zero.
    pub fn intersects(&self, ray: &Ray, min_depth: f64) -> Option<(f64, DVec3)> {
        let dot = self.unit_norm.dot(ray.direction);
        if dot == 0.0 {
            return None;
        }

        let t = -(self.d + self.unit_norm.dot(ray.origin)) / dot;
        if t < min_depth {
            return None;
        }

        let p = ray.at(t);
        let c2 = self.v01.cross(p - self.v0).dot(self.unit_norm);
        let c0 = self.v12.cross(p - self.v1).dot(self.unit_norm);
        let c1 = self.v20.cross(p - self.v2).dot(self.unit_norm);
        if c0 > 0.0 || c1 > 0.0 || c2 > 0.0 {
            return None;
        }

        // Sub-triangle areas, normalized. Each cross product above is twice
        // the signed area of the sub-triangle opposite a vertex.
        let total = c0 + c1 + c2;
        if total == 0.0 {
            return None;
        }
        let weights = DVec3::new(c0 / total, c1 / total, c2 / total);

        Some((t, weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> Triangle {
        Triangle::new(
            DVec3::new(-1.0, -1.0, 5.0),
            DVec3::new(1.0, -1.0, 5.0),
            DVec3::new(0.0, 1.0, 5.0),
        )
    }

    #[test]
    fn test_hit_through_centroid() {
        let tri = canonical();
        let ray = Ray::new(DVec3::ZERO, (tri.centroid() - DVec3::ZERO).normalize());

        let (t, w) = tri.intersects(&ray, 0.0).unwrap();
        assert!(t > 0.0);
        assert!((w.x + w.y + w.z - 1.0).abs() < 1e-9);
        assert!(w.x >= 0.0 && w.y >= 0.0 && w.z >= 0.0);
        // The centroid weights each vertex equally.
        assert!((w.x - 1.0 / 3.0).abs() < 1e-9);
        assert!((w.y - 1.0 / 3.0).abs() < 1e-9);
        assert!((w.z - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertex_weights() {
        let tri = canonical();
        // Aim just inside each vertex; the matching weight dominates.
        let targets = [
            (DVec3::new(-0.9, -0.9, 5.0), 0),
            (DVec3::new(0.9, -0.9, 5.0), 1),
            (DVec3::new(0.0, 0.9, 5.0), 2),
        ];
        for (target, vertex) in targets {
            let ray = Ray::new(DVec3::ZERO, target.normalize());
            let (_, w) = tri.intersects(&ray, 0.0).unwrap();
            let weights = [w.x, w.y, w.z];
            for (i, weight) in weights.iter().enumerate() {
                if i == vertex {
                    assert!(*weight > 0.8, "vertex {vertex}: {weights:?}");
                } else {
                    assert!(*weight < 0.2, "vertex {vertex}: {weights:?}");
                }
            }
        }
    }

    #[test]
    fn test_miss_outside_edges() {
        let tri = canonical();
        let ray = Ray::new(DVec3::ZERO, DVec3::new(2.0, 2.0, 5.0).normalize());
        assert!(tri.intersects(&ray, 0.0).is_none());
    }

    #[test]
    fn test_parallel_ray_no_hit() {
        let tri = canonical();
        // Direction lies in the triangle plane: dot(n, s) == 0.
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert!(tri.intersects(&ray, 0.0).is_none());
    }

    #[test]
    fn test_behind_min_depth_rejected() {
        let tri = canonical();
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        assert!(tri.intersects(&ray, 6.0).is_none());
        assert!(tri.intersects(&ray, 0.0).is_some());
    }

    #[test]
    fn test_backside_hit_still_registers() {
        // Approaching from the other side flips the plane dot sign but the
        // triangle still intersects.
        let tri = canonical();
        let ray = Ray::new(DVec3::new(0.0, 0.0, 10.0), -DVec3::Z);
        let (t, _) = tri.intersects(&ray, 0.0).unwrap();
        assert!((t - 5.0).abs() < 1e-9);
    }
}
