//! Bounding volume hierarchy over mesh triangles.
//!
//! Nodes live in a flat arena addressed by index, so traversal walks a
//! contiguous allocation instead of chasing heap pointers. The build
//! bisects the candidate set at the median of a cycling axis; each
//! recursive call receives three presorted index lists (one per axis)
//! filtered against the parent's half, so no level ever re-sorts.

use kino_math::{Aabb, Interval, Ray};

use crate::face::FaceTriangle;

#[derive(Debug, Clone)]
enum Node {
    Branch { bbox: Aabb, left: u32, right: u32 },
    Leaf { bbox: Aabb, triangle: u32 },
}

/// Spatial index accelerating "which triangles might this ray hit" queries.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<Node>,
    root: u32,
}

impl Bvh {
    /// Build over the given triangles. Returns `None` for an empty set.
    ///
    /// Every input triangle ends up in exactly one leaf; leaves hold
    /// exactly one triangle.
    pub fn build(triangles: &[FaceTriangle]) -> Option<Bvh> {
        if triangles.is_empty() {
            return None;
        }

        let sorted_by = |axis: usize| -> Vec<u32> {
            let mut ids: Vec<u32> = (0..triangles.len() as u32).collect();
            ids.sort_by(|&a, &b| {
                let ca = triangles[a as usize].centroid()[axis];
                let cb = triangles[b as usize].centroid()[axis];
                ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
            });
            ids
        };

        let mut builder = Builder {
            triangles,
            nodes: Vec::with_capacity(triangles.len() * 2),
        };
        let root = builder.build_node(sorted_by(0), sorted_by(1), sorted_by(2), 0);

        log::debug!(
            "Built BVH over {} triangles ({} nodes)",
            triangles.len(),
            builder.nodes.len()
        );

        Some(Bvh {
            nodes: builder.nodes,
            root,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Collect the triangle indices of every leaf whose bounding box chain
    /// the ray passes through: a conservative superset of the true
    /// intersection set. Exact containment is re-checked by the triangles
    /// themselves.
    pub fn candidates(&self, ray: &Ray, out: &mut Vec<u32>) {
        self.walk(self.root, ray, out);
    }

    fn walk(&self, node: u32, ray: &Ray, out: &mut Vec<u32>) {
        match &self.nodes[node as usize] {
            Node::Leaf { bbox, triangle } => {
                if bbox.hit(ray, Interval::new(0.0, f64::INFINITY)) {
                    out.push(*triangle);
                }
            }
            Node::Branch { bbox, left, right } => {
                if bbox.hit(ray, Interval::new(0.0, f64::INFINITY)) {
                    self.walk(*left, ray, out);
                    self.walk(*right, ray, out);
                }
            }
        }
    }

    #[cfg(test)]
    fn leaf_triangles(&self) -> Vec<u32> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Leaf { triangle, .. } => Some(*triangle),
                Node::Branch { .. } => None,
            })
            .collect()
    }
}

struct Builder<'a> {
    triangles: &'a [FaceTriangle],
    nodes: Vec<Node>,
}

impl Builder<'_> {
    fn build_node(
        &mut self,
        sorted_x: Vec<u32>,
        sorted_y: Vec<u32>,
        sorted_z: Vec<u32>,
        axis: usize,
    ) -> u32 {
        let bbox = self.bounds(&sorted_x);

        if sorted_x.len() == 1 {
            self.nodes.push(Node::Leaf {
                bbox,
                triangle: sorted_x[0],
            });
            return (self.nodes.len() - 1) as u32;
        }

        let primary = match axis {
            0 => &sorted_x,
            1 => &sorted_y,
            _ => &sorted_z,
        };
        let mid = primary.len() / 2;
        let left_half: Vec<u32> = primary[..mid].to_vec();
        let right_half: Vec<u32> = primary[mid..].to_vec();

        let mut in_left = vec![false; self.triangles.len()];
        for &id in &left_half {
            in_left[id as usize] = true;
        }
        let split = |ids: &[u32]| -> (Vec<u32>, Vec<u32>) {
            ids.iter().partition(|&&id| in_left[id as usize])
        };

        let next = (axis + 1) % 3;
        let (left, right) = match axis {
            0 => {
                let (ly, ry) = split(&sorted_y);
                let (lz, rz) = split(&sorted_z);
                (
                    self.build_node(left_half, ly, lz, next),
                    self.build_node(right_half, ry, rz, next),
                )
            }
            1 => {
                let (lx, rx) = split(&sorted_x);
                let (lz, rz) = split(&sorted_z);
                (
                    self.build_node(lx, left_half, lz, next),
                    self.build_node(rx, right_half, rz, next),
                )
            }
            _ => {
                let (lx, rx) = split(&sorted_x);
                let (ly, ry) = split(&sorted_y);
                (
                    self.build_node(lx, ly, left_half, next),
                    self.build_node(rx, ry, right_half, next),
                )
            }
        };

        self.nodes.push(Node::Branch { bbox, left, right });
        (self.nodes.len() - 1) as u32
    }

    fn bounds(&self, ids: &[u32]) -> Aabb {
        ids.iter().fold(Aabb::EMPTY, |acc, &id| {
            Aabb::surrounding(&acc, &self.triangles[id as usize].bounds())
        })
    }
}
