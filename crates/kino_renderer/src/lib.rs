//! Kino Renderer - deterministic CPU scene rendering.
//!
//! Renders a time-varying 3D scene of geometric actors (spheres, boxes,
//! cubes, triangles, triangle meshes) into frames or a movie. Intersection
//! math runs against rotated analytic shapes in world space via precomputed
//! rotor coefficients; triangle meshes are accelerated with an arena BVH.
//! Scenes simulate into immutable per-frame snapshots, which movie renders
//! consume from a pool of worker threads claiming frames off a shared
//! counter.

mod actor;
mod builder;
mod bvh;
mod camera;
mod face;
mod model;
mod movie;
mod primitives;
mod renderer;
mod scene;

pub use actor::{Actor, ActorKind, Sample};
pub use builder::{ActorBuilder, SceneBuilder};
pub use bvh::Bvh;
pub use camera::{Camera, RayCaster};
pub use face::{Face, FaceTriangle};
pub use model::{Model, ModelHit};
pub use movie::{Movie, MovieError};
pub use primitives::{solve_quadratic, Cube, CubeFace, Cuboid, Roots, Sphere, Triangle};
pub use renderer::{CancelToken, MovieOptions, RenderError, Renderer};
pub use scene::{PointLight, Scene, SceneInstance, ThinkFn};

/// Re-export the math and asset crates' common types.
pub use kino_core::{
    alpha_blend, coord_shader, frag_shader, CoordShader, FRgba, FragShader, Frame, Material, Mesh,
    Rgba, Texture,
};
pub use kino_math::{Aabb, DVec2, DVec3, Interval, Ray, Rotor};
