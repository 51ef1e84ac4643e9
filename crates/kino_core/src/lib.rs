//! Kino Core - colors, textures, meshes, and frames for the kino renderer.
//!
//! This crate provides:
//!
//! - **Color types**: [`Rgba`], [`FRgba`], and the [`alpha_blend`] operator
//! - **Assets**: [`Texture`], [`Material`], [`Frame`]
//! - **Geometry interchange**: [`Mesh`] and the OBJ/MTL loader in [`obj`]
//! - **Shader hooks**: [`FragShader`] and [`CoordShader`] chains
//!
//! # Example
//!
//! ```ignore
//! use kino_core::obj::load_obj;
//!
//! let mesh = load_obj("teapot.obj")?;
//! println!("Loaded {} faces", mesh.faces.len());
//! ```

pub mod color;
pub mod frame;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod shader;
pub mod texture;

// Re-export commonly used types
pub use color::{alpha_blend, FRgba, Rgba};
pub use frame::Frame;
pub use material::Material;
pub use mesh::{Mesh, MeshFace, MeshTriangle};
pub use shader::{coord_shader, frag_shader, CoordShader, FragShader};
pub use texture::{Texture, TextureError};
