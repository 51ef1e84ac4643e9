//! Wavefront OBJ/MTL loading.
//!
//! Line-oriented parsing of the OBJ subset used for mesh interchange:
//! `v`, `vt`, `vn`, `f` (with `v`, `v/vt`, `v/vt/vn`, and `v//vn` index
//! groups), `mtllib`, and `usemtl`, plus the companion MTL subset
//! (`newmtl`, `Kd`, `map_Kd`).
//!
//! A missing OBJ file is an error and aborts loading that file only. All
//! other degradations - a missing MTL file, an unknown material name, a
//! face referencing out-of-range indices, an unreadable `map_Kd` image -
//! are logged as warnings and parsing continues with defaults.

mod mtl;
mod parser;

use std::path::Path;

use thiserror::Error;

use crate::mesh::Mesh;

pub use parser::parse_obj;

/// Errors that can occur while loading an OBJ file.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed OBJ data at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

pub type ObjResult<T> = Result<T, ObjError>;

/// Load a mesh from an OBJ file on disk. Referenced MTL files and textures
/// are resolved relative to the OBJ file's directory.
pub fn load_obj(path: impl AsRef<Path>) -> ObjResult<Mesh> {
    let path = path.as_ref();
    log::info!("Loading mesh from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_obj(&content, path.parent())
}
