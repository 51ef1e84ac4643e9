//! Mesh surface materials.

use std::sync::Arc;

use crate::texture::Texture;

/// A mesh material: a name and the diffuse texture sampled at interpolated
/// face UVs. Flat-colored materials use a 1x1 texture.
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub diffuse: Arc<Texture>,
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: Texture) -> Self {
        Self {
            name: name.into(),
            diffuse: Arc::new(diffuse),
        }
    }
}

impl Default for Material {
    /// The fallback for missing or unresolved materials: unnamed, fully
    /// transparent.
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse: Arc::new(Texture::default()),
        }
    }
}
