//! MTL material-library parsing.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::color::{FRgba, Rgba};
use crate::material::Material;
use crate::texture::Texture;

/// Parse an MTL library, merging its materials into `materials`.
///
/// Recognized statements: `newmtl`, `Kd` (flat diffuse color), `map_Kd`
/// (diffuse texture path, resolved against `base_dir`). Anything else is
/// ignored. Unreadable statements or textures degrade with a warning.
pub(crate) fn parse_mtl(
    content: &str,
    base_dir: Option<&Path>,
    materials: &mut HashMap<String, Arc<Material>>,
) {
    let mut current: Option<MtlEntry> = None;
    let mut added = 0usize;

    for line in content.lines() {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("newmtl") => {
                if let Some(entry) = current.take() {
                    materials.insert(entry.name.clone(), Arc::new(entry.build(base_dir)));
                    added += 1;
                }
                let name = parts.collect::<Vec<_>>().join(" ");
                current = Some(MtlEntry::new(name));
            }
            Some("Kd") => {
                let Some(entry) = current.as_mut() else {
                    continue;
                };
                match parse_three(parts) {
                    Some((r, g, b)) => entry.diffuse_color = FRgba::new(r, g, b, 1.0).into(),
                    None => log::warn!("Ignoring malformed Kd statement: {line:?}"),
                }
            }
            Some("map_Kd") => {
                if let Some(entry) = current.as_mut() {
                    entry.diffuse_map = parts.next().map(str::to_owned);
                }
            }
            _ => {}
        }
    }

    if let Some(entry) = current.take() {
        materials.insert(entry.name.clone(), Arc::new(entry.build(base_dir)));
        added += 1;
    }

    log::info!("Loaded {} materials ({} total)", added, materials.len());
}

struct MtlEntry {
    name: String,
    diffuse_color: Rgba,
    diffuse_map: Option<String>,
}

impl MtlEntry {
    fn new(name: String) -> Self {
        Self {
            name,
            diffuse_color: Rgba::TRANSPARENT,
            diffuse_map: None,
        }
    }

    fn build(self, base_dir: Option<&Path>) -> Material {
        let diffuse = match &self.diffuse_map {
            Some(map) => {
                let path = match base_dir {
                    Some(dir) => dir.join(map),
                    None => map.into(),
                };
                match Texture::from_file(&path) {
                    Ok(tex) => tex,
                    Err(err) => {
                        log::warn!(
                            "Could not load texture {:?} for material {:?} ({err}); using flat color",
                            map,
                            self.name
                        );
                        Texture::solid(self.diffuse_color)
                    }
                }
            }
            None => Texture::solid(self.diffuse_color),
        };
        Material::new(self.name, diffuse)
    }
}

fn parse_three<'a>(mut parts: impl Iterator<Item = &'a str>) -> Option<(f64, f64, f64)> {
    let r = parts.next()?.parse().ok()?;
    let g = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    Some((r, g, b))
}
