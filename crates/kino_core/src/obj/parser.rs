//! OBJ geometry parsing.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use kino_math::{DVec2, DVec3};

use super::mtl::parse_mtl;
use super::{ObjError, ObjResult};
use crate::material::Material;
use crate::mesh::{Mesh, MeshFace, MeshTriangle};

/// Parse OBJ text into a [`Mesh`].
///
/// Vertices are centered on their bounding-box midpoint and scaled so the
/// largest absolute coordinate is 1, giving every loaded mesh the same
/// canonical extent; actors scale it back up through their size. Each `f`
/// statement becomes one face, triangulated as a fan. The UV triple of each
/// fan triangle is rotated by one against its vertex triple, matching the
/// orientation the face sampler expects.
pub fn parse_obj(content: &str, base_dir: Option<&Path>) -> ObjResult<Mesh> {
    // Material libraries first, so usemtl can resolve regardless of where
    // the mtllib statement sits in the file.
    let mut materials = HashMap::new();
    for (_, line) in numbered(content) {
        if let Some(name) = line.strip_prefix("mtllib ") {
            load_mtl_library(name.trim(), base_dir, &mut materials);
        }
    }

    let mut positions: Vec<DVec3> = Vec::new();
    let mut uvs: Vec<DVec2> = Vec::new();
    let mut normal_count = 0usize;
    let mut face_lines: Vec<(usize, Arc<Material>, String)> = Vec::new();

    let default_material = Arc::new(Material::default());
    let mut current_material = default_material.clone();

    for (line_no, line) in numbered(content) {
        if let Some(rest) = line.strip_prefix("v ") {
            positions.push(parse_vec3(rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("vt ") {
            uvs.push(parse_vec2(rest, line_no)?);
        } else if line.starts_with("vn ") {
            normal_count += 1;
        } else if let Some(rest) = line.strip_prefix("usemtl ") {
            let name = rest.trim();
            match materials.get(name) {
                Some(material) => current_material = material.clone(),
                None => log::warn!("Referenced material {name:?} not found"),
            }
        } else if let Some(rest) = line.strip_prefix("f ") {
            face_lines.push((line_no, current_material.clone(), rest.to_owned()));
        }
    }

    normalize(&mut positions);

    let mut faces = Vec::with_capacity(face_lines.len());
    for (line_no, material, rest) in face_lines {
        match build_face(&rest, &positions, &uvs, material) {
            Some(face) => faces.push(face),
            None => log::warn!("Skipping malformed face at line {line_no}: {rest:?}"),
        }
    }

    log::info!(
        "Parsed {} vertices, {} texture vertices, {} vertex normals, {} faces",
        positions.len(),
        uvs.len(),
        normal_count,
        faces.len()
    );

    Ok(Mesh::new(faces))
}

fn numbered(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
}

fn load_mtl_library(
    name: &str,
    base_dir: Option<&Path>,
    materials: &mut HashMap<String, Arc<Material>>,
) {
    let path = match base_dir {
        Some(dir) => dir.join(name),
        None => name.into(),
    };
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_mtl(&content, base_dir, materials),
        Err(err) => log::warn!("Material library {:?} could not be read ({err}); skipping", name),
    }
}

/// Center vertices on their bounding-box midpoint and scale the largest
/// absolute component down to 1.
fn normalize(positions: &mut [DVec3]) {
    if positions.is_empty() {
        return;
    }

    let mut min = DVec3::splat(f64::INFINITY);
    let mut max = DVec3::splat(f64::NEG_INFINITY);
    for p in positions.iter() {
        min = min.min(*p);
        max = max.max(*p);
    }
    let center = (min + max) / 2.0;

    let mut scale = 0.0f64;
    for p in positions.iter_mut() {
        *p -= center;
        scale = scale.max(p.abs().max_element());
    }
    if scale == 0.0 {
        return;
    }
    for p in positions.iter_mut() {
        *p /= scale;
    }
}

/// One `f` statement: fan-triangulate its vertices into a face.
fn build_face(
    rest: &str,
    positions: &[DVec3],
    uvs: &[DVec2],
    material: Arc<Material>,
) -> Option<MeshFace> {
    let corners: Vec<(DVec3, DVec2)> = rest
        .split_whitespace()
        .map(|group| parse_index_group(group, positions, uvs))
        .collect::<Option<_>>()?;

    if corners.len() < 3 {
        return None;
    }

    let mut triangles = Vec::with_capacity(corners.len() - 2);
    for i in 2..corners.len() {
        triangles.push(MeshTriangle::new(
            [corners[0].0, corners[i - 1].0, corners[i].0],
            // UV triple rotated by one against the vertex triple.
            [corners[i].1, corners[0].1, corners[i - 1].1],
        ));
    }

    Some(MeshFace {
        material,
        triangles,
    })
}

/// Resolve one face index group: `v`, `v/vt`, `v/vt/vn`, or `v//vn`
/// (1-based indices). Groups without a texture index get UV (0, 0).
fn parse_index_group(group: &str, positions: &[DVec3], uvs: &[DVec2]) -> Option<(DVec3, DVec2)> {
    let mut parts = group.split('/');
    let pos_index: usize = parts.next()?.parse().ok()?;
    let position = *positions.get(pos_index.checked_sub(1)?)?;

    let uv = match parts.next() {
        Some("") | None => DVec2::ZERO,
        Some(raw) => {
            let uv_index: usize = raw.parse().ok()?;
            *uvs.get(uv_index.checked_sub(1)?)?
        }
    };

    Some((position, uv))
}

fn parse_vec3(rest: &str, line: usize) -> ObjResult<DVec3> {
    let mut parts = rest.split_whitespace();
    let mut next = || -> ObjResult<f64> {
        parts
            .next()
            .ok_or_else(|| malformed(line, "expected three coordinates"))?
            .parse()
            .map_err(|_| malformed(line, "invalid coordinate"))
    };
    Ok(DVec3::new(next()?, next()?, next()?))
}

fn parse_vec2(rest: &str, line: usize) -> ObjResult<DVec2> {
    let mut parts = rest.split_whitespace();
    let u = parts
        .next()
        .ok_or_else(|| malformed(line, "expected texture coordinate"))?
        .parse()
        .map_err(|_| malformed(line, "invalid texture coordinate"))?;
    // The v component is optional in the wild.
    let v = match parts.next() {
        Some(raw) => raw
            .parse()
            .map_err(|_| malformed(line, "invalid texture coordinate"))?,
        None => 0.0,
    };
    Ok(DVec2::new(u, v))
}

fn malformed(line: usize, message: &str) -> ObjError {
    ObjError::Malformed {
        line,
        message: message.to_owned(),
    }
}
