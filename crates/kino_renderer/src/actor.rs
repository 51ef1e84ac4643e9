//! Scene actors: a placed shape, its texture, and its shader hooks.

use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use kino_core::shader::run_frag_chain;
use kino_core::{alpha_blend, FRgba, FragShader, Mesh, Texture};
use kino_math::{DVec2, DVec3, Ray, Rotor};

use crate::face::FaceTriangle;
use crate::model::Model;
use crate::primitives::{Cube, CubeFace, Cuboid, Sphere, Triangle};

/// One actor's contribution along a ray: hit point and normal (both
/// camera-relative), distance along the ray, and the shaded color.
#[derive(Debug, Copy, Clone)]
pub struct Sample {
    pub point: DVec3,
    pub normal: DVec3,
    pub distance: f64,
    pub color: FRgba,
}

/// The shape an actor renders as. A closed set: every variant is sampled
/// through one exhaustive match, with no dispatch indirection in the
/// per-pixel loop.
#[derive(Clone)]
pub enum ActorKind {
    Sphere,
    Box,
    Cube,
    Triangle,
    /// Triangle mesh; holds the rest-state model built once from the mesh.
    Model(Arc<Model>),
}

/// Camera-relative intersection geometry, rebuilt on placement changes.
#[derive(Clone)]
enum Geometry {
    Sphere(Sphere),
    Box(Cuboid),
    Cube(Cube),
    Triangle(FaceTriangle),
    Model(Arc<Model>),
}

/// Cache key for frozen geometry: everything whose change forces a rebuild.
#[derive(Clone, Copy, PartialEq)]
struct GeomKey {
    camera: DVec3,
    position: DVec3,
    rotation: DVec3,
    size: DVec3,
}

/// An object rendered from within a scene.
///
/// `size` is the world-space extent of the actor's bounding box, centered
/// on `position`; rotation is about the center. Geometry lives in two
/// states: the configured rest placement, and a camera-relative frozen copy
/// built once per simulated frame (primitive math is expressed relative to
/// the ray origin). The frozen copy is cached and reused while neither the
/// actor's placement nor the camera moved.
#[derive(Clone)]
pub struct Actor {
    pub position: DVec3,
    pub rotation: DVec3,
    pub size: DVec3,
    pub texture: Arc<Texture>,
    pub frag_shaders: Vec<FragShader>,
    kind: ActorKind,
    frozen: Option<(GeomKey, Geometry)>,
}

impl Actor {
    pub fn new(
        kind: ActorKind,
        position: DVec3,
        rotation: DVec3,
        size: DVec3,
        texture: Arc<Texture>,
        frag_shaders: Vec<FragShader>,
    ) -> Self {
        Self {
            position,
            rotation,
            size,
            texture,
            frag_shaders,
            kind,
            frozen: None,
        }
    }

    pub fn kind(&self) -> &ActorKind {
        &self.kind
    }

    /// Clears any active fragment shaders on the actor.
    pub fn clear_frag_shaders(&mut self) {
        self.frag_shaders.clear();
    }

    /// Rebuild the camera-relative geometry if the placement or camera
    /// changed since the last freeze; otherwise keep the cached copy.
    pub(crate) fn freeze(&mut self, camera_center: DVec3) {
        let key = GeomKey {
            camera: camera_center,
            position: self.position,
            rotation: self.rotation,
            size: self.size,
        };
        if let Some((cached, _)) = &self.frozen {
            if *cached == key {
                return;
            }
        }

        let rel = self.position - camera_center;
        let half = self.size / 2.0;
        let geometry = match &self.kind {
            ActorKind::Sphere => Geometry::Sphere(Sphere::new(rel, half, self.rotation)),
            ActorKind::Box => Geometry::Box(Cuboid::new(rel, half, self.rotation)),
            ActorKind::Cube => Geometry::Cube(Cube::new(rel, half, self.rotation)),
            ActorKind::Triangle => {
                let rotor = Rotor::new(self.rotation);
                let place = |v: DVec3| rotor.rotate(v * self.size) + rel;
                Geometry::Triangle(FaceTriangle::new(
                    Triangle::new(
                        place(DVec3::new(-0.5, -0.5, 0.0)),
                        place(DVec3::new(0.5, -0.5, 0.0)),
                        place(DVec3::new(0.0, 0.5, 0.0)),
                    ),
                    [
                        DVec2::new(0.0, 1.0),
                        DVec2::new(1.0, 1.0),
                        DVec2::new(0.5, 0.0),
                    ],
                ))
            }
            ActorKind::Model(base) => {
                log::debug!("Rebuilding model geometry ({} triangles)", base.triangle_count());
                Geometry::Model(Arc::new(base.transformed(half, self.rotation, rel)))
            }
        };
        self.frozen = Some((key, geometry));
    }

    /// Sample the actor along a camera-relative ray: the color+depth
    /// contract every shape kind shares. Returns `None` on a miss or when
    /// the actor has not been frozen for a camera yet.
    pub fn sample(&self, ray: &Ray, min_depth: f64, time: f64) -> Option<Sample> {
        let (_, geometry) = self.frozen.as_ref()?;
        match geometry {
            Geometry::Sphere(sphere) => self.sample_sphere(sphere, ray, min_depth, time),
            Geometry::Box(cuboid) => self.sample_box(cuboid, ray, min_depth, time),
            Geometry::Cube(cube) => self.sample_cube(cube, ray, min_depth, time),
            Geometry::Triangle(triangle) => self.sample_triangle(triangle, ray, min_depth, time),
            Geometry::Model(model) => self.sample_model(model, ray, min_depth, time),
        }
    }

    /// Texture lookup plus the actor's fragment shader chain.
    fn shade(&self, uv: DVec2, time: f64) -> FRgba {
        let size = self.texture.size();
        run_frag_chain(
            &self.frag_shaders,
            self.texture.sample(uv).into(),
            uv * size,
            size,
            time,
        )
    }

    fn sample_sphere(&self, sphere: &Sphere, ray: &Ray, min_depth: f64, time: f64) -> Option<Sample> {
        let roots = sphere.intersects(ray, min_depth)?;
        let rotor = sphere.rotor();

        let uv_far = sphere_uv(rotor.rotate(ray.at(roots.far) - sphere.position));
        let far_color = self.shade(uv_far, time);

        if !roots.near.is_finite() {
            let point = ray.at(roots.far);
            return Some(Sample {
                point,
                normal: (point - sphere.position).normalize_or_zero(),
                distance: roots.far,
                color: far_color,
            });
        }

        let uv_near = sphere_uv(rotor.rotate(ray.at(roots.near) - sphere.position));
        let near_color = self.shade(uv_near, time);
        let point = ray.at(roots.near);
        Some(Sample {
            point,
            normal: (point - sphere.position).normalize_or_zero(),
            // The far root is reported even when the near surface is shaded.
            distance: roots.far,
            color: alpha_blend(near_color, far_color),
        })
    }

    fn sample_box(&self, cuboid: &Cuboid, ray: &Ray, min_depth: f64, time: f64) -> Option<Sample> {
        let roots = cuboid.intersects(ray, min_depth)?;
        let t = if roots.near.is_finite() {
            roots.near
        } else {
            roots.far
        };

        // Boxes carry no UV mapping; the texture is sampled flat.
        let color = self.shade(DVec2::new(0.5, 0.5), time);

        let local = cuboid.local_at(ray, t);
        let axis = dominant_axis(local);
        let mut local_normal = DVec3::ZERO;
        local_normal[axis] = local[axis].signum();

        Some(Sample {
            point: ray.at(t),
            normal: cuboid.rotor().inverse_rotate(local_normal),
            distance: t,
            color,
        })
    }

    fn sample_cube(&self, cube: &Cube, ray: &Ray, min_depth: f64, time: f64) -> Option<Sample> {
        let (roots, near_face, far_face) = cube.intersects(ray, min_depth)?;
        let (t, face) = if roots.near.is_finite() {
            (roots.near, near_face)
        } else {
            (roots.far, far_face)
        };

        let from_center = cube.local_at(ray, t);
        let uv = cube_face_uv(face, from_center);
        let color = self.shade(uv, time);

        Some(Sample {
            point: ray.at(t),
            normal: cube.rotor().inverse_rotate(face.local_normal()),
            distance: t,
            color,
        })
    }

    fn sample_triangle(
        &self,
        triangle: &FaceTriangle,
        ray: &Ray,
        min_depth: f64,
        time: f64,
    ) -> Option<Sample> {
        let (uv, distance) = triangle.sample(ray, min_depth)?;
        Some(Sample {
            point: ray.at(distance),
            normal: triangle.triangle.normal(),
            distance,
            color: self.shade(uv, time),
        })
    }

    fn sample_model(&self, model: &Model, ray: &Ray, min_depth: f64, time: f64) -> Option<Sample> {
        let mut hits = model.sample(ray, min_depth);
        if hits.is_empty() {
            return None;
        }

        // Painter's algorithm within the model: blend far to near.
        hits.sort_by(|a, b| {
            b.distance
                .partial_cmp(&a.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut color = FRgba::default();
        for hit in &hits {
            color = alpha_blend(hit.color.into(), color);
        }

        let nearest = hits.last()?;
        let color = run_frag_chain(
            &self.frag_shaders,
            color,
            nearest.uv * self.texture.size(),
            self.texture.size(),
            time,
        );

        Some(Sample {
            point: ray.at(nearest.distance),
            normal: nearest.normal,
            distance: nearest.distance,
            color,
        })
    }
}

fn dominant_axis(local: DVec3) -> usize {
    let abs = local.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        0
    } else if abs.y >= abs.z {
        1
    } else {
        2
    }
}

/// Spherical UV of an offset from the sphere center, after rotation into
/// the sphere's frame. Guards the `x == 0` meridian explicitly.
fn sphere_uv(from_center: DVec3) -> DVec2 {
    let theta1 = if from_center.x == 0.0 {
        if from_center.y < 0.0 {
            -FRAC_PI_2
        } else {
            FRAC_PI_2
        }
    } else {
        (from_center.y / from_center.x).atan()
    };
    let theta2 = if from_center.x == 0.0 {
        if from_center.z < 0.0 {
            -FRAC_PI_2
        } else {
            FRAC_PI_2
        }
    } else {
        (from_center.z / from_center.x).atan()
    };
    DVec2::new((theta2 + FRAC_PI_2) / PI, (theta1 + FRAC_PI_2) / PI)
}

/// Planar UV for a cube face from the face-normalized hit offset
/// (components in [-1, 1]).
fn cube_face_uv(face: CubeFace, from_center: DVec3) -> DVec2 {
    let m = |v: f64| ((v + 1.0) / 2.0).rem_euclid(1.0);
    match face {
        CubeFace::PosX => DVec2::new(1.0 - m(from_center.z), 1.0 - m(from_center.y)),
        CubeFace::NegX => DVec2::new(m(from_center.z), 1.0 - m(from_center.y)),
        CubeFace::PosY => DVec2::new(m(from_center.x), 1.0 - m(from_center.z)),
        CubeFace::NegY => DVec2::new(1.0 - m(from_center.x), 1.0 - m(from_center.z)),
        CubeFace::PosZ => DVec2::new(1.0 - m(from_center.x), 1.0 - m(from_center.y)),
        CubeFace::NegZ => DVec2::new(m(from_center.x), 1.0 - m(from_center.y)),
    }
}

/// Build the rest-state model for a model actor.
pub(crate) fn model_kind(mesh: &Mesh) -> ActorKind {
    ActorKind::Model(Arc::new(Model::from_mesh(mesh)))
}
