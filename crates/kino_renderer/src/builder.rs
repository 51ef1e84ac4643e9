//! Step builders for scenes and actors.

use std::collections::BTreeMap;
use std::sync::Arc;

use kino_core::obj::{load_obj, ObjResult};
use kino_core::{FragShader, Mesh, Rgba, Texture};
use kino_math::DVec3;

use crate::actor::{model_kind, Actor, ActorKind};
use crate::camera::Camera;
use crate::scene::{PointLight, Scene, SceneInstance, ThinkFn};

/// Fluent scene assembly. `build` yields a fully-initialized scene that
/// stays immutable until simulated.
pub struct SceneBuilder {
    framerate: u32,
    duration: f64,
    cameras: Vec<(String, Camera)>,
    actors: BTreeMap<String, Actor>,
    lights: BTreeMap<String, PointLight>,
    skybox: Arc<Texture>,
    think: ThinkFn,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            framerate: 30,
            duration: 0.0,
            cameras: Vec::new(),
            actors: BTreeMap::new(),
            lights: BTreeMap::new(),
            skybox: Arc::new(Texture::default()),
            think: Arc::new(|_, _, _| {}),
        }
    }

    pub fn with_framerate(mut self, framerate: u32) -> Self {
        self.framerate = framerate.max(1);
        self
    }

    /// Simulated length in seconds. A duration of 0 leaves the scene
    /// static (a single rest frame, no movie).
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    /// Add a camera. The first camera added is the primary one.
    pub fn with_camera(mut self, name: impl Into<String>, camera: Camera) -> Self {
        self.cameras.push((name.into(), camera));
        self
    }

    pub fn with_actor(mut self, id: impl Into<String>, actor: Actor) -> Self {
        self.actors.insert(id.into(), actor);
        self
    }

    pub fn with_light(mut self, id: impl Into<String>, position: DVec3) -> Self {
        self.lights.insert(id.into(), PointLight { position });
        self
    }

    /// Texture sampled by ray direction wherever nothing was hit.
    pub fn with_skybox(mut self, texture: Texture) -> Self {
        self.skybox = Arc::new(texture);
        self
    }

    pub fn with_think(
        mut self,
        think: impl Fn(&mut SceneInstance, f64, f64) + Send + Sync + 'static,
    ) -> Self {
        self.think = Arc::new(think);
        self
    }

    pub fn build(self) -> Scene {
        let mut cameras = self.cameras;
        if cameras.is_empty() {
            cameras.push(("main".to_owned(), Camera::default()));
        }
        Scene::new(
            self.framerate,
            self.duration,
            cameras,
            self.actors,
            self.lights,
            self.skybox,
            self.think,
        )
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent actor assembly, one constructor per shape kind.
pub struct ActorBuilder {
    kind: ActorKind,
    position: DVec3,
    rotation: DVec3,
    size: DVec3,
    texture: Arc<Texture>,
    frag_shaders: Vec<FragShader>,
}

impl ActorBuilder {
    fn with_kind(kind: ActorKind) -> Self {
        Self {
            kind,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            size: DVec3::ONE,
            texture: Arc::new(Texture::solid(Rgba::WHITE)),
            frag_shaders: Vec::new(),
        }
    }

    pub fn sphere() -> Self {
        Self::with_kind(ActorKind::Sphere)
    }

    pub fn cuboid() -> Self {
        Self::with_kind(ActorKind::Box)
    }

    pub fn cube() -> Self {
        Self::with_kind(ActorKind::Cube)
    }

    pub fn triangle() -> Self {
        Self::with_kind(ActorKind::Triangle)
    }

    pub fn model(mesh: &Mesh) -> Self {
        Self::with_kind(model_kind(mesh))
    }

    /// Load the mesh from an OBJ file. A missing or unreadable file aborts
    /// only this actor's construction.
    pub fn model_from_file(path: impl AsRef<std::path::Path>) -> ObjResult<Self> {
        let mesh = load_obj(path)?;
        Ok(Self::model(&mesh))
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    /// Rotation about the actor's center, radians per axis.
    pub fn with_rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// World-space bounding-box extent of the actor.
    pub fn with_size(mut self, size: DVec3) -> Self {
        self.size = size;
        self
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Arc::new(texture);
        self
    }

    /// Shorthand for a 1x1 solid-color texture.
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.texture = Arc::new(Texture::solid(color));
        self
    }

    /// Append a fragment shader; shaders run in registration order.
    pub fn with_frag_shader(mut self, shader: FragShader) -> Self {
        self.frag_shaders.push(shader);
        self
    }

    pub fn build(self) -> Actor {
        Actor::new(
            self.kind,
            self.position,
            self.rotation,
            self.size,
            self.texture,
            self.frag_shaders,
        )
    }
}
