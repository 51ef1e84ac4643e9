//! Scene definition and time-stepped simulation.

use std::collections::BTreeMap;
use std::sync::Arc;

use kino_core::Texture;
use kino_math::DVec3;

use crate::actor::Actor;
use crate::camera::Camera;

/// Think function run once per simulated frame:
/// `(instance, time, dt)`. It may mutate that instance only.
pub type ThinkFn = Arc<dyn Fn(&mut SceneInstance, f64, f64) + Send + Sync>;

/// Shadow caster for the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: DVec3,
}

/// A 3D scene ready for simulation. Created using a
/// [`SceneBuilder`](crate::SceneBuilder).
#[derive(Clone)]
pub struct Scene {
    framerate: u32,
    duration: f64,
    cameras: Vec<(String, Camera)>,
    actors: BTreeMap<String, Actor>,
    lights: BTreeMap<String, PointLight>,
    skybox: Arc<Texture>,
    think: ThinkFn,
    time_seq: Vec<f64>,
}

impl Scene {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        framerate: u32,
        duration: f64,
        cameras: Vec<(String, Camera)>,
        actors: BTreeMap<String, Actor>,
        lights: BTreeMap<String, PointLight>,
        skybox: Arc<Texture>,
        think: ThinkFn,
    ) -> Self {
        let dt = 1.0 / framerate as f64;
        let frames = (framerate as f64 * duration) as usize;
        let time_seq = (0..frames).map(|i| i as f64 * dt).collect();

        Self {
            framerate,
            duration,
            cameras,
            actors,
            lights,
            skybox,
            think,
            time_seq,
        }
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Seconds between simulated frames.
    pub fn delta_time(&self) -> f64 {
        1.0 / self.framerate as f64
    }

    /// Precomputed simulation timestamps; empty for a static scene.
    pub fn time_seq(&self) -> &[f64] {
        &self.time_seq
    }

    /// Simulate to the given frame index (or all frames), producing the
    /// ordered list of per-frame snapshots. Instance 0 is a deep copy of
    /// the rest state; each later instance is a copy of the previous one
    /// advanced by the think function. The scene itself is never mutated.
    pub fn simulate(&self, to_index: Option<usize>) -> Vec<SceneInstance> {
        let last = self.time_seq.len().saturating_sub(1);
        let to = to_index.unwrap_or(last).min(last);
        let dt = self.delta_time();

        let mut instances = Vec::with_capacity(to + 1);
        instances.push(SceneInstance::initial(self));
        for i in 1..=to {
            let next = instances[i - 1].advance(self.time_seq[i], i, dt);
            instances.push(next);
        }
        instances
    }
}

/// An immutable-per-frame snapshot of scene state.
///
/// Each instance deep-copies the cameras and actors of its predecessor, so
/// a think function mutates only the copy handed to it; earlier instances
/// and the owning [`Scene`] stay untouched. Once `simulate` returns, the
/// instances are read-only and safe to render from any thread.
#[derive(Clone)]
pub struct SceneInstance {
    time: f64,
    index: usize,
    cameras: Vec<(String, Camera)>,
    primary_camera: usize,
    actors: BTreeMap<String, Actor>,
    lights: BTreeMap<String, PointLight>,
    skybox: Arc<Texture>,
    think: ThinkFn,
}

impl SceneInstance {
    fn initial(scene: &Scene) -> Self {
        let mut instance = Self {
            time: 0.0,
            index: 0,
            cameras: scene.cameras.clone(),
            primary_camera: 0,
            actors: scene.actors.clone(),
            lights: scene.lights.clone(),
            skybox: scene.skybox.clone(),
            think: scene.think.clone(),
        };
        instance.freeze();
        instance
    }

    /// Deep-copy this instance, advance it by the think function, and
    /// freeze its geometry against the primary camera.
    fn advance(&self, time: f64, index: usize, dt: f64) -> Self {
        let mut next = self.clone();
        next.time = time;
        next.index = index;
        let think = next.think.clone();
        think(&mut next, time, dt);
        next.freeze();
        next
    }

    /// Rebuild camera-relative actor geometry where placements changed.
    fn freeze(&mut self) {
        let center = self.camera().center;
        for actor in self.actors.values_mut() {
            actor.freeze(center);
        }
    }

    /// Current simulation time for this instance.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Frame index this instance was simulated for.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current primary camera.
    pub fn camera(&self) -> &Camera {
        &self.cameras[self.primary_camera].1
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.primary_camera].1
    }

    /// Switch the primary camera by name. Returns false if no camera has
    /// that name.
    pub fn set_primary_camera(&mut self, name: &str) -> bool {
        match self.cameras.iter().position(|(n, _)| n == name) {
            Some(i) => {
                self.primary_camera = i;
                true
            }
            None => false,
        }
    }

    pub fn add_camera(&mut self, name: impl Into<String>, camera: Camera) {
        self.cameras.push((name.into(), camera));
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: &str) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn add_actor(&mut self, id: impl Into<String>, actor: Actor) {
        self.actors.insert(id.into(), actor);
    }

    /// Removes an actor. Returns whether it existed.
    pub fn remove_actor(&mut self, id: &str) -> bool {
        self.actors.remove(id).is_some()
    }

    pub fn lights(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.values()
    }

    pub fn has_lights(&self) -> bool {
        !self.lights.is_empty()
    }

    pub fn light_mut(&mut self, id: &str) -> Option<&mut PointLight> {
        self.lights.get_mut(id)
    }

    pub fn skybox(&self) -> &Texture {
        &self.skybox
    }

    /// Clears the think function for all later instances.
    pub fn clear_think(&mut self) {
        self.think = Arc::new(|_, _, _| {});
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ActorBuilder, SceneBuilder};
    use kino_core::Rgba;
    use kino_math::DVec2;

    fn test_scene(think: impl Fn(&mut SceneInstance, f64, f64) + Send + Sync + 'static) -> Scene {
        SceneBuilder::new()
            .with_framerate(10)
            .with_duration(1.0)
            .with_camera(
                "main",
                Camera::orthographic(DVec3::ZERO, DVec3::ZERO, DVec2::splat(4.0)),
            )
            .with_actor(
                "ball",
                ActorBuilder::sphere()
                    .with_position(DVec3::new(0.0, 0.0, 5.0))
                    .with_size(DVec3::splat(2.0))
                    .with_color(Rgba::opaque(0, 0, 255))
                    .build(),
            )
            .with_think(think)
            .build()
    }

    #[test]
    fn test_time_seq() {
        let scene = test_scene(|_, _, _| {});
        assert_eq!(scene.time_seq().len(), 10);
        assert_eq!(scene.time_seq()[0], 0.0);
        assert!((scene.time_seq()[9] - 0.9).abs() < 1e-12);
        assert!((scene.delta_time() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_instance_zero_is_rest_state() {
        let scene = test_scene(|inst, _, _| {
            inst.actor_mut("ball").unwrap().position.x += 1.0;
        });
        let instances = scene.simulate(Some(0));
        assert_eq!(instances.len(), 1);
        // The think function never ran for instance 0.
        assert_eq!(instances[0].actor("ball").unwrap().position.x, 0.0);
    }

    #[test]
    fn test_think_advances_each_copy() {
        let scene = test_scene(|inst, _, _| {
            inst.actor_mut("ball").unwrap().position.x += 1.0;
        });
        let instances = scene.simulate(Some(5));
        assert_eq!(instances.len(), 6);
        for (i, inst) in instances.iter().enumerate() {
            assert_eq!(inst.index(), i);
            assert_eq!(inst.actor("ball").unwrap().position.x, i as f64);
        }
    }

    #[test]
    fn test_prior_instances_never_mutated() {
        let scene = test_scene(|inst, _, _| {
            inst.actor_mut("ball").unwrap().position.x += 1.0;
        });
        let instances = scene.simulate(None);
        // Re-simulating gives identical results; the scene was not touched.
        let again = scene.simulate(None);
        for (a, b) in instances.iter().zip(again.iter()) {
            assert_eq!(
                a.actor("ball").unwrap().position,
                b.actor("ball").unwrap().position
            );
        }
    }

    #[test]
    fn test_think_receives_time_and_dt() {
        use std::sync::Mutex;
        let seen: Arc<Mutex<Vec<(f64, f64)>>> = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let scene = test_scene(move |_, time, dt| {
            record.lock().unwrap().push((time, dt));
        });
        scene.simulate(Some(3));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!((seen[0].0 - 0.1).abs() < 1e-12);
        assert!((seen[2].0 - 0.3).abs() < 1e-12);
        for (_, dt) in seen.iter() {
            assert!((dt - 0.1).abs() < 1e-12);
        }
    }

    #[test]
    fn test_actor_add_remove_in_think() {
        let scene = test_scene(|inst, time, _| {
            if time >= 0.45 {
                inst.remove_actor("ball");
            }
        });
        let instances = scene.simulate(None);
        assert!(instances[4].actor("ball").is_some());
        assert!(instances[5].actor("ball").is_none());
        assert!(instances[9].actor("ball").is_none());
    }

    #[test]
    fn test_primary_camera_switch() {
        let mut scene = SceneBuilder::new()
            .with_camera("main", Camera::default())
            .with_camera(
                "side",
                Camera::perspective(DVec3::new(5.0, 0.0, 0.0), DVec3::ZERO, DVec2::splat(60.0), 1.0),
            )
            .build()
            .simulate(Some(0));
        let inst = &mut scene[0];

        assert_eq!(inst.camera().center, DVec3::ZERO);
        assert!(inst.set_primary_camera("side"));
        assert_eq!(inst.camera().center.x, 5.0);
        assert!(!inst.set_primary_camera("nope"));
    }
}
