//! Frame and movie rendering pipelines.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

use kino_core::shader::{run_coord_chain, run_frag_chain};
use kino_core::{alpha_blend, CoordShader, FRgba, FragShader, Frame};
use kino_math::{DVec2, DVec3, Ray};
use thiserror::Error;

use crate::camera::RayCaster;
use crate::movie::{Movie, MovieError};
use crate::scene::{Scene, SceneInstance};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("resolution must be at least 1x1, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("frame index {index} out of range for {frames} simulated frames")]
    FrameIndex { index: usize, frames: usize },

    #[error("cannot render a movie from a static scene")]
    StaticScene,

    #[error("movie render was cancelled")]
    Cancelled,

    #[error(transparent)]
    Movie(#[from] MovieError),
}

/// Cooperative cancellation for movie renders. Workers check the token
/// between frame claims; rendering never blocks on it mid-frame.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for a movie render.
#[derive(Clone, Default)]
pub struct MovieOptions {
    /// Output normalized depth maps instead of color.
    pub depth_map: bool,
    /// Worker thread count; defaults to the available parallelism.
    pub threads: Option<usize>,
    /// Cancellation token checked between frame claims.
    pub cancel: Option<CancelToken>,
}

/// Renderer for 3D scenes: simulates, then renders frames or movies.
pub struct Renderer {
    width: u32,
    height: u32,
    scene: Scene,
    /// Screen-space fragment shaders, applied in order to every pixel.
    pub frag_shaders: Vec<FragShader>,
    /// Coordinate shaders remapping screen positions before ray generation.
    pub coord_shaders: Vec<CoordShader>,
    /// Minimum shadow-ray distance, preventing self-shadowing acne.
    pub shadow_bias: f64,
    /// Minimum primary-ray hit distance (near clip).
    pub near_clip: f64,
}

impl Renderer {
    pub fn new(width: u32, height: u32, scene: Scene) -> Result<Self, RenderError> {
        if width < 1 || height < 1 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        Ok(Self {
            width,
            height,
            scene,
            frag_shaders: Vec::new(),
            coord_shaders: Vec::new(),
            shadow_bias: 1e-3,
            near_clip: 1e-3,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Clears all renderer-level shaders.
    pub fn clear_shaders(&mut self) {
        self.frag_shaders.clear();
        self.coord_shaders.clear();
    }

    /// Render a single frame: simulate up to `index` and render the final
    /// instance. Always single-threaded.
    pub fn render_frame(&self, index: usize) -> Result<Frame, RenderError> {
        self.render_frame_with(index, false)
    }

    /// Like [`render_frame`](Self::render_frame), optionally producing a
    /// normalized grayscale depth map instead of color.
    pub fn render_frame_with(&self, index: usize, depth_map: bool) -> Result<Frame, RenderError> {
        let frames = self.scene.time_seq().len();
        if frames != 0 && index >= frames {
            return Err(RenderError::FrameIndex { index, frames });
        }

        let start = Instant::now();
        log::info!("Simulating to frame index {index}");
        let mut instances = self.scene.simulate(Some(index));
        log::info!("Simulation finished in {:.2?}", start.elapsed());

        let instance = instances
            .pop()
            .ok_or(RenderError::FrameIndex { index, frames })?;
        Ok(self.render_instance(&instance, depth_map, true))
    }

    /// Render every simulated frame into a movie.
    ///
    /// Simulation is sequential (think functions are user code); rendering
    /// fans out over a fixed pool of OS threads that claim frame indices
    /// off a shared counter until exhausted - a pull-based queue that
    /// balances uneven frame costs. Finished frames stream back over a
    /// channel to this thread, which persists them and tracks progress.
    pub fn render_movie(&self) -> Result<Movie, RenderError> {
        self.render_movie_with(MovieOptions::default())
    }

    pub fn render_movie_with(&self, options: MovieOptions) -> Result<Movie, RenderError> {
        let frames = self.scene.time_seq().len();
        if frames == 0 {
            return Err(RenderError::StaticScene);
        }

        let start = Instant::now();
        log::info!("Simulating {frames} frames");
        let instances = self.scene.simulate(None);
        log::info!("Simulation finished in {:.2?}", start.elapsed());

        let movie = Movie::new(self.width, self.height, self.scene.framerate())?;
        let threads = options
            .threads
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1);
        let cancel = options.cancel.clone().unwrap_or_default();
        let next_index = AtomicUsize::new(0);

        log::info!(
            "Rendering {frames} frames at {}x{} @ {} fps on {threads} thread(s)",
            self.width,
            self.height,
            self.scene.framerate()
        );
        let start = Instant::now();

        let (tx, rx) = mpsc::channel::<(usize, Frame)>();
        let mut write_error: Option<MovieError> = None;
        let mut done = 0usize;

        std::thread::scope(|scope| {
            for _ in 0..threads {
                let tx = tx.clone();
                let cancel = &cancel;
                let next_index = &next_index;
                let instances = &instances;
                let options = &options;
                scope.spawn(move || loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let i = next_index.fetch_add(1, Ordering::SeqCst);
                    if i >= instances.len() {
                        break;
                    }
                    let frame = self.render_instance(&instances[i], options.depth_map, false);
                    if tx.send((i, frame)).is_err() {
                        break;
                    }
                });
            }
            drop(tx);

            for (index, frame) in rx {
                match movie.write_frame(&frame, index) {
                    Ok(()) => {
                        done += 1;
                        log::debug!("Rendered frame {done}/{frames}");
                    }
                    Err(err) => {
                        // Stop the workers; drain what they already sent.
                        cancel.cancel();
                        write_error.get_or_insert(err);
                    }
                }
            }
        });

        if let Some(err) = write_error {
            return Err(err.into());
        }
        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }

        log::info!("Rendered {done} frames in {:.2?}", start.elapsed());
        Ok(movie)
    }

    /// Render one simulated instance into a frame buffer.
    fn render_instance(&self, instance: &SceneInstance, depth_map: bool, verbose: bool) -> Frame {
        let resolution = DVec2::new(self.width as f64, self.height as f64);
        let caster = instance.camera().caster(resolution);

        if verbose {
            log::info!(
                "Rendering {} actor(s) at {}x{}",
                instance.actors().count(),
                self.width,
                self.height
            );
        }
        let start = Instant::now();

        let mut frame = Frame::new(self.width, self.height);
        let mut depth_buffer = vec![f64::INFINITY; (self.width * self.height) as usize];
        let mut max_depth = 0.0f64;

        for y in 0..self.height {
            for x in 0..self.width {
                let (color, depth) = self.render_pixel(instance, &caster, resolution, x, y);
                frame.set(x, y, color.into());
                if depth.is_finite() {
                    max_depth = max_depth.max(depth);
                }
                depth_buffer[(y * self.width + x) as usize] = depth;
            }
        }

        // The depth map needs the maximum over the full image, so it is a
        // second pass after every pixel's depth is known.
        if depth_map {
            for y in 0..self.height {
                for x in 0..self.width {
                    let depth = depth_buffer[(y * self.width + x) as usize];
                    let scaled = if !depth.is_finite() || max_depth == 0.0 {
                        0.0
                    } else {
                        1.0 - depth / max_depth
                    };
                    frame.set(x, y, FRgba::gray(scaled).into());
                }
            }
        }

        if verbose {
            log::info!("Render complete in {:.2?}", start.elapsed());
        }
        frame
    }

    /// Sample every actor along the pixel's camera ray, composite the
    /// depth-sorted results, and run the screen-space shader chain.
    /// Returns the composited color and the nearest hit depth.
    fn render_pixel(
        &self,
        instance: &SceneInstance,
        caster: &RayCaster,
        resolution: DVec2,
        x: u32,
        y: u32,
    ) -> (FRgba, f64) {
        let time = instance.time();
        let screen_pos = run_coord_chain(
            &self.coord_shaders,
            DVec2::new(x as f64, y as f64),
            resolution,
            time,
        );
        let ray = caster.ray(screen_pos);

        let mut queue: Vec<(FRgba, f64)> = Vec::new();
        for actor in instance.actors() {
            let Some(mut sample) = actor.sample(&ray, self.near_clip, time) else {
                continue;
            };
            if instance.has_lights() {
                let intensity = self.light_intensity(instance, &sample);
                sample.color = sample.color.scale_rgb(intensity);
            }
            queue.push((sample.color, sample.distance));
        }

        // Painter's algorithm: farthest first, blended down to the nearest.
        queue.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let depth = queue.last().map(|(_, d)| *d).unwrap_or(f64::INFINITY);

        let mut color = FRgba::default();
        for (sample, _) in &queue {
            color = alpha_blend(*sample, color);
        }

        if queue.is_empty() {
            color = instance.skybox().sample(skybox_uv(ray.direction)).into();
        }

        let color = run_frag_chain(&self.frag_shaders, color, screen_pos, resolution, time);
        (color, depth)
    }

    /// Diffuse point-light shading: base intensity 0.5, plus n.l/2 for
    /// every light whose shadow ray reaches the hit unoccluded.
    fn light_intensity(&self, instance: &SceneInstance, sample: &crate::actor::Sample) -> f64 {
        let camera_center = instance.camera().center;
        let time = instance.time();
        let mut intensity = 0.5;

        for light in instance.lights() {
            // Lights are stored world-space; geometry is camera-relative.
            let light_rel = light.position - camera_center;
            let to_light = light_rel - sample.point;
            let light_dist = to_light.length();
            if light_dist == 0.0 {
                continue;
            }
            let shadow_ray = Ray::new(sample.point, to_light / light_dist);

            let occluded = instance.actors().any(|actor| {
                actor
                    .sample(&shadow_ray, self.shadow_bias, time)
                    .is_some_and(|hit| hit.distance < light_dist)
            });
            if !occluded {
                intensity += sample.normal.dot(shadow_ray.direction) / 2.0;
            }
        }

        intensity.min(1.0)
    }
}

/// Equirectangular UV for a skybox lookup by ray direction.
fn skybox_uv(direction: DVec3) -> DVec2 {
    let dir = direction.normalize_or_zero();
    let phi = dir.x.atan2(dir.z);
    let theta = dir.y.clamp(-1.0, 1.0).asin();
    DVec2::new(0.5 + phi / (2.0 * PI), 0.5 + theta / PI)
}
