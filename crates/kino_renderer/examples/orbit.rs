//! Renders a short clip of a cube orbiting a sphere, then exports it with
//! ffmpeg (if available).
//!
//! Run with: cargo run --example orbit --release

use anyhow::Result;
use kino_math::{DVec2, DVec3};
use kino_renderer::{
    frag_shader, ActorBuilder, Camera, FRgba, Renderer, Rgba, SceneBuilder, Texture,
};

fn checker_texture() -> Texture {
    let dark = Rgba::opaque(40, 40, 40);
    let light = Rgba::opaque(220, 220, 220);
    let mut pixels = Vec::with_capacity(64);
    for y in 0..8 {
        for x in 0..8 {
            pixels.push(if (x + y) % 2 == 0 { light } else { dark });
        }
    }
    Texture::from_pixels(8, 8, pixels)
}

fn main() -> Result<()> {
    env_logger::init();

    let scene = SceneBuilder::new()
        .with_framerate(24)
        .with_duration(4.0)
        .with_camera(
            "main",
            Camera::perspective(DVec3::ZERO, DVec3::ZERO, DVec2::splat(70.0), 1.0),
        )
        .with_actor(
            "planet",
            ActorBuilder::sphere()
                .with_position(DVec3::new(0.0, 0.0, 8.0))
                .with_size(DVec3::splat(3.0))
                .with_color(Rgba::opaque(60, 120, 255))
                // Pulse the planet's brightness over time.
                .with_frag_shader(frag_shader(|c, _, _, time| {
                    let pulse = 0.85 + 0.15 * (time * 2.0).sin();
                    FRgba::new(c.r * pulse, c.g * pulse, c.b * pulse, c.a)
                }))
                .build(),
        )
        .with_actor(
            "moon",
            ActorBuilder::cube()
                .with_position(DVec3::new(3.0, 0.0, 8.0))
                .with_size(DVec3::splat(1.2))
                .with_texture(checker_texture())
                .build(),
        )
        .with_light("sun", DVec3::new(-6.0, 6.0, 0.0))
        .with_think(|instance, time, dt| {
            // Orbit the cube around the sphere and spin it as it goes.
            let angle = time * std::f64::consts::FRAC_PI_2;
            if let Some(moon) = instance.actor_mut("moon") {
                moon.position = DVec3::new(3.0 * angle.cos(), 0.0, 8.0 + 3.0 * angle.sin());
                moon.rotation.y += dt;
            }
        })
        .build();

    let renderer = Renderer::new(640, 360, scene)?;
    let movie = renderer.render_movie()?;

    let output = std::path::Path::new("orbit");
    match movie.export(output) {
        Ok(()) => println!("Wrote orbit.mp4"),
        Err(err) => eprintln!("Export failed ({err}); rendered frames are kept until drop"),
    }

    Ok(())
}
