//! End-to-end rendering scenarios.

use kino_math::{DVec2, DVec3};
use kino_renderer::{
    ActorBuilder, Camera, CancelToken, MovieOptions, RenderError, Renderer, Rgba, SceneBuilder,
};

/// One blue unit-radius sphere centered 5 units in front of an orthographic
/// camera whose screen plane spans 2 world units.
fn blue_disk_scene() -> kino_renderer::Scene {
    SceneBuilder::new()
        .with_camera(
            "main",
            Camera::orthographic(DVec3::ZERO, DVec3::ZERO, DVec2::splat(2.0)),
        )
        .with_actor(
            "ball",
            ActorBuilder::sphere()
                .with_position(DVec3::new(0.0, 0.0, 5.0))
                .with_size(DVec3::splat(2.0))
                .with_color(Rgba::opaque(0, 0, 255))
                .build(),
        )
        .build()
}

fn moving_sphere_scene(framerate: u32, duration: f64) -> kino_renderer::Scene {
    SceneBuilder::new()
        .with_framerate(framerate)
        .with_duration(duration)
        .with_camera(
            "main",
            Camera::orthographic(DVec3::ZERO, DVec3::ZERO, DVec2::splat(4.0)),
        )
        .with_actor(
            "ball",
            ActorBuilder::sphere()
                .with_position(DVec3::new(-1.0, 0.0, 5.0))
                .with_size(DVec3::splat(2.0))
                .with_color(Rgba::opaque(255, 128, 0))
                .build(),
        )
        .with_think(|instance, _, dt| {
            if let Some(ball) = instance.actor_mut("ball") {
                ball.position.x += dt;
            }
        })
        .build()
}

#[test]
fn blue_disk_covers_half_the_screen() {
    let renderer = Renderer::new(100, 100, blue_disk_scene()).unwrap();
    let frame = renderer.render_frame(0).unwrap();

    let blue = Rgba::opaque(0, 0, 255);

    // Center of the disk.
    assert_eq!(frame.get(50, 50), blue);

    // The disk radius is ~50 px: inside just before the rim, background
    // just after. Sample along the horizontal axis.
    assert_eq!(frame.get(3, 50), blue);
    assert_eq!(frame.get(97, 50), blue);
    assert_eq!(frame.get(50, 3), blue);
    assert_eq!(frame.get(50, 97), blue);

    // Corners lie outside the inscribed disk: transparent background.
    assert_eq!(frame.get(10, 10).a, 0);
    assert_eq!(frame.get(90, 90).a, 0);

    // Measure the disk width along the center row.
    let row_hits = (0..100).filter(|&x| frame.get(x, 50) == blue).count();
    assert!((95..=100).contains(&row_hits), "disk width {row_hits}");
}

#[test]
fn repeated_single_thread_renders_are_identical() {
    let renderer = Renderer::new(64, 64, moving_sphere_scene(10, 1.0)).unwrap();

    let first = renderer.render_frame(7).unwrap();
    let second = renderer.render_frame(7).unwrap();
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn movie_threads_do_not_change_output() {
    let scene = moving_sphere_scene(10, 1.0);
    let frames = scene.time_seq().len();

    let renderer = Renderer::new(32, 32, scene).unwrap();
    let single = renderer
        .render_movie_with(MovieOptions {
            threads: Some(1),
            ..Default::default()
        })
        .unwrap();
    let multi = renderer
        .render_movie_with(MovieOptions {
            threads: Some(4),
            ..Default::default()
        })
        .unwrap();

    for i in 0..frames {
        let a = single.load_frame(i).unwrap();
        let b = multi.load_frame(i).unwrap();
        assert_eq!(a.as_raw(), b.as_raw(), "frame {i} differs");
    }
}

#[test]
fn movie_frames_match_single_frame_renders() {
    let renderer = Renderer::new(24, 24, moving_sphere_scene(5, 1.0)).unwrap();
    let movie = renderer.render_movie().unwrap();

    for index in [0, 2, 4] {
        let from_movie = movie.load_frame(index).unwrap();
        let direct = renderer.render_frame(index).unwrap();
        assert_eq!(from_movie.as_raw(), direct.as_raw(), "frame {index}");
    }
}

#[test]
fn pre_cancelled_movie_render_aborts() {
    let renderer = Renderer::new(16, 16, moving_sphere_scene(10, 1.0)).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = renderer.render_movie_with(MovieOptions {
        cancel: Some(cancel),
        ..Default::default()
    });
    assert!(matches!(result, Err(RenderError::Cancelled)));
}

#[test]
fn depth_map_movie_renders() {
    let renderer = Renderer::new(16, 16, moving_sphere_scene(5, 0.6)).unwrap();
    let movie = renderer
        .render_movie_with(MovieOptions {
            depth_map: true,
            threads: Some(2),
            ..Default::default()
        })
        .unwrap();

    let frame = movie.load_frame(0).unwrap();
    // Depth maps are opaque grayscale.
    for x in 0..16 {
        let p = frame.get(x, 8);
        assert_eq!(p.a, 255);
        assert_eq!(p.r, p.g);
        assert_eq!(p.g, p.b);
    }
}

#[test]
fn think_motion_is_visible_across_frames() {
    let renderer = Renderer::new(64, 64, moving_sphere_scene(2, 2.0)).unwrap();

    // The sphere starts at x = -1 and drifts right by dt each frame.
    let first = renderer.render_frame(0).unwrap();
    let last = renderer.render_frame(3).unwrap();
    assert_ne!(first.as_raw(), last.as_raw());
}
