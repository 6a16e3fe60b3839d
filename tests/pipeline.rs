//! End-to-end marching and shading scenarios run through the public API.

use std::sync::atomic::AtomicBool;

use ascii_march::config::RenderConfig;
use ascii_march::frame::compose;
use ascii_march::geometry::Triangle;
use ascii_march::linalg::{translation, Mat4, Vec4};
use ascii_march::marcher::cast_rays;
use ascii_march::render::{run, FrameLimit, RenderState};
use ascii_march::scene::{Scene, Solid};

/// One right triangle, unit legs, pushed 2 units down the view axis.
fn single_triangle() -> Scene {
    let tri = Triangle::new(
        Vec4::new(0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0),
        Vec4::new(1.0, 0.0, 0.0),
    );
    Scene::new(vec![Solid::new(vec![tri], translation(0.0, 0.0, 2.0))])
}

fn grid_config(width: usize, height: usize) -> RenderConfig {
    RenderConfig {
        width,
        height,
        ..Default::default()
    }
    .validate()
    .unwrap()
}

#[test]
fn hit_pixel_brightness_matches_the_shading_formula() {
    // On a 12x12 grid, cell (5,7) generates the ray (1/6, 1/6, 1), which
    // passes near the triangle's centroid and lands in its footprint. The
    // triangle's unit normal is (0, 0, -1), so the shaded value is
    // |(0,0,-1) . unit(-0.1,-0.2,0.3)| = 0.3 / sqrt(0.14).
    let cfg = grid_config(12, 12);
    let buf = cast_rays(&single_triangle(), &Mat4::identity(), &cfg);

    let expected = 0.3 / 0.14_f64.sqrt();
    assert!(
        (buf.get(5, 7) - expected).abs() < 1e-9,
        "got {}, want {}",
        buf.get(5, 7),
        expected
    );
}

#[test]
fn hit_pixel_maps_to_the_expected_ramp_character() {
    let cfg = grid_config(12, 12);
    let buf = cast_rays(&single_triangle(), &Mat4::identity(), &cfg);
    let frame = compose(&buf, &cfg);

    // 0.8017... rounds to index 7 of the 10-character default ramp.
    assert_eq!(frame.get(5, 7), '#');
}

#[test]
fn exhausted_rays_render_as_the_darkest_character() {
    let cfg = grid_config(12, 12);
    let buf = cast_rays(&single_triangle(), &Mat4::identity(), &cfg);
    let frame = compose(&buf, &cfg);

    // The corner ray aims far away from the triangle and marches out its
    // whole budget without a footprint hit.
    assert_eq!(buf.get(0, 0), 0.0);
    assert_eq!(frame.get(0, 0), ' ');
}

#[test]
fn factor_one_display_is_a_pure_remap_of_the_samples() {
    let cfg = grid_config(16, 8);
    assert_eq!(cfg.sampling_factor, 1);
    let buf = cast_rays(&Scene::tetrahedron(), &Mat4::identity(), &cfg);
    let frame = compose(&buf, &cfg);

    let ramp: Vec<char> = cfg.ramp.chars().collect();
    for i in 0..cfg.height {
        for j in 0..cfg.width {
            let b = buf.get(i, j).clamp(0.0, 1.0);
            let want = ramp[((ramp.len() - 1) as f64 * b).round() as usize];
            assert_eq!(frame.get(i, j), want, "cell ({i},{j})");
        }
    }
}

#[test]
fn supersampled_frames_average_within_sample_extremes() {
    let ss = RenderConfig {
        width: 20,
        height: 10,
        sampling_factor: 2,
        ..Default::default()
    }
    .validate()
    .unwrap();
    let buf = cast_rays(&Scene::tetrahedron(), &Mat4::identity(), &ss);
    let frame = compose(&buf, &ss);

    let ramp: Vec<char> = ss.ramp.chars().collect();
    for i in 0..ss.height {
        for j in 0..ss.width {
            let block = [
                buf.get(2 * i, 2 * j),
                buf.get(2 * i, 2 * j + 1),
                buf.get(2 * i + 1, 2 * j),
                buf.get(2 * i + 1, 2 * j + 1),
            ];
            let lo = block.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = block.iter().cloned().fold(0.0, f64::max);
            let got = frame.get(i, j);
            let lo_idx = ((ramp.len() - 1) as f64 * lo.clamp(0.0, 1.0)).round() as usize;
            let hi_idx = ((ramp.len() - 1) as f64 * hi.clamp(0.0, 1.0)).round() as usize;
            let got_idx = ramp.iter().position(|c| *c == got).unwrap();
            assert!(
                got_idx >= lo_idx && got_idx <= hi_idx,
                "cell ({i},{j}): {got:?} outside block range"
            );
        }
    }
}

#[test]
fn bounded_run_delivers_frames_of_ramp_characters() {
    let cfg = grid_config(24, 12);
    let ramp = cfg.ramp.clone();
    let mut state = RenderState::new(Scene::tetrahedron(), cfg);
    let cancel = AtomicBool::new(false);

    let delivered = run(&mut state, FrameLimit::Count(3), &cancel, None, |frame| {
        assert_eq!(frame.height(), 12);
        for line in frame.lines() {
            assert_eq!(line.chars().count(), 24);
            assert!(line.chars().all(|c| ramp.contains(c)));
        }
        Ok(())
    })
    .unwrap();

    assert_eq!(delivered, 3);
    assert_eq!(state.frames_rendered(), 3);
}

#[test]
fn spinning_changes_the_rendered_frame() {
    let cfg = grid_config(30, 15);
    let mut state = RenderState::new(Scene::tetrahedron(), cfg);
    let first = state.render_frame();
    // A few more frames of rotation shifts the silhouette.
    for _ in 0..8 {
        state.render_frame();
    }
    let later = state.render_frame();
    assert_ne!(first, later);
}
