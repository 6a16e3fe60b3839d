//! Per-cell ray marching.
//!
//! Every supersampled cell gets a ray anchored at the origin, stepped
//! forward in fixed increments until it lands inside some triangle's
//! footprint or runs out of travel budget. Brute force by design: every
//! step tests every triangle of every solid, no acceleration structure,
//! no closest-hit resolution (first footprint match in scene order wins).

use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::geometry::Triangle;
use crate::linalg::{Mat4, Vec4};
use crate::scene::Scene;

/// Row-major grid of per-sample brightness in [0, 1]; 0.0 marks a miss.
/// Fully overwritten every frame.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    width: usize,
    height: usize,
    samples: Vec<f64>,
}

impl SampleBuffer {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.samples[row * self.width + col]
    }

    #[cfg(test)]
    pub fn from_samples(width: usize, height: usize, samples: Vec<f64>) -> Self {
        assert_eq!(samples.len(), width * height);
        Self {
            width,
            height,
            samples,
        }
    }
}

/// March every cell of the supersampled grid through the scene.
///
/// Triangle vertices go through `solid.transform` and then `view`, in that
/// order, once per frame; the per-step tests run against the pre-projected
/// triangles. Rows fan out across rayon; each cell writes only its own
/// sample, so the frame is a plain collect.
pub fn cast_rays(scene: &Scene, view: &Mat4, cfg: &RenderConfig) -> SampleBuffer {
    let triangles = project_triangles(scene, view);
    let light = (*view * cfg.sunlight).unit();

    let ssw = cfg.ss_width();
    let ssh = cfg.ss_height();
    let max_steps = cfg.max_steps();

    let samples: Vec<f64> = (0..ssh)
        .into_par_iter()
        .flat_map_iter(|i| {
            let triangles = &triangles;
            (0..ssw).map(move |j| {
                let dir = Vec4::new(
                    (j as f64 / ssw as f64 - 0.5) * 2.0,
                    (0.5 - i as f64 / ssh as f64) * 2.0,
                    cfg.near_plane_z,
                );
                march(dir, triangles, light, cfg.step_dist, max_steps)
            })
        })
        .collect();

    SampleBuffer {
        width: ssw,
        height: ssh,
        samples,
    }
}

/// Flatten the scene into view-space triangles, preserving scene order so
/// that hit ties keep resolving to the first solid and first triangle.
fn project_triangles(scene: &Scene, view: &Mat4) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(scene.triangle_count());
    for solid in &scene.solids {
        for tri in &solid.triangles {
            let project = |p: Vec4| *view * (solid.transform * p);
            out.push(Triangle::new(
                project(tri.p0),
                project(tri.p1),
                project(tri.p2),
            ));
        }
    }
    out
}

/// Step one ray until it hits a footprint or exhausts its travel budget.
/// Returns the shaded brightness, with NaN (degenerate geometry) coerced
/// to a miss so it can never leak into ramp indexing.
fn march(dir: Vec4, triangles: &[Triangle], light: Vec4, step_dist: f64, max_steps: u32) -> f64 {
    let ray_step = dir.unit() * step_dist;
    let mut pos = dir;

    for _ in 0..max_steps {
        for tri in triangles {
            if tri.contains_footprint(&pos) {
                let brightness = tri.unit_normal().dot(&light).abs();
                return if brightness.is_nan() { 0.0 } else { brightness };
            }
        }
        pos = pos + ray_step;
    }
    0.0
}
