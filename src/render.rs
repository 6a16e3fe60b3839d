//! Frame-loop driver.
//!
//! All render state lives in [`RenderState`] and is threaded explicitly;
//! there are no module-level statics. The loop itself is bounded: it runs
//! for a fixed frame count or until a shared cancellation flag flips,
//! checked once per frame boundary.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::config::RenderConfig;
use crate::frame::{compose, DisplayFrame};
use crate::linalg::Mat4;
use crate::marcher::cast_rays;
use crate::scene::Scene;

/// How long to keep rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLimit {
    Count(u64),
    Unbounded,
}

/// Everything one frame reads or mutates: the scene (its solid transforms
/// accumulate rotation), the view matrix, and the validated config.
pub struct RenderState {
    pub scene: Scene,
    pub view: Mat4,
    pub config: RenderConfig,
    frames_rendered: u64,
}

impl RenderState {
    pub fn new(scene: Scene, config: RenderConfig) -> Self {
        Self {
            scene,
            view: Mat4::identity(),
            config,
            frames_rendered: 0,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Advance the scene by one frame and render it: spin solids, march
    /// every sample cell, downsample onto the ramp.
    pub fn render_frame(&mut self) -> DisplayFrame {
        self.scene.advance(self.config.spin_angle);
        let samples = cast_rays(&self.scene, &self.view, &self.config);
        let frame = compose(&samples, &self.config);
        self.frames_rendered += 1;
        trace!("rendered frame {}", self.frames_rendered);
        frame
    }
}

/// Drive the render loop, handing each composed frame to `sink`.
///
/// Stops after `limit` frames, when `cancel` flips, or when the sink
/// reports a broken pipe. An optional minimum frame interval throttles
/// output; `None` spins flat out like the original. Returns the number of
/// frames delivered.
pub fn run<F>(
    state: &mut RenderState,
    limit: FrameLimit,
    cancel: &AtomicBool,
    frame_interval: Option<Duration>,
    mut sink: F,
) -> io::Result<u64>
where
    F: FnMut(&DisplayFrame) -> io::Result<()>,
{
    let mut delivered = 0u64;
    loop {
        if cancel.load(Ordering::Relaxed) {
            debug!("render loop cancelled after {delivered} frames");
            break;
        }
        if let FrameLimit::Count(n) = limit {
            if delivered >= n {
                break;
            }
        }

        let started = Instant::now();
        let frame = state.render_frame();
        match sink(&frame) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => break,
            Err(e) => return Err(e),
        }
        delivered += 1;

        if let Some(interval) = frame_interval {
            let elapsed = started.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
    }
    Ok(delivered)
}
