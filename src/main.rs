//! ascii-march: terminal ray marcher for triangle-mesh scenes.
//!
//! Usage:
//!   ascii-march                    - spin the demo tetrahedron until q/Esc
//!   ascii-march --frames 100       - render 100 frames, then exit
//!   ascii-march --scene cube.json  - march a scene description file
//!   ascii-march --dump out/ --frames 10  - write frames to text files

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::info;

use ascii_march::config::RenderConfig;
use ascii_march::linalg::Vec4;
use ascii_march::render::{run, FrameLimit, RenderState};
use ascii_march::scene::Scene;
use ascii_march::terminal::TerminalDisplay;

#[derive(Parser)]
#[command(name = "ascii-march")]
#[command(version)]
#[command(about = "Render rotating triangle meshes to the terminal by ray marching")]
struct Cli {
    /// Output width in characters
    #[arg(long, default_value_t = 100)]
    width: usize,

    /// Output height in characters
    #[arg(long, default_value_t = 50)]
    height: usize,

    /// Samples per output cell per axis (1 = no averaging)
    #[arg(long, default_value_t = 1)]
    sampling: usize,

    /// March step length
    #[arg(long, default_value_t = 0.1)]
    step: f64,

    /// Maximum march distance per ray
    #[arg(long, default_value_t = 2.0)]
    max_dist: f64,

    /// Near-plane z offset for generated rays
    #[arg(long, default_value_t = 1.0)]
    near_plane: f64,

    /// Light direction as "x,y,z" (normalized internally)
    #[arg(long, default_value = "-0.1,-0.2,0.3", value_parser = parse_light)]
    light: Vec4,

    /// Luminance ramp, darkest to brightest
    #[arg(long, default_value = ascii_march::DEFAULT_RAMP)]
    ramp: String,

    /// Per-frame rotation in degrees
    #[arg(long, default_value_t = 4.0)]
    spin: f64,

    /// Stop after this many frames instead of running until cancelled
    #[arg(long)]
    frames: Option<u64>,

    /// Cap the frame rate; unset spins flat out
    #[arg(long)]
    fps: Option<f64>,

    /// Scene description file (JSON); defaults to the demo tetrahedron
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Write frames to numbered text files in this directory instead of
    /// drawing to the terminal
    #[arg(long, value_name = "DIR")]
    dump: Option<PathBuf>,
}

fn parse_light(s: &str) -> Result<Vec4, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected \"x,y,z\", got {s:?}"));
    }
    let mut xyz = [0.0; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|e| format!("bad component {part:?}: {e}"))?;
    }
    Ok(Vec4::new(xyz[0], xyz[1], xyz[2]))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = RenderConfig {
        width: cli.width,
        height: cli.height,
        sampling_factor: cli.sampling,
        step_dist: cli.step,
        max_dist: cli.max_dist,
        near_plane_z: cli.near_plane,
        sunlight: cli.light,
        ramp: cli.ramp.clone(),
        spin_angle: cli.spin.to_radians(),
    }
    .validate()
    .context("invalid render parameters")?;

    let scene = match &cli.scene {
        Some(path) => {
            Scene::load(path).with_context(|| format!("loading scene {}", path.display()))?
        }
        None => Scene::tetrahedron(),
    };
    info!(
        "{}x{} output, {} triangles, {} steps per ray",
        config.width,
        config.height,
        scene.triangle_count(),
        config.max_steps()
    );

    let limit = match cli.frames {
        Some(n) => FrameLimit::Count(n),
        None => FrameLimit::Unbounded,
    };
    let interval = cli
        .fps
        .filter(|f| *f > 0.0)
        .map(|f| Duration::from_secs_f64(1.0 / f));
    let mut state = RenderState::new(scene, config);

    let delivered = match cli.dump {
        Some(dir) => run_dump(&mut state, limit, interval, dir)?,
        None => run_interactive(&mut state, limit, interval)?,
    };
    info!("rendered {delivered} frames");
    Ok(())
}

/// Draw to the terminal until the limit is reached or a quit key arrives.
fn run_interactive(
    state: &mut RenderState,
    limit: FrameLimit,
    interval: Option<Duration>,
) -> anyhow::Result<u64> {
    let mut terminal = TerminalDisplay::new().context("failed to initialize terminal")?;
    let cancel = AtomicBool::new(false);

    let delivered = run(state, limit, &cancel, interval, |frame| {
        terminal.draw(frame)?;
        if terminal.poll_quit(Duration::from_millis(1))? {
            cancel.store(true, Ordering::Relaxed);
        }
        Ok(())
    })?;
    Ok(delivered)
}

/// Write frames to numbered files for headless inspection.
fn run_dump(
    state: &mut RenderState,
    limit: FrameLimit,
    interval: Option<Duration>,
    dir: PathBuf,
) -> anyhow::Result<u64> {
    let limit = match limit {
        // Unbounded dumps would fill the disk; default to a short burst.
        FrameLimit::Unbounded => FrameLimit::Count(10),
        bounded => bounded,
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating dump directory {}", dir.display()))?;

    let cancel = AtomicBool::new(false);
    let mut frame_no = 0u32;
    let delivered = run(state, limit, &cancel, interval, |frame| {
        let path = dir.join(format!("frame_{frame_no:03}.txt"));
        fs::write(&path, frame.to_string())?;
        frame_no += 1;
        Ok(())
    })?;
    Ok(delivered)
}
