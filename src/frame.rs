//! Frame assembly: block-average the sample grid down to output size and
//! quantize brightness onto the character ramp.

use crate::config::RenderConfig;
use crate::marcher::SampleBuffer;

/// Row-major grid of output characters; overwritten every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    width: usize,
    height: usize,
    chars: Vec<char>,
}

impl DisplayFrame {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> char {
        self.chars[row * self.width + col]
    }

    /// Fixed-width output rows, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.chars
            .chunks(self.width)
            .map(|row| row.iter().collect())
    }
}

impl std::fmt::Display for DisplayFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Downsample and quantize one frame.
///
/// A single uniform path: every output cell averages its
/// `sampling_factor^2` block, and a factor of 1 simply averages a 1x1
/// block. Brightness is clamped to [0, 1] before ramp indexing so a hot or
/// negative sample can never index outside the ramp.
pub fn compose(samples: &SampleBuffer, cfg: &RenderConfig) -> DisplayFrame {
    let factor = cfg.sampling_factor;
    let ramp: Vec<char> = cfg.ramp.chars().collect();
    let mut chars = Vec::with_capacity(cfg.width * cfg.height);

    for i in 0..cfg.height {
        for j in 0..cfg.width {
            let mut sum = 0.0;
            for si in i * factor..(i + 1) * factor {
                for sj in j * factor..(j + 1) * factor {
                    sum += samples.get(si, sj);
                }
            }
            let brightness = sum / (factor * factor) as f64;
            chars.push(ramp_char(&ramp, brightness));
        }
    }

    DisplayFrame {
        width: cfg.width,
        height: cfg.height,
        chars,
    }
}

fn ramp_char(ramp: &[char], brightness: f64) -> char {
    let b = if brightness.is_nan() {
        0.0
    } else {
        brightness.clamp(0.0, 1.0)
    };
    let index = ((ramp.len() - 1) as f64 * b).round() as usize;
    ramp[index.min(ramp.len() - 1)]
}
