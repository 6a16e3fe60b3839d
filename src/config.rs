//! Runtime render parameters.
//!
//! Everything the original hard-coded at compile time is a field here, with
//! defaults matching the original constants.

use thiserror::Error;

use crate::linalg::Vec4;
use crate::DEFAULT_RAMP;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("output dimensions must be nonzero (got {width}x{height})")]
    ZeroDimension { width: usize, height: usize },
    #[error("sampling factor must be at least 1")]
    ZeroSampling,
    #[error("step distance must be positive (got {0})")]
    BadStep(f64),
    #[error("max march distance {max} must be at least the step distance {step}")]
    BadMaxDistance { max: f64, step: f64 },
    #[error("luminance ramp must not be empty")]
    EmptyRamp,
    #[error("light direction must have nonzero length")]
    ZeroLight,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output grid size in characters.
    pub width: usize,
    pub height: usize,
    /// Samples per output cell per axis; 1 disables averaging.
    pub sampling_factor: usize,
    /// Length of one march step.
    pub step_dist: f64,
    /// Total distance a ray may march before giving up.
    pub max_dist: f64,
    /// z component of every generated ray direction.
    pub near_plane_z: f64,
    /// Light direction; normalized during validation.
    pub sunlight: Vec4,
    /// Character ramp, darkest to brightest.
    pub ramp: String,
    /// Per-frame rotation applied to every solid, radians.
    pub spin_angle: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 50,
            sampling_factor: 1,
            step_dist: 0.1,
            max_dist: 2.0,
            near_plane_z: 1.0,
            sunlight: Vec4::new(-0.1, -0.2, 0.3),
            ramp: DEFAULT_RAMP.to_string(),
            spin_angle: 4.0_f64.to_radians(),
        }
    }
}

impl RenderConfig {
    /// Check invariants and normalize the light direction. Call once before
    /// rendering; the hot path assumes a valid config.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.sampling_factor == 0 {
            return Err(ConfigError::ZeroSampling);
        }
        if !(self.step_dist > 0.0) {
            return Err(ConfigError::BadStep(self.step_dist));
        }
        if self.max_dist < self.step_dist {
            return Err(ConfigError::BadMaxDistance {
                max: self.max_dist,
                step: self.step_dist,
            });
        }
        if self.ramp.is_empty() {
            return Err(ConfigError::EmptyRamp);
        }
        if self.sunlight.magnitude() == 0.0 {
            return Err(ConfigError::ZeroLight);
        }
        self.sunlight = self.sunlight.unit();
        Ok(self)
    }

    /// Supersampled grid width.
    pub fn ss_width(&self) -> usize {
        self.width * self.sampling_factor
    }

    /// Supersampled grid height.
    pub fn ss_height(&self) -> usize {
        self.height * self.sampling_factor
    }

    /// Number of march steps before a ray is exhausted.
    pub fn max_steps(&self) -> u32 {
        (self.max_dist / self.step_dist) as u32
    }
}
