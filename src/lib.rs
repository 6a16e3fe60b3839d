//! ASCII ray marcher
//!
//! Renders a scene of triangle-mesh solids to the terminal by stepping a ray
//! forward in fixed increments for every character cell until it lands inside
//! a triangle's footprint, then shading the cell from the angle between the
//! triangle's normal and a fixed light direction.

pub mod config;
pub mod frame;
pub mod geometry;
pub mod linalg;
pub mod marcher;
pub mod render;
pub mod scene;
pub mod terminal;

pub use config::RenderConfig;
pub use render::{FrameLimit, RenderState};
pub use scene::Scene;

/// Character ramp from darkest to brightest.
pub const DEFAULT_RAMP: &str = " .:-=+*#%@";
