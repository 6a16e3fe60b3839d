//! Triangle geometry: the footprint test and plane-normal helpers.
//!
//! The footprint test is an approximation, not exact barycentric math: it
//! builds the three sub-normals a query point forms with consecutive vertex
//! pairs and calls the point "inside" when they are near-parallel. Points
//! well off the triangle's plane but angularly aligned with it can report
//! hits; the marcher's short step length keeps that error visually small.

use crate::linalg::Vec4;

/// Alignment threshold for the sub-normal dot products. Loosening or
/// tightening this changes rendered output, so it is part of the contract.
pub const FOOTPRINT_ALIGNMENT: f64 = 0.9;

/// A triangle stored by value; vertices are in whatever space the caller
/// transformed them into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p0: Vec4,
    pub p1: Vec4,
    pub p2: Vec4,
}

impl Triangle {
    pub const fn new(p0: Vec4, p1: Vec4, p2: Vec4) -> Self {
        Self { p0, p1, p2 }
    }

    /// Unit normal of the triangle's plane, recomputed from the vertices.
    /// Collinear vertices give a zero cross product and a NaN-bearing
    /// normal; that propagates to brightness and is absorbed there.
    pub fn unit_normal(&self) -> Vec4 {
        (self.p1 - self.p0).cross(&(self.p2 - self.p0)).unit()
    }

    /// Absolute distance from `p` to the triangle's plane.
    pub fn plane_distance(&self, p: &Vec4) -> f64 {
        let n = self.unit_normal();
        (n.dot(p) - n.dot(&self.p0)).abs()
    }

    /// Approximate in-footprint test. A zero-magnitude sub-normal means the
    /// point sits on a vertex or edge line; that degenerate case counts as
    /// inside rather than being excluded.
    pub fn contains_footprint(&self, p: &Vec4) -> bool {
        let n1 = (self.p0 - *p).cross(&(self.p1 - *p));
        let n2 = (self.p1 - *p).cross(&(self.p2 - *p));
        let n3 = (self.p2 - *p).cross(&(self.p0 - *p));
        if n1.magnitude() == 0.0 || n2.magnitude() == 0.0 || n3.magnitude() == 0.0 {
            return true;
        }
        let n1 = n1.unit();
        let n2 = n2.unit();
        let n3 = n3.unit();
        n1.dot(&n2) > FOOTPRINT_ALIGNMENT && n2.dot(&n3) > FOOTPRINT_ALIGNMENT
    }

    pub fn centroid(&self) -> Vec4 {
        (self.p0 + self.p1 + self.p2) / 3.0
    }
}
