//! Homogeneous vector and matrix algebra for the marcher.
//!
//! `Vec4` is an affine point/direction: `w` stays 1.0 for points and the
//! elementwise operators deliberately touch only x, y, z. That keeps points
//! well-formed under add/sub/scale but means these operators are NOT general
//! homogeneous arithmetic; callers must not rely on `w` math.

use std::ops::{Add, Div, Mul, Sub};

use thiserror::Error;

/// Shape mismatch when building a matrix from runtime-sized rows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected {expected} rows, got {got}")]
    RowCount { expected: usize, got: usize },
    #[error("row {row}: expected {expected} columns, got {got}")]
    ColCount { row: usize, expected: usize, got: usize },
}

/// Point or direction in homogeneous space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vec4 {
    /// An affine point: w fixed at 1.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    fn component(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => self.w,
        }
    }

    /// Euclidean length of the spatial part.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit-length copy. Undefined for zero vectors: the division produces
    /// NaN components, which the marcher treats as a miss downstream.
    pub fn unit(&self) -> Self {
        *self / self.magnitude()
    }

    pub fn dot(&self, rhs: &Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(&self, rhs: &Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, rhs: Vec4) -> Vec4 {
        // Spatial components only; w carried from the left operand.
        Vec4 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w,
        }
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, rhs: Vec4) -> Vec4 {
        Vec4 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            w: self.w,
        }
    }
}

impl Mul<f64> for Vec4 {
    type Output = Vec4;
    fn mul(self, s: f64) -> Vec4 {
        Vec4 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
            w: self.w,
        }
    }
}

impl Div<f64> for Vec4 {
    type Output = Vec4;
    fn div(self, s: f64) -> Vec4 {
        Vec4 {
            x: self.x / s,
            y: self.y / s,
            z: self.z / s,
            w: self.w,
        }
    }
}

/// Row-major R x C matrix. Shapes are part of the type, so malformed
/// literals and mismatched products are compile errors rather than
/// runtime surprises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat<const R: usize, const C: usize> {
    pub m: [[f64; C]; R],
}

/// The working dimension for affine transforms.
pub type Mat4 = Mat<4, 4>;

impl<const R: usize, const C: usize> Mat<R, C> {
    pub const fn new(m: [[f64; C]; R]) -> Self {
        Self { m }
    }

    pub const ZERO: Self = Self::new([[0.0; C]; R]);

    /// Build from runtime-shaped rows, failing fast on any dimension
    /// mismatch (a programming error in the caller, not a render-time
    /// condition).
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ShapeError> {
        if rows.len() != R {
            return Err(ShapeError::RowCount {
                expected: R,
                got: rows.len(),
            });
        }
        let mut m = [[0.0; C]; R];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != C {
                return Err(ShapeError::ColCount {
                    row: r,
                    expected: C,
                    got: row.len(),
                });
            }
            m[r].copy_from_slice(row);
        }
        Ok(Self { m })
    }
}

impl<const S: usize> Mat<S, S> {
    pub fn identity() -> Self {
        let mut m = [[0.0; S]; S];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { m }
    }
}

/// Matrix * vector: dst[r] = sum_c m[r][c] * v[c], with r and c clamped to
/// the vector's dimension. Rows and columns past the fourth are ignored.
impl<const R: usize, const C: usize> Mul<Vec4> for Mat<R, C> {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        let mut acc = [0.0; 4];
        for r in 0..R.min(4) {
            for c in 0..C.min(4) {
                acc[r] += self.m[r][c] * v.component(c);
            }
        }
        let w = if R >= 4 { acc[3] } else { v.w };
        Vec4 {
            x: acc[0],
            y: acc[1],
            z: acc[2],
            w,
        }
    }
}

/// R x K * K x C -> R x C; inner dimensions enforced by the types.
impl<const R: usize, const K: usize, const C: usize> Mul<Mat<K, C>> for Mat<R, K> {
    type Output = Mat<R, C>;

    fn mul(self, rhs: Mat<K, C>) -> Mat<R, C> {
        let mut dst = [[0.0; C]; R];
        for r in 0..R {
            for c in 0..C {
                for k in 0..K {
                    dst[r][c] += self.m[r][k] * rhs.m[k][c];
                }
            }
        }
        Mat { m: dst }
    }
}

/// Homogeneous rotation about the x axis, radians.
pub fn rotation_x(angle: f64) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::new([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, -s, 0.0],
        [0.0, s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Homogeneous rotation about the y axis, radians.
pub fn rotation_y(angle: f64) -> Mat4 {
    let (s, c) = angle.sin_cos();
    Mat4::new([
        [c, 0.0, s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Homogeneous translation.
pub fn translation(x: f64, y: f64, z: f64) -> Mat4 {
    Mat4::new([
        [1.0, 0.0, 0.0, x],
        [0.0, 1.0, 0.0, y],
        [0.0, 0.0, 1.0, z],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn mat_close<const S: usize>(a: &Mat<S, S>, b: &Mat<S, S>, eps: f64) -> bool {
        a.m.iter()
            .flatten()
            .zip(b.m.iter().flatten())
            .all(|(x, y)| close(*x, *y, eps))
    }

    #[test]
    fn add_sub_leave_w_alone() {
        let a = Vec4::new(1.0, 2.0, 3.0);
        let b = Vec4::new(4.0, 5.0, 6.0);
        let sum = a + b;
        assert_eq!(sum, Vec4::new(5.0, 7.0, 9.0));
        assert_eq!(sum.w, 1.0);
        assert_eq!((b - a).w, 1.0);
    }

    #[test]
    fn scale_and_divide_spatial_only() {
        let v = Vec4::new(2.0, -4.0, 6.0) * 0.5;
        assert_eq!(v, Vec4::new(1.0, -2.0, 3.0));
        assert_eq!(v.w, 1.0);
        let d = Vec4::new(2.0, -4.0, 6.0) / 2.0;
        assert_eq!(d, Vec4::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn unit_has_magnitude_one() {
        for v in [
            Vec4::new(3.0, 4.0, 0.0),
            Vec4::new(-0.1, -0.2, 0.3),
            Vec4::new(100.0, 1.0, -7.0),
        ] {
            assert!(close(v.unit().magnitude(), 1.0, EPS));
        }
    }

    #[test]
    fn unit_of_zero_vector_is_nan() {
        // Not guarded at this layer; the marcher coerces NaN to a miss.
        let u = Vec4::ZERO.unit();
        assert!(u.x.is_nan() && u.y.is_nan() && u.z.is_nan());
    }

    #[test]
    fn cross_is_anticommutative() {
        let cases = [
            (Vec4::new(1.0, 0.0, 0.0), Vec4::new(0.0, 1.0, 0.0)),
            (Vec4::new(1.5, -2.0, 0.25), Vec4::new(-3.0, 0.5, 8.0)),
            (Vec4::new(0.0, 0.1, -0.9), Vec4::new(2.0, 2.0, 2.0)),
        ];
        for (a, b) in cases {
            let ab = a.cross(&b);
            let ba = b.cross(&a);
            assert!(close(ab.x, -ba.x, EPS));
            assert!(close(ab.y, -ba.y, EPS));
            assert!(close(ab.z, -ba.z, EPS));
        }
    }

    #[test]
    fn cross_of_axes() {
        let x = Vec4::new(1.0, 0.0, 0.0);
        let y = Vec4::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec4::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn identity_is_multiplicative_identity() {
        let m = Mat4::new([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        let i = Mat4::identity();
        assert!(mat_close(&(i * m), &m, EPS));
        assert!(mat_close(&(m * i), &m, EPS));
    }

    #[test]
    fn matrix_product_is_not_commutative() {
        let a = rotation_x(0.7);
        let b = translation(1.0, 2.0, 3.0);
        assert!(!mat_close(&(a * b), &(b * a), 1e-9));
    }

    #[test]
    fn rectangular_product_shapes() {
        let a: Mat<2, 3> = Mat::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let b: Mat<3, 2> = Mat::new([[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]);
        let p: Mat<2, 2> = a * b;
        assert_eq!(p.m, [[58.0, 64.0], [139.0, 154.0]]);
    }

    #[test]
    fn from_rows_rejects_bad_shapes() {
        let bad_rows = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]];
        assert_eq!(
            Mat::<2, 2>::from_rows(&bad_rows),
            Err(ShapeError::RowCount {
                expected: 2,
                got: 3
            })
        );
        let bad_cols = vec![vec![1.0, 0.0], vec![0.0]];
        assert_eq!(
            Mat::<2, 2>::from_rows(&bad_cols),
            Err(ShapeError::ColCount {
                row: 1,
                expected: 2,
                got: 1
            })
        );
        let ok = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(Mat::<2, 2>::from_rows(&ok), Ok(Mat::<2, 2>::identity()));
    }

    #[test]
    fn rotations_at_zero_are_identity() {
        assert!(mat_close(&rotation_x(0.0), &Mat4::identity(), EPS));
        assert!(mat_close(&rotation_y(0.0), &Mat4::identity(), EPS));
    }

    #[test]
    fn rotation_x_quarter_turn() {
        let m = rotation_x(std::f64::consts::FRAC_PI_2);
        let v = m * Vec4::new(0.0, 1.0, 0.0);
        assert!(close(v.x, 0.0, EPS));
        assert!(close(v.y, 0.0, EPS));
        assert!(close(v.z, 1.0, EPS));
        assert!(close(v.w, 1.0, EPS));
    }

    #[test]
    fn translation_moves_points() {
        let v = translation(1.0, -2.0, 3.0) * Vec4::new(10.0, 10.0, 10.0);
        assert_eq!(v, Vec4::new(11.0, 8.0, 13.0));
        assert!(close(v.w, 1.0, EPS));
    }

    #[test]
    fn smaller_matrix_ignores_homogeneous_row() {
        // A 3x3 transform leaves w untouched.
        let m: Mat<3, 3> = Mat::identity();
        let v = m * Vec4::new(1.0, 2.0, 3.0);
        assert_eq!(v, Vec4::new(1.0, 2.0, 3.0));
        assert_eq!(v.w, 1.0);
    }

    #[test]
    fn repeated_rotation_tracks_single_rotation_for_small_counts() {
        // Accumulating R(theta) N times drifts from R(N*theta); for small N
        // the divergence stays tiny, and it only grows with N.
        let theta = 0.02;
        let n = 50;
        let mut acc = Mat4::identity();
        for _ in 0..n {
            acc = acc * rotation_x(theta);
        }
        let direct = rotation_x(theta * n as f64);
        let drift: f64 = acc
            .m
            .iter()
            .flatten()
            .zip(direct.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(drift < 1e-12, "drift {drift} too large for N={n}");
    }
}
