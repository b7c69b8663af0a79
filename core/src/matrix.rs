//! 4×4 column-major matrices.
//!
//! A matrix is stored as four column vectors. Transforming a vector sums
//! `column_i * v[i]`, so `translate`, `rotate` and `scale` all post-multiply
//! (`M · T`), and the flat array layout matches what `glUniformMatrix4fv`
//! expects with `transpose = false`.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::vector::Vector4;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Matrix4x4 {
    pub x: Vector4,
    pub y: Vector4,
    pub z: Vector4,
    pub w: Vector4,
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Matrix4x4::IDENTITY
    }
}

impl Matrix4x4 {
    pub const IDENTITY: Matrix4x4 = Matrix4x4::scalar(1.0);
    pub const ZERO: Matrix4x4 = Matrix4x4::scalar(0.0);

    /// Diagonal matrix with `f` on the diagonal and zero elsewhere.
    pub const fn scalar(f: f32) -> Self {
        Matrix4x4 {
            x: Vector4::new(f, 0.0, 0.0, 0.0),
            y: Vector4::new(0.0, f, 0.0, 0.0),
            z: Vector4::new(0.0, 0.0, f, 0.0),
            w: Vector4::new(0.0, 0.0, 0.0, f),
        }
    }

    pub const fn from_cols(x: Vector4, y: Vector4, z: Vector4, w: Vector4) -> Self {
        Matrix4x4 { x, y, z, w }
    }

    /// Builds a matrix from 16 floats in column-major order.
    pub fn from_cols_array(a: [f32; 16]) -> Self {
        Matrix4x4 {
            x: Vector4::new(a[0], a[1], a[2], a[3]),
            y: Vector4::new(a[4], a[5], a[6], a[7]),
            z: Vector4::new(a[8], a[9], a[10], a[11]),
            w: Vector4::new(a[12], a[13], a[14], a[15]),
        }
    }

    /// Flattens the matrix column by column, ready for uniform upload.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, col) in self.cols().iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&col.to_array());
        }
        out
    }

    pub fn cols(&self) -> [Vector4; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Element at `row`, `col` (both 0..4).
    pub fn element(&self, row: usize, col: usize) -> f32 {
        self.cols()[col].to_array()[row]
    }

    /// `M · v`.
    #[inline]
    pub fn transform(&self, v: Vector4) -> Vector4 {
        self.x.pow(v.x) + self.y.pow(v.y) + self.z.pow(v.z) + self.w.pow(v.w)
    }

    /// Matrix product `self · other`.
    pub fn multiply(&self, other: &Matrix4x4) -> Matrix4x4 {
        Matrix4x4 {
            x: self.transform(other.x),
            y: self.transform(other.y),
            z: self.transform(other.z),
            w: self.transform(other.w),
        }
    }

    /// `self · T(v)`. Only the fourth column changes; `v.w` is ignored.
    pub fn translate(&self, v: Vector4) -> Matrix4x4 {
        Matrix4x4 {
            w: self.w + (self.x.pow(v.x) + self.y.pow(v.y) + self.z.pow(v.z)),
            ..*self
        }
    }

    /// Rotates by `angle` degrees about `axis` (Rodrigues), composing the
    /// rotation into the first three columns. The translation column is kept.
    ///
    /// The axis is normalized first. A zero axis yields NaN columns, see
    /// [`Matrix4x4::try_rotate`].
    pub fn rotate(&self, angle: f32, axis: Vector4) -> Matrix4x4 {
        let a = (angle / 180.0) * std::f32::consts::PI;
        let c = a.cos();
        let s = a.sin();

        let axis = Vector4::direction(axis.x, axis.y, axis.z).normalize();
        let temp = axis.pow(1.0 - c);

        let r = Matrix4x4::from_cols(
            Vector4::direction(
                c + temp.x * axis.x,
                temp.x * axis.y + s * axis.z,
                temp.x * axis.z - s * axis.y,
            ),
            Vector4::direction(
                temp.y * axis.x - s * axis.z,
                c + temp.y * axis.y,
                temp.y * axis.z + s * axis.x,
            ),
            Vector4::direction(
                temp.z * axis.x + s * axis.y,
                temp.z * axis.y - s * axis.x,
                c + temp.z * axis.z,
            ),
            Vector4::ZERO,
        );

        let compose =
            |col: Vector4| self.x.pow(col.x) + self.y.pow(col.y) + self.z.pow(col.z);

        Matrix4x4 {
            x: compose(r.x),
            y: compose(r.y),
            z: compose(r.z),
            w: self.w,
        }
    }

    pub fn try_rotate(&self, angle: f32, axis: Vector4) -> Result<Matrix4x4, MathError> {
        Vector4::direction(axis.x, axis.y, axis.z)
            .try_normalize()
            .map_err(|_| MathError::DegenerateInput("rotation axis has zero length"))?;
        Ok(self.rotate(angle, axis))
    }

    /// Scales the first three columns by `v.x`, `v.y`, `v.z`.
    pub fn scale(&self, v: Vector4) -> Matrix4x4 {
        Matrix4x4 {
            x: self.x.pow(v.x),
            y: self.y.pow(v.y),
            z: self.z.pow(v.z),
            w: self.w,
        }
    }

    /// Symmetric perspective projection.
    ///
    /// # Arguments
    /// * `fov` - Vertical field of view in degrees.
    /// * `aspect` - Viewport width divided by height.
    /// * `near` - Near clip distance.
    /// * `far` - Far clip distance. Must differ from `near`.
    ///
    /// # Returns
    /// * The projection matrix. `far == near` yields non-finite entries.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Matrix4x4 {
        let h = (fov / 360.0 * std::f32::consts::PI).tan();
        let w = h * aspect;

        let mut result = Matrix4x4::ZERO;
        result.x.x = 1.0 / w;
        result.y.y = 1.0 / h;
        result.z.z = -(far + near) / (far - near);
        result.z.w = -1.0;
        result.w.z = -(2.0 * far * near) / (far - near);
        result
    }

    pub fn try_perspective(
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Matrix4x4, MathError> {
        if far == near {
            return Err(MathError::DegenerateInput("far and near clip planes coincide"));
        }
        if aspect == 0.0 || !aspect.is_finite() {
            return Err(MathError::DegenerateInput("aspect ratio must be finite and non-zero"));
        }
        if (fov / 360.0 * std::f32::consts::PI).tan() == 0.0 {
            return Err(MathError::DegenerateInput("field of view must be non-zero"));
        }
        Ok(Matrix4x4::perspective(fov, aspect, near, far))
    }

    fn rows_f64(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (c, col) in self.cols().iter().enumerate() {
            for (r, value) in col.to_array().iter().enumerate() {
                rows[r][c] = *value as f64;
            }
        }
        rows
    }

    fn cofactors(a: &[[f64; 4]; 4]) -> [[f64; 4]; 4] {
        let mut cof = [[0.0; 4]; 4];
        for (r, cof_row) in cof.iter_mut().enumerate() {
            for (c, cell) in cof_row.iter_mut().enumerate() {
                let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
                *cell = sign * minor(a, r, c);
            }
        }
        cof
    }

    pub fn determinant(&self) -> f64 {
        let a = self.rows_f64();
        let cof = Matrix4x4::cofactors(&a);
        (0..4).map(|r| a[r][0] * cof[r][0]).sum()
    }

    /// Inverse via the adjugate (transposed cofactor matrix) over the
    /// determinant, computed in `f64`.
    ///
    /// Fails only when the determinant is exactly zero. Near-singular inputs
    /// succeed with whatever precision the arithmetic gives.
    pub fn invert(&self) -> Result<Matrix4x4, MathError> {
        let a = self.rows_f64();
        let cof = Matrix4x4::cofactors(&a);

        let det: f64 = (0..4).map(|r| a[r][0] * cof[r][0]).sum();
        if det == 0.0 {
            return Err(MathError::SingularMatrix);
        }
        let inv_det = 1.0 / det;

        // inverse[r][c] = cof[c][r] / det, written out column by column.
        let column = |c: usize| {
            Vector4::new(
                (cof[c][0] * inv_det) as f32,
                (cof[c][1] * inv_det) as f32,
                (cof[c][2] * inv_det) as f32,
                (cof[c][3] * inv_det) as f32,
            )
        };

        Ok(Matrix4x4::from_cols(column(0), column(1), column(2), column(3)))
    }

    pub fn is_finite(&self) -> bool {
        self.cols().iter().all(|c| c.is_finite())
    }
}

/// Determinant of the 3×3 matrix left after removing `skip_row` and `skip_col`.
fn minor(a: &[[f64; 4]; 4], skip_row: usize, skip_col: usize) -> f64 {
    let mut m = [[0.0; 3]; 3];
    let rows = (0..4).filter(|r| *r != skip_row);
    for (mr, r) in rows.enumerate() {
        let cols = (0..4).filter(|c| *c != skip_col);
        for (mc, c) in cols.enumerate() {
            m[mr][mc] = a[r][c];
        }
    }

    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

impl Mul for Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, rhs: Matrix4x4) -> Matrix4x4 {
        self.multiply(&rhs)
    }
}

impl Mul<Vector4> for Matrix4x4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Vector4 {
        self.transform(rhs)
    }
}
