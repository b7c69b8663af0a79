//! Homogeneous 4-component vectors.
//!
//! The same type carries points (`w = 1`), directions (`w = 0`), clip-space
//! coordinates and RGBA colours. All arithmetic is component-wise over the
//! four fields unless noted otherwise.

use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::MathError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub const ZERO: Vector4 = Vector4::splat(0.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Vector4 { x, y, z, w }
    }

    /// Vector with every field set to `f`.
    pub const fn splat(f: f32) -> Self {
        Vector4 {
            x: f,
            y: f,
            z: f,
            w: f,
        }
    }

    /// A position (`w = 1`).
    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Vector4 { x, y, z, w: 1.0 }
    }

    /// A direction (`w = 0`).
    pub const fn direction(x: f32, y: f32, z: f32) -> Self {
        Vector4 { x, y, z, w: 0.0 }
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub const fn from_array(a: [f32; 4]) -> Self {
        Vector4::new(a[0], a[1], a[2], a[3])
    }

    #[inline]
    pub fn add(self, other: Vector4) -> Vector4 {
        Vector4::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }

    #[inline]
    pub fn sub(self, other: Vector4) -> Vector4 {
        Vector4::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }

    /// Component-wise product.
    #[inline]
    pub fn mul(self, other: Vector4) -> Vector4 {
        Vector4::new(
            self.x * other.x,
            self.y * other.y,
            self.z * other.z,
            self.w * other.w,
        )
    }

    /// Component-wise quotient. A zero component in `other` yields an IEEE
    /// infinity or NaN in that slot.
    #[inline]
    pub fn div(self, other: Vector4) -> Vector4 {
        Vector4::new(
            self.x / other.x,
            self.y / other.y,
            self.z / other.z,
            self.w / other.w,
        )
    }

    /// Scales all four fields by `f`.
    #[inline]
    pub fn pow(self, f: f32) -> Vector4 {
        Vector4::new(self.x * f, self.y * f, self.z * f, self.w * f)
    }

    #[inline]
    pub fn dot(self, other: Vector4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Standard cross product of the `xyz` parts. `w` of the result is 0.
    #[inline]
    pub fn cross3(self, other: Vector4) -> Vector4 {
        self.cross3_with_w(other, 0.0)
    }

    /// [`Vector4::cross3`] with the result's `w` set to `w`.
    #[inline]
    pub fn cross3_with_w(self, other: Vector4, w: f32) -> Vector4 {
        Vector4::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
            w,
        )
    }

    /// Cyclic cross product that also folds in `w`.
    ///
    /// This is not a geometric 4-D cross product. Each output field is a 2×2
    /// minor of the inputs taken in the cyclic order `(y,z) (z,w) (w,x) (x,y)`.
    #[inline]
    pub fn cross4(self, other: Vector4) -> Vector4 {
        Vector4::new(
            self.y * other.z - self.z * other.y,
            self.z * other.w - self.w * other.z,
            self.w * other.x - self.x * other.w,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean norm over all four fields.
    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Divides every field by [`Vector4::length`].
    ///
    /// A zero-length input produces NaN in every field. Use
    /// [`Vector4::try_normalize`] when the input is not known to be non-zero.
    #[inline]
    pub fn normalize(self) -> Vector4 {
        let length = self.length();
        Vector4::new(
            self.x / length,
            self.y / length,
            self.z / length,
            self.w / length,
        )
    }

    pub fn try_normalize(self) -> Result<Vector4, MathError> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(MathError::DegenerateInput("cannot normalize a zero-length vector"));
        }
        Ok(self.normalize())
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl From<[f32; 4]> for Vector4 {
    fn from(a: [f32; 4]) -> Self {
        Vector4::from_array(a)
    }
}

impl From<Vector4> for [f32; 4] {
    fn from(v: Vector4) -> Self {
        v.to_array()
    }
}

impl Add for Vector4 {
    type Output = Vector4;

    fn add(self, rhs: Vector4) -> Vector4 {
        Vector4::add(self, rhs)
    }
}

impl Sub for Vector4 {
    type Output = Vector4;

    fn sub(self, rhs: Vector4) -> Vector4 {
        Vector4::sub(self, rhs)
    }
}

impl Mul for Vector4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Vector4 {
        Vector4::mul(self, rhs)
    }
}

impl Mul<f32> for Vector4 {
    type Output = Vector4;

    fn mul(self, rhs: f32) -> Vector4 {
        self.pow(rhs)
    }
}

impl Div for Vector4 {
    type Output = Vector4;

    fn div(self, rhs: Vector4) -> Vector4 {
        Vector4::div(self, rhs)
    }
}

impl Neg for Vector4 {
    type Output = Vector4;

    fn neg(self) -> Vector4 {
        self.pow(-1.0)
    }
}
