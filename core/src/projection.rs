//! World ↔ screen mapping.

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::matrix::Matrix4x4;
use crate::vector::Vector4;

/// Screen rectangle in pixels that normalized device coordinates map onto.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Viewport {
            x,
            y,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Highest visible screen `y` (exclusive).
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Rectangle for `glViewport`, whose origin is the bottom-left corner of
    /// a surface `screen_height` pixels tall, given a viewport measured from
    /// the top-left.
    ///
    /// # Returns
    /// * `(x, y, width, height)` in integer pixels.
    pub fn gl_rect(&self, screen_height: i32) -> (i32, i32, i32, i32) {
        let x = self.x as i32;
        let y = self.y as i32;
        let w = self.width as i32;
        let h = self.height as i32;
        (x, screen_height - h - y, w, h)
    }
}

impl From<Viewport> for Vector4 {
    fn from(v: Viewport) -> Self {
        Vector4::new(v.x, v.y, v.width, v.height)
    }
}

impl From<Vector4> for Viewport {
    fn from(v: Vector4) -> Self {
        Viewport::new(v.x, v.y, v.z, v.w)
    }
}

/// Maps a world-space point to screen space.
///
/// The point is treated as a position (`w` forced to 1), transformed by
/// `model` then `proj_view`, perspective-divided, remapped from `[-1, 1]` to
/// `[0, 1]` on every component, and finally scaled into `viewport` on `x`
/// and `y`. `z` ends up as a `[0, 1]` depth and `w` as 1.
///
/// # Arguments
/// * `world` - Point to project; its `w` is ignored.
/// * `model` - Model matrix applied first.
/// * `proj_view` - Combined projection · view matrix applied second.
/// * `viewport` - Target rectangle in pixels.
///
/// # Returns
/// * The screen-space point. A clip-space `w` of 0 (point on the camera
///   plane) yields non-finite fields.
pub fn project(
    world: Vector4,
    model: &Matrix4x4,
    proj_view: &Matrix4x4,
    viewport: &Viewport,
) -> Vector4 {
    let mut result = Vector4 { w: 1.0, ..world };
    result = model.transform(result);
    result = proj_view.transform(result);

    let half = Vector4::splat(0.5);
    result = result / Vector4::splat(result.w);
    result = result * half + half;

    result.x = result.x * viewport.width + viewport.x;
    result.y = result.y * viewport.height + viewport.y;
    result
}

/// Inverse of [`project`].
///
/// Undoes the viewport mapping and the `[0, 1]` remap, multiplies by the
/// inverse of `proj_view`, and divides by the resulting `w`.
///
/// `model` is accepted for symmetry with [`project`] but is *not* applied;
/// every caller unprojects with an identity model, and the screen clamp
/// offset depends on this exact behaviour.
///
/// # Returns
/// * `Err(MathError::SingularMatrix)` if `proj_view` has no inverse.
pub fn unproject(
    screen: Vector4,
    _model: &Matrix4x4,
    proj_view: &Matrix4x4,
    viewport: &Viewport,
) -> Result<Vector4, MathError> {
    let mut result = screen;
    result.x = (result.x - viewport.x) / viewport.width;
    result.y = (result.y - viewport.y) / viewport.height;

    let half = Vector4::splat(0.5);
    result = (result - half) / half;

    let inverse = proj_view.invert()?;
    result = inverse.transform(result);
    Ok(result / Vector4::splat(result.w))
}
