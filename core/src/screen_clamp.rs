//! Keeps world-anchored overlay sprites (health bars, dialogue bubbles)
//! inside the viewport by sliding them down in world space.

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::matrix::Matrix4x4;
use crate::projection::{Viewport, project, unproject};
use crate::vector::Vector4;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampOptions {
    /// Also push sprites that fall below the viewport back up.
    /// Disabled in shipped builds.
    pub lower_bound: bool,
}

/// Corners of a sprite quad in its local space, as submitted to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteQuad {
    pub top_left: Vector4,
    pub top_right: Vector4,
    pub bottom_left: Vector4,
    pub bottom_right: Vector4,
}

impl SpriteQuad {
    /// Quad facing the camera along local `x`, centred at the origin and
    /// pushed `distance` towards the viewer.
    pub fn centred(width: f32, height: f32, distance: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        SpriteQuad {
            top_left: Vector4::point(distance, hh, hw),
            top_right: Vector4::point(distance, hh, -hw),
            bottom_left: Vector4::point(distance, -hh, hw),
            bottom_right: Vector4::point(distance, -hh, -hw),
        }
    }
}

/// Whether the camera looks at the sprite from the front, judged from the
/// sign of the combined matrix's fourth-column depth term.
fn in_front(proj_view_model: &Matrix4x4) -> bool {
    proj_view_model.w.z >= 0.0
}

/// Vertical offset to subtract from the sprite's local `y` so its top edge
/// stays on screen.
///
/// The top-left corner is projected with an identity model through
/// `proj_view_model`. When it lands at or above the top of `viewport` while
/// the sprite is in front of the camera, the excess in pixels is removed
/// from the screen `y`, the corrected point is unprojected, and the
/// difference between the original and corrected world `y` is returned.
///
/// # Arguments
/// * `quad` - Sprite corners in local space.
/// * `proj_view_model` - Projection · modelview for the sprite.
/// * `viewport` - Visible rectangle in pixels.
/// * `options` - Which bounds to enforce.
///
/// # Returns
/// * `Ok(0.0)` when no correction is needed.
/// * `Err(MathError::SingularMatrix)` when the matrix cannot be inverted;
///   callers skip the correction for that frame.
pub fn vertical_offset(
    quad: &SpriteQuad,
    proj_view_model: &Matrix4x4,
    viewport: &Viewport,
    options: ClampOptions,
) -> Result<f32, MathError> {
    let identity = Matrix4x4::IDENTITY;

    let mut screen = project(quad.top_left, &identity, proj_view_model, viewport);
    if screen.y >= viewport.top() && in_front(proj_view_model) {
        let excess = (screen.y - viewport.top()).abs();
        screen.y -= excess;
        let corrected = unproject(screen, &identity, proj_view_model, viewport)?;
        return Ok(quad.top_left.y - corrected.y);
    }

    if options.lower_bound {
        let mut screen = project(quad.bottom_left, &identity, proj_view_model, viewport);
        if screen.y < viewport.y && in_front(proj_view_model) {
            let excess = (viewport.y - screen.y).abs();
            screen.y -= excess;
            let corrected = unproject(screen, &identity, proj_view_model, viewport)?;
            return Ok(-(quad.bottom_left.y - corrected.y));
        }
    }

    Ok(0.0)
}

/// [`vertical_offset`] for callers that treat a failed inversion as "no
/// correction this frame".
pub fn vertical_offset_or_zero(
    quad: &SpriteQuad,
    proj_view_model: &Matrix4x4,
    viewport: &Viewport,
    options: ClampOptions,
) -> f32 {
    match vertical_offset(quad, proj_view_model, viewport, options) {
        Ok(offset) => offset,
        Err(e) => {
            log::warn!("Skipping screen clamp for this frame: {e}");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClampOptions, SpriteQuad, vertical_offset, vertical_offset_or_zero};
    use crate::error::MathError;
    use crate::matrix::Matrix4x4;
    use crate::projection::{Viewport, project};
    use crate::vector::Vector4;

    const VIEWPORT: Viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);

    /// A bar hovering `lift` units above a point 40 units in front of the
    /// camera. The quad's local `x` axis points back at the viewer.
    fn bar_matrix(lift: f32) -> Matrix4x4 {
        let proj = Matrix4x4::perspective(60.0, VIEWPORT.aspect(), 1.0, 500.0);
        let modelview = Matrix4x4::IDENTITY
            .translate(Vector4::direction(0.0, lift, -40.0))
            .rotate(90.0, Vector4::direction(0.0, 1.0, 0.0));
        proj * modelview
    }

    #[test]
    fn visible_sprite_needs_no_offset() {
        let quad = SpriteQuad::centred(8.0, 2.0, 0.0);
        let offset = vertical_offset(&quad, &bar_matrix(0.0), &VIEWPORT, ClampOptions::default());
        assert_eq!(offset, Ok(0.0));
    }

    #[test]
    fn sprite_above_viewport_is_pulled_down_to_top_edge() {
        let quad = SpriteQuad::centred(8.0, 2.0, 0.0);
        let m = bar_matrix(30.0);

        let before = project(quad.top_left, &Matrix4x4::IDENTITY, &m, &VIEWPORT);
        assert!(before.y >= VIEWPORT.top(), "test sprite should start off screen");

        let offset = vertical_offset(&quad, &m, &VIEWPORT, ClampOptions::default())
            .expect("matrix is invertible");
        assert!(offset > 0.0);

        let mut moved = quad.top_left;
        moved.y -= offset;
        let after = project(moved, &Matrix4x4::IDENTITY, &m, &VIEWPORT);
        assert!(
            (after.y - VIEWPORT.top()).abs() < 0.05,
            "expected top edge at {}, got {}",
            VIEWPORT.top(),
            after.y
        );
    }

    #[test]
    fn lower_bound_is_ignored_by_default() {
        let quad = SpriteQuad::centred(8.0, 2.0, 0.0);
        let m = bar_matrix(-30.0);
        let offset = vertical_offset(&quad, &m, &VIEWPORT, ClampOptions::default());
        assert_eq!(offset, Ok(0.0));
    }

    #[test]
    fn lower_bound_pushes_sprite_up_when_enabled() {
        let quad = SpriteQuad::centred(8.0, 2.0, 0.0);
        let m = bar_matrix(-30.0);
        let options = ClampOptions { lower_bound: true };

        let before = project(quad.bottom_left, &Matrix4x4::IDENTITY, &m, &VIEWPORT);
        assert!(before.y < VIEWPORT.y);

        let offset = vertical_offset(&quad, &m, &VIEWPORT, options).unwrap();
        assert!(offset < 0.0);

        let mut moved = quad.bottom_left;
        moved.y -= offset;
        let after = project(moved, &Matrix4x4::IDENTITY, &m, &VIEWPORT);
        assert!((after.y - VIEWPORT.y).abs() < 0.05, "got {}", after.y);
    }

    #[test]
    fn singular_matrix_is_reported() {
        let quad = SpriteQuad::centred(8.0, 2.0, 0.0);
        // Collapses every point onto one with y far above the viewport.
        let m = Matrix4x4::from_cols(
            Vector4::ZERO,
            Vector4::ZERO,
            Vector4::ZERO,
            Vector4::new(0.0, 5.0, 0.5, 1.0),
        );
        assert_eq!(
            vertical_offset(&quad, &m, &VIEWPORT, ClampOptions::default()),
            Err(MathError::SingularMatrix)
        );
        assert_eq!(
            vertical_offset_or_zero(&quad, &m, &VIEWPORT, ClampOptions::default()),
            0.0
        );
    }
}
