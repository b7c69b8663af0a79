//! Camera and entity transforms fed to the voxel shader.
//!
//! World space is 32 units per map tile on the ground plane (`x` east,
//! `z` south) with `y` up. Entity positions arrive in sub-tile units of 16
//! per tile and are doubled on the way in.

use std::f32::consts::PI;

use crate::error::MathError;
use crate::matrix::Matrix4x4;
use crate::projection::Viewport;
use crate::settings::RenderSettings;
use crate::vector::Vector4;

/// World units per map tile.
pub const TILE_WORLD_UNITS: f32 = 32.0;
/// World units per entity position unit.
pub const ENTITY_WORLD_SCALE: f32 = 2.0;

const AXIS_X: Vector4 = Vector4::direction(1.0, 0.0, 0.0);
const AXIS_Y: Vector4 = Vector4::direction(0.0, 1.0, 0.0);
const AXIS_Z: Vector4 = Vector4::direction(0.0, 0.0, 1.0);

fn degrees(radians: f32) -> f32 {
    radians * 180.0 / PI
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Position in tiles.
    pub x: f32,
    pub y: f32,
    /// Height offset in world units.
    pub z: f32,
    /// Heading in radians. `3π/2` looks along world `-z`.
    pub yaw: f32,
    /// Pitch in radians, positive looks down.
    pub pitch: f32,
    pub viewport: Viewport,
}

/// The two per-frame uniforms built from a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub projection: Matrix4x4,
    pub view: Matrix4x4,
}

impl CameraMatrices {
    pub fn proj_view(&self) -> Matrix4x4 {
        self.projection * self.view
    }

    /// `(projection, view)` flattened for uniform upload.
    pub fn to_uniforms(&self) -> ([f32; 16], [f32; 16]) {
        (self.projection.to_cols_array(), self.view.to_cols_array())
    }
}

impl Camera {
    pub fn projection(&self, settings: &RenderSettings) -> Result<Matrix4x4, MathError> {
        Matrix4x4::try_perspective(
            settings.fov,
            self.viewport.aspect(),
            settings.clip_near,
            settings.clip_far,
        )
    }

    /// Pitch about `x`, then heading about `y`, then moves the world so the
    /// camera sits at the origin.
    pub fn view(&self) -> Matrix4x4 {
        let rot_x = degrees(self.pitch);
        let rot_y = degrees(self.yaw - 3.0 * PI / 2.0);
        let rot_z = 0.0;

        Matrix4x4::IDENTITY
            .rotate(rot_x, AXIS_X)
            .rotate(rot_y, AXIS_Y)
            .rotate(rot_z, AXIS_Z)
            .translate(Vector4::direction(
                -self.x * TILE_WORLD_UNITS,
                self.z,
                -self.y * TILE_WORLD_UNITS,
            ))
    }

    pub fn matrices(&self, settings: &RenderSettings) -> Result<CameraMatrices, MathError> {
        Ok(CameraMatrices {
            projection: self.projection(settings)?,
            view: self.view(),
        })
    }
}

/// Placement of a voxel model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTransform {
    /// Position in entity units (16 per tile); `z` grows downwards.
    pub position: Vector4,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    /// Pivot offset from `position`, in entity units.
    pub focal: Vector4,
    pub scale: Vector4,
}

impl Default for EntityTransform {
    fn default() -> Self {
        EntityTransform {
            position: Vector4::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            focal: Vector4::ZERO,
            scale: Vector4::direction(1.0, 1.0, 1.0),
        }
    }
}

impl EntityTransform {
    /// Model matrix for the voxel shader.
    ///
    /// `overdraw` attaches the model to the camera (first-person hands,
    /// held items): the camera's position and heading are applied before the
    /// entity's own transform.
    pub fn model_matrix(&self, overdraw: Option<&Camera>) -> Matrix4x4 {
        let mut m = Matrix4x4::IDENTITY;

        if let Some(camera) = overdraw {
            m = m
                .translate(Vector4::direction(
                    camera.x * TILE_WORLD_UNITS,
                    -camera.z,
                    camera.y * TILE_WORLD_UNITS,
                ))
                .rotate(360.0 - degrees(camera.yaw), AXIS_Y)
                .rotate(360.0 - degrees(camera.pitch), AXIS_Z)
                .rotate(0.0, AXIS_X);
        }

        let p = self.position;
        let f = self.focal;
        m.translate(Vector4::direction(
            p.x * ENTITY_WORLD_SCALE,
            -p.z * ENTITY_WORLD_SCALE - 1.0,
            p.y * ENTITY_WORLD_SCALE,
        ))
        .rotate(360.0 - degrees(self.yaw), AXIS_Y)
        .rotate(360.0 - degrees(self.pitch), AXIS_Z)
        .rotate(degrees(self.roll), AXIS_X)
        .translate(Vector4::direction(
            f.x * ENTITY_WORLD_SCALE,
            -f.z * ENTITY_WORLD_SCALE,
            f.y * ENTITY_WORLD_SCALE,
        ))
        .scale(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(actual: Vector4, expected: Vector4, eps: f32) {
        let d = actual - expected;
        assert!(
            d.x.abs() <= eps && d.y.abs() <= eps && d.z.abs() <= eps && d.w.abs() <= eps,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn camera(x: f32, y: f32, yaw: f32) -> Camera {
        Camera {
            x,
            y,
            z: 0.0,
            yaw,
            pitch: 0.0,
            viewport: Viewport::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    #[test]
    fn north_facing_camera_at_origin_has_identity_view() {
        let view = camera(0.0, 0.0, 3.0 * PI / 2.0).view();
        assert_eq!(view, Matrix4x4::IDENTITY);
    }

    #[test]
    fn view_moves_camera_position_to_origin() {
        let view = camera(2.0, 3.0, 3.0 * PI / 2.0).view();
        assert_vec_close(
            view * Vector4::point(64.0, 0.0, 96.0),
            Vector4::point(0.0, 0.0, 0.0),
            1e-4,
        );
    }

    #[test]
    fn east_facing_camera_looks_down_world_x() {
        let view = camera(0.0, 0.0, 0.0).view();
        assert_vec_close(
            view * Vector4::point(100.0, 0.0, 0.0),
            Vector4::point(0.0, 0.0, -100.0),
            1e-3,
        );
    }

    #[test]
    fn camera_height_raises_the_world() {
        let mut cam = camera(0.0, 0.0, 3.0 * PI / 2.0);
        cam.z = 5.0;
        assert_vec_close(
            cam.view() * Vector4::point(0.0, 0.0, -10.0),
            Vector4::point(0.0, 5.0, -10.0),
            1e-5,
        );
    }

    #[test]
    fn projection_uses_viewport_aspect() {
        let settings = RenderSettings::default();
        let cam = camera(0.0, 0.0, 0.0);
        let proj = cam.projection(&settings).unwrap();
        let h = (settings.fov / 360.0 * PI).tan();
        assert!((proj.y.y - 1.0 / h).abs() < 1e-5);
        assert!((proj.x.x - 1.0 / (h * 800.0 / 600.0)).abs() < 1e-5);
    }

    #[test]
    fn empty_viewport_is_degenerate() {
        let mut cam = camera(0.0, 0.0, 0.0);
        cam.viewport.height = 0.0;
        assert!(matches!(
            cam.matrices(&RenderSettings::default()),
            Err(MathError::DegenerateInput(_))
        ));
    }

    #[test]
    fn uniforms_are_column_major() {
        let cam = camera(1.0, 1.0, 3.0 * PI / 2.0);
        let matrices = cam.matrices(&RenderSettings::default()).unwrap();
        let (proj, view) = matrices.to_uniforms();
        assert_eq!(proj[11], -1.0);
        assert_eq!(&view[12..15], &[-32.0, 0.0, -32.0]);
    }

    #[test]
    fn default_entity_sits_one_unit_below_its_anchor() {
        let m = EntityTransform::default().model_matrix(None);
        assert_vec_close(
            m * Vector4::point(0.0, 0.0, 0.0),
            Vector4::point(0.0, -1.0, 0.0),
            1e-5,
        );
    }

    #[test]
    fn entity_position_is_doubled_and_z_flipped() {
        let transform = EntityTransform {
            position: Vector4::direction(16.0, 32.0, -4.0),
            ..EntityTransform::default()
        };
        let m = transform.model_matrix(None);
        assert_vec_close(
            m * Vector4::point(0.0, 0.0, 0.0),
            Vector4::point(32.0, 7.0, 64.0),
            1e-4,
        );
    }

    #[test]
    fn entity_scale_and_focal_apply_in_model_space() {
        let transform = EntityTransform {
            focal: Vector4::direction(1.0, 0.0, 0.0),
            scale: Vector4::direction(2.0, 2.0, 2.0),
            ..EntityTransform::default()
        };
        let m = transform.model_matrix(None);
        assert_vec_close(
            m * Vector4::point(1.0, 0.0, 0.0),
            Vector4::point(4.0, -1.0, 0.0),
            1e-4,
        );
    }

    #[test]
    fn entity_yaw_turns_about_vertical_axis() {
        let transform = EntityTransform {
            yaw: PI / 2.0,
            ..EntityTransform::default()
        };
        let m = transform.model_matrix(None);
        // 360 - 90 = 270 degrees about +y sends +x to +z.
        assert_vec_close(
            m * Vector4::direction(1.0, 0.0, 0.0),
            Vector4::direction(0.0, 0.0, 1.0),
            1e-5,
        );
    }

    #[test]
    fn overdraw_attaches_model_to_camera() {
        let mut cam = camera(1.0, 2.0, 0.0);
        cam.z = 3.0;
        let m = EntityTransform::default().model_matrix(Some(&cam));
        assert_vec_close(
            m * Vector4::point(0.0, 0.0, 0.0),
            Vector4::point(32.0, -4.0, 64.0),
            1e-4,
        );
    }
}
