//! Integration tests: drive one or more frames the way the world renderer does.

use std::f32::consts::PI;

use render_core::light::EMISSIVE_LIGHT_BIAS;
use render_core::screen_clamp::vertical_offset_or_zero;
use render_core::{
    Camera, ClampOptions, EntityTransform, GlobalLightModifier, LightMap, Matrix4x4,
    RenderSettings, SpriteQuad, Vector4, Viewport, project, unproject, vertical_offset,
};

fn camera() -> Camera {
    Camera {
        x: 4.0,
        y: 6.0,
        z: 0.0,
        yaw: 0.0,
        pitch: 0.0,
        viewport: Viewport::new(0.0, 0.0, 800.0, 600.0),
    }
}

#[test]
fn point_straight_ahead_projects_to_viewport_centre() {
    let settings = RenderSettings::default();
    let cam = camera();
    let matrices = cam.matrices(&settings).expect("valid camera");

    // Ten tiles east of the camera, at eye height.
    let ahead = Vector4::point(14.0 * 32.0, 0.0, 6.0 * 32.0);
    let screen = project(
        ahead,
        &Matrix4x4::IDENTITY,
        &matrices.proj_view(),
        &cam.viewport,
    );
    assert!((screen.x - 400.0).abs() < 0.01, "x = {}", screen.x);
    assert!((screen.y - 300.0).abs() < 0.01, "y = {}", screen.y);
}

#[test]
fn entity_round_trips_through_the_camera() {
    let settings = RenderSettings::default();
    let cam = camera();
    let matrices = cam.matrices(&settings).unwrap();

    let entity = EntityTransform {
        position: Vector4::direction(8.0 * 16.0, 6.5 * 16.0, 0.0),
        yaw: PI / 4.0,
        ..EntityTransform::default()
    };
    let model = entity.model_matrix(None);
    let local = Vector4::point(2.0, 3.0, -1.0);

    let screen = project(local, &model, &matrices.proj_view(), &cam.viewport);
    let world = unproject(screen, &model, &matrices.proj_view(), &cam.viewport).unwrap();
    let expected = model * local;

    assert!((world.x - expected.x).abs() < 5e-2);
    assert!((world.y - expected.y).abs() < 5e-2);
    assert!((world.z - expected.z).abs() < 5e-2);
}

#[test]
fn health_bar_above_camera_is_clamped_then_visible() {
    let settings = RenderSettings::default();
    let cam = camera();
    let matrices = cam.matrices(&settings).unwrap();

    // Bar floating high above a monster three tiles ahead, facing the camera.
    let modelview = matrices
        .view
        .translate(Vector4::direction(7.0 * 32.0, 60.0, 6.0 * 32.0))
        .rotate(180.0, Vector4::direction(0.0, 1.0, 0.0));
    let pvm = matrices.projection * modelview;
    let quad = SpriteQuad::centred(16.0, 4.0, 0.0);

    let offset = vertical_offset(&quad, &pvm, &cam.viewport, settings.clamp_options()).unwrap();
    assert!(offset > 0.0);

    let mut top_left = quad.top_left;
    top_left.y -= offset;
    let screen = project(top_left, &Matrix4x4::IDENTITY, &pvm, &cam.viewport);
    assert!((screen.y - cam.viewport.top()).abs() < 0.1);

    assert_eq!(
        vertical_offset_or_zero(&quad, &pvm, &cam.viewport, ClampOptions::default()),
        offset
    );
}

#[test]
fn lightmap_over_several_frames() {
    let settings = RenderSettings::default();
    let mut lights = LightMap::default();
    lights.load(4, 4).unwrap();

    let mut raw = vec![0; 16];
    // Torch at tile (1, 2); column-major.
    raw[2 + 1 * 4] = 255;

    let modifier = GlobalLightModifier::default();
    let params = settings.shade_params(modifier);

    let mut last = 0.0;
    for _ in 0..120 {
        lights
            .update_from(&raw, settings.light_update_rate, modifier)
            .unwrap();
        let shade = lights.sample_bilinear(2, 3, &params);
        assert!(shade >= last);
        last = shade;
    }
    assert!((last - 0.25).abs() < 1e-9);
    assert!((lights.sample_point(1, 2) - 1.0).abs() < 1e-9);
    assert_eq!(lights.sample_point(40, 2), 1.0);

    // Lava tiles ignore the lightmap.
    let lava = params.for_tile(130);
    assert_eq!(lava.emissive_bias, EMISSIVE_LIGHT_BIAS);
    assert_eq!(lights.sample_bilinear(0, 0, &lava), 1.0);

    // Torch goes out: the shade fades back down without undershooting.
    raw.fill(0);
    for _ in 0..120 {
        lights
            .update_from(&raw, settings.light_update_rate, modifier)
            .unwrap();
        assert!(lights.sample_bilinear(2, 3, &params) >= 0.0);
    }
    assert_eq!(lights.sample_bilinear(2, 3, &params), 0.0);

    lights.unload();
    assert_eq!(lights.sample_bilinear(2, 3, &params), 1.0);
}
