//! Numeric core of the tile world renderer: vector/matrix algebra, camera
//! and model transforms, world ↔ screen projection, overlay screen clamping,
//! and the smoothed lightmap sampled per vertex.
//!
//! Nothing here talks to a graphics API. Every function takes plain values
//! and returns plain values for the backend to upload or draw with.

pub mod camera;
pub mod color;
pub mod error;
pub mod light;
pub mod logging;
pub mod matrix;
pub mod projection;
pub mod screen_clamp;
pub mod settings;
pub mod vector;

pub use camera::{Camera, CameraMatrices, EntityTransform};
pub use error::{LightError, MathError};
pub use light::{GlobalLightModifier, LightGrid, LightMap, ShadeParams};
pub use logging::initialize_logger;
pub use matrix::Matrix4x4;
pub use projection::{Viewport, project, unproject};
pub use screen_clamp::{ClampOptions, SpriteQuad, vertical_offset};
pub use settings::RenderSettings;
pub use vector::Vector4;
