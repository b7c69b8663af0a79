//! Colour helpers for the voxel shader: HSV conversion, channel remap
//! matrices, highlight glow, and the id-buffer pick colour.

use crate::matrix::Matrix4x4;
use crate::vector::Vector4;

/// Converts `(hue°, saturation%, value%, alpha)` to `(r, g, b, alpha)`.
///
/// Hue wraps into `[0, 360)`, saturation and value are in `0..=100`, and
/// alpha is passed through untouched.
pub fn hsv_to_rgb(hsv: Vector4) -> Vector4 {
    let mut h = hsv.x % 360.0;
    if h < 0.0 {
        h += 360.0;
    }
    let s = hsv.y / 100.0;
    let v = hsv.z / 100.0;

    let c = s * v;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vector4::new(r + m, g + m, b + m, hsv.w)
}

/// How a model's colour channels are remixed before lighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorRemap {
    Identity,
    /// Every output channel is the mean of the inputs.
    Grayscale,
    /// Red → green, green → blue, blue → red. Marks certain allies.
    Ally,
    /// Hue-cycling test pattern; `phase` in `[0, 1)`.
    Rainbow { phase: f32 },
}

impl ColorRemap {
    pub fn matrix(&self) -> Matrix4x4 {
        match self {
            ColorRemap::Identity => Matrix4x4::IDENTITY,
            ColorRemap::Grayscale => {
                let third = Vector4::direction(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
                Matrix4x4::from_cols(third, third, third, Vector4::new(0.0, 0.0, 0.0, 1.0))
            }
            ColorRemap::Ally => Matrix4x4::from_cols(
                Vector4::direction(0.0, 1.0, 0.0),
                Vector4::direction(0.0, 0.0, 1.0),
                Vector4::direction(1.0, 0.0, 0.0),
                Vector4::ZERO,
            ),
            ColorRemap::Rainbow { phase } => {
                let hue = phase * 360.0;
                let column = |offset: f32| hsv_to_rgb(Vector4::new(hue + offset, 100.0, 100.0, 0.0));
                Matrix4x4::from_cols(column(0.0), column(120.0), column(240.0), Vector4::ZERO)
            }
        }
    }

    /// Rainbow remap for the given tick, cycling once every three seconds.
    pub fn rainbow_at(ticks: u32, ticks_per_second: u32) -> ColorRemap {
        let period = (ticks_per_second * 3).max(1);
        ColorRemap::Rainbow {
            phase: (ticks % period) as f32 / period as f32,
        }
    }
}

/// Pulse value for a highlighted entity: ramps 0 → 1 → 0 over 41 ticks.
pub fn highlight_glow(ticks: u32) -> f32 {
    let glow = 0.05 * (ticks % 41) as f32;
    if glow > 1.0 { 1.0 - (glow - 1.0) } else { glow }
}

/// Additive colour for a given glow value, centred on zero.
pub fn highlight_ambient(glow: f32) -> Vector4 {
    let add = (glow - 0.5) * 0.1;
    Vector4::new(add, add, add, 0.0)
}

/// RGBA bytes an entity is drawn with in the object-id pass.
pub fn pick_color(uid: u32) -> [u8; 4] {
    uid.to_le_bytes()
}

/// [`pick_color`] as normalized floats.
pub fn pick_color_f32(uid: u32) -> Vector4 {
    let [r, g, b, a] = pick_color(uid);
    Vector4::new(r as f32, g as f32, b as f32, a as f32) * (1.0 / 255.0)
}

/// Recovers the uid from a pixel read back from the object-id pass.
pub fn uid_from_pixel(pixel: [u8; 4]) -> u32 {
    u32::from_le_bytes(pixel)
}
