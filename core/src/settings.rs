use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::light::{GlobalLightModifier, ShadeParams};
use crate::screen_clamp::ClampOptions;

pub const DEFAULT_FOV: f32 = 60.0;
pub const DEFAULT_CLIP_NEAR: f32 = 2.0;
pub const DEFAULT_CLIP_FAR: f32 = 4000.0;
pub const DEFAULT_LIGHT_UPDATE_RATE: i32 = 1;

/// Renderer tunables, persisted as JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub clip_near: f32,
    pub clip_far: f32,
    /// Base per-frame lightmap smoothing step.
    pub light_update_rate: i32,
    /// Debug: every vertex samples at full brightness.
    pub fullbright: bool,
    /// Also keep overlay sprites from dropping below the viewport.
    pub clamp_lower_bound: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov: DEFAULT_FOV,
            clip_near: DEFAULT_CLIP_NEAR,
            clip_far: DEFAULT_CLIP_FAR,
            light_update_rate: DEFAULT_LIGHT_UPDATE_RATE,
            fullbright: false,
            clamp_lower_bound: false,
        }
    }
}

impl RenderSettings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("reading settings file {}", path.display()))?;
        let settings = serde_json::from_slice::<RenderSettings>(&bytes)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Loads `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded render settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::error!("Failed to load render settings: {e:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating settings dir {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, format!("{json}\n"))
            .with_context(|| format!("writing settings file {}", path.display()))?;
        Ok(())
    }

    /// Sampling context for this frame's world pass.
    pub fn shade_params(&self, modifier: GlobalLightModifier) -> ShadeParams {
        ShadeParams::for_frame(modifier, self.fullbright)
    }

    pub fn clamp_options(&self) -> ClampOptions {
        ClampOptions {
            lower_bound: self.clamp_lower_bound,
        }
    }
}
