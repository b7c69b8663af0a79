//! Temporally smoothed tile lightmap.
//!
//! The map's light propagation writes an authoritative `raw` value per tile.
//! Displaying it directly makes lights pop on and off, so the renderer keeps
//! a `smoothed` copy that walks towards `raw` by a bounded step each frame
//! and samples that instead.
//!
//! Both grids are column-major (`y + x * height`), like the map tiles.
//! `smoothed` has a one-cell border of zeros on every side so the 2×2 vertex
//! sample never needs an edge check.

use serde::{Deserialize, Serialize};

use crate::error::LightError;

/// Brightest value a single cell contributes when point sampled.
pub const LIGHT_MAX: i32 = 255;

/// Bias added to the 4-cell sum for self-lit tiles. Equal to four fully lit
/// cells, so emissive tiles always sample at full brightness.
pub const EMISSIVE_LIGHT_BIAS: f64 = 1020.0;

/// Tile index ranges (half-open) that glow on their own (lava and friends).
const EMISSIVE_TILE_RANGES: [(u32, u32); 5] =
    [(64, 72), (129, 135), (136, 139), (285, 293), (294, 302)];

pub fn is_emissive_tile(tile: u32) -> bool {
    EMISSIVE_TILE_RANGES
        .iter()
        .any(|(start, end)| (*start..*end).contains(&tile))
}

/// Camera-local lighting override (e.g. telepathy vision), supplied per frame.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GlobalLightModifier {
    pub active: bool,
    pub value: f64,
}

impl Default for GlobalLightModifier {
    fn default() -> Self {
        GlobalLightModifier {
            active: false,
            value: 1.0,
        }
    }
}

impl GlobalLightModifier {
    pub fn new(value: f64) -> Self {
        GlobalLightModifier {
            active: true,
            value,
        }
    }

    /// The multiplier to apply, 1.0 when inactive.
    pub fn factor(&self) -> f64 {
        if self.active { self.value } else { 1.0 }
    }
}

/// Per-call sampling context for [`LightGrid::sample_bilinear`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeParams {
    pub modifier: f64,
    pub emissive_bias: f64,
    pub fullbright: bool,
}

impl Default for ShadeParams {
    fn default() -> Self {
        ShadeParams {
            modifier: 1.0,
            emissive_bias: 0.0,
            fullbright: false,
        }
    }
}

impl ShadeParams {
    pub fn for_frame(modifier: GlobalLightModifier, fullbright: bool) -> Self {
        ShadeParams {
            modifier: modifier.factor(),
            emissive_bias: 0.0,
            fullbright,
        }
    }

    /// Same parameters with the emissive bias set for `tile`.
    pub fn for_tile(self, tile: u32) -> Self {
        ShadeParams {
            emissive_bias: if is_emissive_tile(tile) {
                EMISSIVE_LIGHT_BIAS
            } else {
                0.0
            },
            ..self
        }
    }
}

/// What one [`LightGrid::update`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub changed_cells: usize,
    pub max_difference: i32,
}

#[derive(Debug, Clone)]
pub struct LightGrid {
    width: usize,
    height: usize,
    raw: Vec<i32>,
    smoothed: Vec<i32>,
}

impl LightGrid {
    /// Allocates a zeroed grid for a `width` × `height` map.
    pub fn new(width: usize, height: usize) -> Result<Self, LightError> {
        if width == 0 || height == 0 {
            return Err(LightError::EmptyGrid);
        }

        let too_large = LightError::TooLarge { width, height };
        let raw_len = width.checked_mul(height).ok_or(too_large)?;
        let smoothed_len = width
            .checked_add(2)
            .zip(height.checked_add(2))
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(too_large)?;

        Ok(LightGrid {
            width,
            height,
            raw: vec![0; raw_len],
            smoothed: vec![0; smoothed_len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn raw_index(&self, x: usize, y: usize) -> usize {
        y + x * self.height
    }

    #[inline]
    fn smoothed_index(&self, x: usize, y: usize) -> usize {
        (y + 1) + (x + 1) * (self.height + 2)
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Authoritative values, column-major. Light propagation writes here.
    pub fn raw(&self) -> &[i32] {
        &self.raw
    }

    pub fn raw_mut(&mut self) -> &mut [i32] {
        &mut self.raw
    }

    pub fn raw_at(&self, x: usize, y: usize) -> Option<i32> {
        (x < self.width && y < self.height).then(|| self.raw[self.raw_index(x, y)])
    }

    pub fn set_raw(&mut self, x: usize, y: usize, value: i32) {
        if x < self.width && y < self.height {
            let index = self.raw_index(x, y);
            self.raw[index] = value;
        }
    }

    pub fn smoothed_at(&self, x: usize, y: usize) -> Option<i32> {
        (x < self.width && y < self.height).then(|| self.smoothed[self.smoothed_index(x, y)])
    }

    /// Per-frame step for a cell whose smoothed and raw values differ by
    /// `difference`.
    fn step(rate: i32, difference: i32, modifier: GlobalLightModifier) -> i32 {
        let mut step = rate.max(0);
        if difference > 64 {
            step = step.saturating_mul(4);
        } else if difference > 32 {
            step = step.saturating_mul(2);
        }

        if modifier.active && step > 0 {
            step = ((step as f64 * modifier.value).round() as i32).max(1);
        }
        step
    }

    /// Moves every smoothed cell towards its raw value.
    ///
    /// The step starts at `rate`, is multiplied by 4 when the cells differ by
    /// more than 64 and by 2 when they differ by more than 32, and is scaled
    /// by the global modifier when it is active (never below 1). A cell never
    /// moves past its raw value.
    ///
    /// # Arguments
    /// * `rate` - Base step, the `light_update_rate` setting.
    /// * `modifier` - This frame's global light modifier.
    ///
    /// # Returns
    /// * How many cells changed and the largest difference seen before the step.
    pub fn update(&mut self, rate: i32, modifier: GlobalLightModifier) -> UpdateStats {
        let mut stats = UpdateStats::default();

        for x in 0..self.width {
            for y in 0..self.height {
                let target = self.raw[self.raw_index(x, y)];
                let index = self.smoothed_index(x, y);
                let current = self.smoothed[index];

                let difference = (current - target).abs();
                if difference == 0 {
                    continue;
                }
                stats.max_difference = stats.max_difference.max(difference);

                let step = Self::step(rate, difference, modifier);
                let next = if current < target {
                    target.min(current.saturating_add(step))
                } else {
                    target.max(current.saturating_sub(step))
                };

                if next != current {
                    self.smoothed[index] = next;
                    stats.changed_cells += 1;
                }
            }
        }

        log::trace!(
            "Light update: {} cells changed, max difference {}",
            stats.changed_cells,
            stats.max_difference
        );
        stats
    }

    /// Replaces the raw grid with `raw` and runs [`LightGrid::update`].
    pub fn update_from(
        &mut self,
        raw: &[i32],
        rate: i32,
        modifier: GlobalLightModifier,
    ) -> Result<UpdateStats, LightError> {
        if raw.len() != self.raw.len() {
            return Err(LightError::DimensionMismatch {
                expected: self.raw.len(),
                actual: raw.len(),
            });
        }
        self.raw.copy_from_slice(raw);
        Ok(self.update(rate, modifier))
    }

    /// Shade for the tile-corner vertex at `(x, y)`, in `[0, 1]`.
    ///
    /// Averages the four smoothed cells sharing that corner, i.e. cells
    /// `(x-1..=x, y-1..=y)`; cells off the map read the zero border. Valid
    /// vertices run from `(0, 0)` to `(width, height)`; anything outside is
    /// clamped to the nearest one.
    pub fn sample_bilinear(&self, x: i32, y: i32, params: &ShadeParams) -> f64 {
        if params.fullbright {
            return 1.0;
        }

        let x = x.clamp(0, self.width as i32) as usize;
        let y = y.clamp(0, self.height as i32) as usize;

        // Top-left of the 2x2 block in bordered coordinates is (x, y).
        let stride = self.height + 2;
        let index = (y + 1) + (x + 1) * stride;

        let sum = self.smoothed[index - 1 - stride]
            + self.smoothed[index - stride]
            + self.smoothed[index - 1]
            + self.smoothed[index];

        let l = sum as f64 * params.modifier + params.emissive_bias;
        (l / (LIGHT_MAX as f64 * 4.0)).clamp(0.0, 1.0)
    }

    /// Shade of the single cell at `(x, y)`, in `[0, 1]`, without
    /// neighbourhood averaging. Off-map reads are fully bright.
    pub fn sample_point(&self, x: i64, y: i64) -> f64 {
        if !self.in_bounds(x, y) {
            return 1.0;
        }
        let value = self.smoothed[self.smoothed_index(x as usize, y as usize)];
        value.clamp(0, LIGHT_MAX) as f64 / LIGHT_MAX as f64
    }

    /// [`LightGrid::sample_point`] for a position in fractional tile units,
    /// as entities are placed.
    pub fn sample_entity(&self, x: f64, y: f64) -> f64 {
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return 1.0;
        }
        self.sample_point(x as i64, y as i64)
    }
}

/// Lightmap lifecycle: nothing is allocated until a map is loaded.
#[derive(Debug, Clone, Default)]
pub enum LightMap {
    #[default]
    Idle,
    Active(LightGrid),
}

impl LightMap {
    /// Allocates a fresh grid for a newly loaded map, replacing any old one.
    pub fn load(&mut self, width: usize, height: usize) -> Result<(), LightError> {
        let grid = LightGrid::new(width, height)?;
        log::debug!("Allocated {}x{} light grid", width, height);
        *self = LightMap::Active(grid);
        Ok(())
    }

    pub fn unload(&mut self) {
        if let LightMap::Active(grid) = self {
            log::debug!("Released {}x{} light grid", grid.width(), grid.height());
        }
        *self = LightMap::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LightMap::Active(_))
    }

    pub fn grid(&self) -> Option<&LightGrid> {
        match self {
            LightMap::Active(grid) => Some(grid),
            LightMap::Idle => None,
        }
    }

    pub fn grid_mut(&mut self) -> Option<&mut LightGrid> {
        match self {
            LightMap::Active(grid) => Some(grid),
            LightMap::Idle => None,
        }
    }

    pub fn update_from(
        &mut self,
        raw: &[i32],
        rate: i32,
        modifier: GlobalLightModifier,
    ) -> Result<UpdateStats, LightError> {
        self.grid_mut()
            .ok_or(LightError::NoMapLoaded)?
            .update_from(raw, rate, modifier)
    }

    /// Vertex shade, fully bright while no map is loaded.
    pub fn sample_bilinear(&self, x: i32, y: i32, params: &ShadeParams) -> f64 {
        self.grid()
            .map_or(1.0, |grid| grid.sample_bilinear(x, y, params))
    }

    pub fn sample_point(&self, x: i64, y: i64) -> f64 {
        self.grid().map_or(1.0, |grid| grid.sample_point(x, y))
    }

    pub fn sample_entity(&self, x: f64, y: f64) -> f64 {
        self.grid().map_or(1.0, |grid| grid.sample_entity(x, y))
    }
}
