//! Typed, validated renderer configuration
//!
//! Read-only for the duration of a frame. Hosts build one from
//! [`Settings`](crate::settings::Settings) and hand it to the renderer between
//! frames.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Largest supported `ray_count_exponent` (base ray count 64)
pub const MAX_RAY_COUNT_EXPONENT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Distance in pixels between neighbouring cascade-0 probes
    pub base_pixels_between_probes: f32,
    /// Base ray count is `4^ray_count_exponent`
    pub ray_count_exponent: u32,
    /// Multiplier on the cascade-0 interval length
    pub ray_interval: f32,
    /// Stretch applied to each interval's far end (1.0 = exact tiling)
    pub interval_overlap: f32,
    /// Sun direction in radians
    pub sun_angle: f32,
    /// Display gamma; emissive colours are linearised with it and output re-encoded
    pub srgb_gamma: f32,
    pub enable_sun: bool,
    /// Jitter ray angles per texel and frame
    pub add_noise: bool,
    /// Iteration cap for a single ray march
    pub max_steps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
            base_pixels_between_probes: 2.0,
            ray_count_exponent: 1,
            ray_interval: 1.0,
            interval_overlap: 1.0,
            sun_angle: 0.0,
            srgb_gamma: 2.2,
            enable_sun: false,
            add_noise: false,
            max_steps: 100,
        }
    }
}

impl RenderConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Rays cast per cascade-0 probe
    pub fn base_ray_count(&self) -> u32 {
        4u32.pow(self.ray_count_exponent)
    }

    /// Probe grid extent of cascade 0
    pub fn cascade_extent(&self) -> (u32, u32) {
        (
            (self.width as f32 / self.base_pixels_between_probes).floor() as u32,
            (self.height as f32 / self.base_pixels_between_probes).floor() as u32,
        )
    }

    /// Reject anything that would produce NaN/Inf or an empty texture mid-frame
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::invalid(
                "resolution",
                format!("must be non-zero, got {}x{}", self.width, self.height),
            ));
        }
        positive("base_pixels_between_probes", self.base_pixels_between_probes)?;
        positive("ray_interval", self.ray_interval)?;
        positive("srgb_gamma", self.srgb_gamma)?;

        if !(1..=MAX_RAY_COUNT_EXPONENT).contains(&self.ray_count_exponent) {
            return Err(RenderError::invalid(
                "ray_count_exponent",
                format!(
                    "must be in 1..={MAX_RAY_COUNT_EXPONENT}, got {}",
                    self.ray_count_exponent
                ),
            ));
        }
        if !self.interval_overlap.is_finite() || self.interval_overlap < 1.0 {
            return Err(RenderError::invalid(
                "interval_overlap",
                format!("must be finite and >= 1.0, got {}", self.interval_overlap),
            ));
        }
        if !self.sun_angle.is_finite() {
            return Err(RenderError::invalid("sun_angle", "must be finite"));
        }
        if self.max_steps == 0 {
            return Err(RenderError::invalid("max_steps", "must be at least 1"));
        }

        // The extent cast saturates, so check the quotient before trusting it
        let widest = self.width.max(self.height) as f32 / self.base_pixels_between_probes;
        if widest >= u32::MAX as f32 {
            return Err(RenderError::invalid(
                "base_pixels_between_probes",
                format!(
                    "{} gives a probe grid wider than {} at {}x{}",
                    self.base_pixels_between_probes,
                    u32::MAX,
                    self.width,
                    self.height
                ),
            ));
        }

        let (ex, ey) = self.cascade_extent();
        if ex == 0 || ey == 0 {
            return Err(RenderError::invalid(
                "base_pixels_between_probes",
                format!(
                    "{} leaves no probes at {}x{}",
                    self.base_pixels_between_probes, self.width, self.height
                ),
            ));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RenderError::invalid(
            field,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}
