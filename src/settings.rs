//! User-facing render settings
//!
//! Stored as JSON next to the binary. Turned into a validated
//! [`RenderConfig`] with [`Settings::render_config`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::error::Result;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Pixels between cascade-0 probes
    pub fn probe_spacing(&self) -> f32 {
        match self {
            QualityPreset::Low => 4.0,
            QualityPreset::Medium => 2.0,
            QualityPreset::High => 1.0,
        }
    }

    /// Base ray count is `4^exponent`
    pub fn ray_count_exponent(&self) -> u32 {
        match self {
            QualityPreset::Low | QualityPreset::Medium => 1,
            QualityPreset::High => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Resolution ===
    pub width: u32,
    pub height: u32,

    // === Cascades ===
    /// Pixels between cascade-0 probes (set by the preset)
    pub probe_spacing: f32,
    /// Base ray count exponent (set by the preset)
    pub ray_count_exponent: u32,
    /// Multiplier on the first interval length
    pub ray_interval: f32,
    /// Interval end stretch, 1.0 for exact tiling
    pub interval_overlap: f32,
    /// Iteration cap per ray march
    pub max_steps: u32,

    // === Lighting ===
    pub sun: bool,
    /// Sun direction in radians
    pub sun_angle: f32,
    /// Jitter ray angles every frame
    pub noise: bool,
    pub gamma: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let quality = QualityPreset::Medium;
        Self {
            quality,

            width: 640,
            height: 360,

            probe_spacing: quality.probe_spacing(),
            ray_count_exponent: quality.ray_count_exponent(),
            ray_interval: 1.0,
            interval_overlap: 1.0,
            max_steps: 100,

            sun: false,
            sun_angle: 4.2,
            noise: false,
            gamma: 2.2,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.probe_spacing = preset.probe_spacing();
        self.ray_count_exponent = preset.ray_count_exponent();
    }

    /// Validated renderer config for a `width` x `height` target
    pub fn render_config(&self, width: u32, height: u32) -> Result<RenderConfig> {
        let config = RenderConfig {
            width,
            height,
            base_pixels_between_probes: self.probe_spacing,
            ray_count_exponent: self.ray_count_exponent,
            ray_interval: self.ray_interval,
            interval_overlap: self.interval_overlap,
            sun_angle: self.sun_angle,
            srgb_gamma: self.gamma,
            enable_sun: self.sun,
            add_noise: self.noise,
            max_steps: self.max_steps,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file is absent or unreadable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    #[test]
    fn test_preset_round_trip_names() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_apply_preset_sets_probe_spacing() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::High);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.probe_spacing, 1.0);
        assert_eq!(Settings::from_preset(QualityPreset::Low).probe_spacing, 4.0);
    }

    #[test]
    fn test_render_config_maps_fields() {
        let settings = Settings {
            sun: true,
            noise: true,
            gamma: 1.8,
            ..Settings::default()
        };
        let config = settings.render_config(200, 100).unwrap();
        assert_eq!((config.width, config.height), (200, 100));
        assert!(config.enable_sun && config.add_noise);
        assert_eq!(config.srgb_gamma, 1.8);
        assert_eq!(config.base_pixels_between_probes, 2.0);
    }

    #[test]
    fn test_render_config_rejects_bad_values() {
        let settings = Settings {
            probe_spacing: -2.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.render_config(100, 100),
            Err(RenderError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_zero_step_cap_is_rejected() {
        let settings = Settings {
            max_steps: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.render_config(64, 64),
            Err(RenderError::InvalidConfig {
                field: "max_steps",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "sun": true, "width": 320 }"#).unwrap();
        assert!(settings.sun);
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, Settings::default().height);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("cascade-dodge-settings-{}.json", std::process::id()));
        let settings = Settings {
            quality: QualityPreset::Low,
            sun_angle: 1.25,
            ..Settings::from_preset(QualityPreset::Low)
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Settings::load("/nonexistent/cascade-dodge.json").unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
        assert_eq!(Settings::load_or_default("/nonexistent/cascade-dodge.json"), Settings::default());
    }
}
