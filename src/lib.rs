//! Cascade Dodge - 2D radiance cascades global illumination on the CPU
//!
//! Core modules:
//! - `scene`: SDF scene builder (primitives to distance + emissive field)
//! - `cascade`: Cascade geometry, ray marching, interval merging, passes
//! - `renderer`: Frame driver owning the ping-pong slots and output image
//! - `config` / `settings`: Validated render config and user settings
//! - `sim`: Deterministic avoid-13 arcade game that produces the scene
//! - `highscores`: Resolution-adjusted leaderboard

pub mod cascade;
pub mod config;
pub mod error;
pub mod highscores;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use config::RenderConfig;
pub use error::{RenderError, Result};
pub use highscores::HighScores;
pub use renderer::{Frame, RadianceCascadeRenderer};
pub use scene::{Primitive, SdfField};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Boxes per wave, valued 1..=BOX_COUNT; the last one is "13"
    pub const BOX_COUNT: u32 = 13;
    /// Box edge length (pixels)
    pub const BOX_SIZE: f32 = 60.0;
    /// Box speed (pixels/s) before the wave multiplier
    pub const BOX_SPEED: f32 = 400.0;
    /// Box 13 moves twice as fast
    pub const ENEMY_BOX_SPEED: f32 = 800.0;
    /// Seconds for a box to reach full glow once inside
    pub const GLOW_RAMP_SECONDS: f32 = 2.0;

    /// Box/box bounce
    pub const BOX_RESTITUTION: f32 = 0.1;
    pub const CORRECTION_PERCENT: f32 = 0.2;
    pub const CORRECTION_SLOP: f32 = 0.01;

    /// Player body rectangle (pixels)
    pub const BODY_WIDTH: f32 = 60.0;
    pub const BODY_HEIGHT: f32 = 160.0;
    /// Pivot height as a fraction of the body, from the bottom
    pub const BODY_PIVOT: f32 = 0.1;

    pub const START_LIVES: i32 = 3;
    /// Hit immunity after losing a life (seconds)
    pub const INVINCIBILITY_SECONDS: f32 = 1.0;
    /// Hits register again once immunity drops to this
    pub const INVINCIBILITY_GRACE: f32 = 0.1;
    /// Wave length (seconds)
    pub const WAVE_DURATION: f32 = 13.0;

    pub const SUPER_METER_MAX: f32 = 100.0;
    /// Meter units drained per second while super mode is held
    pub const SUPER_DRAIN_PER_SECOND: f32 = 1000.0 / 30.0;

    /// Idle AI movement speed (pixels/s)
    pub const AI_SPEED: f32 = 450.0;
    /// Idle AI only flees threats closer than this (pixels)
    pub const AI_FLEE_RADIUS: f32 = 250.0;
}
