//! Deterministic simulation module
//!
//! The avoid-13 arcade game that feeds the renderer its scene. This module
//! must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (boxes by value)
//! - No rendering or platform dependencies beyond emitting primitives

pub mod collision;
pub mod scene;
pub mod state;
pub mod tick;

pub use collision::{body_corners, boxes_overlap, quads_overlap, resolve_box_collision, rotate_point};
pub use scene::{PLAYER_COLOR, PLAYER_SUPER_COLOR, UNWANTED_COLOR, WANTED_COLOR};
pub use state::{GameEvent, GamePhase, GameState, GlowBox, Player};
pub use tick::{TickInput, tick};
