//! Game state to lit-scene primitives

use glam::{Vec2, Vec3};

use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::scene::Primitive;

pub const WANTED_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const UNWANTED_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);
pub const PLAYER_COLOR: Vec3 = Vec3::new(0.9, 0.9, 1.0);
pub const PLAYER_SUPER_COLOR: Vec3 = Vec3::new(1.0, 0.8, 0.2);

impl GameState {
    /// Primitives for this frame in UV space.
    ///
    /// Boxes become circles tinted by the current rule and scaled by their
    /// glow, so boxes still entering the arena cast shadows without emitting.
    /// The player body is a capsule along its long axis.
    pub fn scene_primitives(&self, super_held: bool) -> Vec<Primitive> {
        let arena = self.arena.max(Vec2::ONE);
        let radius_scale = 1.0 / arena.min_element();
        let mut prims = Vec::with_capacity(self.boxes.len() + 1);

        for b in &self.boxes {
            let tint = if self.is_wanted(b) {
                WANTED_COLOR
            } else {
                UNWANTED_COLOR
            };
            prims.push(Primitive::circle(
                b.pos / arena,
                b.half_extent() * radius_scale,
                tint * b.glow,
            ));
        }

        if self.phase == GamePhase::Playing {
            let radius = BODY_WIDTH / 2.0;
            let corners = self.player.corners();
            // Midpoints of the short edges, pulled in by the cap radius
            let top = (corners[0] + corners[1]) / 2.0;
            let bottom = (corners[2] + corners[3]) / 2.0;
            let axis = (top - bottom).normalize_or_zero();
            let color = if super_held && self.super_available {
                PLAYER_SUPER_COLOR
            } else {
                PLAYER_COLOR
            };
            prims.push(Primitive::capsule(
                (bottom + axis * radius) / arena,
                (top - axis * radius) / arena,
                radius * radius_scale,
                color,
            ));
        }
        prims
    }
}
