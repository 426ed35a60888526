//! Collision detection and response
//!
//! Box/box contacts use axis-aligned overlap with an impulse plus a small
//! positional correction. The player's body is a rotated rectangle, tested
//! against boxes with the separating axis theorem.

use glam::Vec2;

use super::state::GlowBox;
use crate::consts::*;

/// Rotate `p` around `origin` by `angle` radians
#[inline]
pub fn rotate_point(p: Vec2, origin: Vec2, angle: f32) -> Vec2 {
    origin + Vec2::from_angle(angle).rotate(p - origin)
}

/// Corners of the player body rectangle, pivoting at `pos`.
///
/// The pivot sits `BODY_PIVOT` of the height above the bottom edge.
pub fn body_corners(pos: Vec2, rotation: f32) -> [Vec2; 4] {
    let half_width = BODY_WIDTH / 2.0;
    let top = pos.y - (1.0 - BODY_PIVOT) * BODY_HEIGHT;
    let bottom = pos.y + BODY_PIVOT * BODY_HEIGHT;
    [
        Vec2::new(pos.x - half_width, top),
        Vec2::new(pos.x + half_width, top),
        Vec2::new(pos.x + half_width, bottom),
        Vec2::new(pos.x - half_width, bottom),
    ]
    .map(|c| rotate_point(c, pos, rotation))
}

/// Edge normals of a convex quad (not normalised)
fn edge_normals(corners: &[Vec2; 4]) -> [Vec2; 4] {
    std::array::from_fn(|i| {
        let edge = corners[(i + 1) % 4] - corners[i];
        edge.perp()
    })
}

fn project(corners: &[Vec2; 4], axis: Vec2) -> (f32, f32) {
    corners.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), c| {
        let d = c.dot(axis);
        (min.min(d), max.max(d))
    })
}

/// Separating axis test between two convex quads
pub fn quads_overlap(a: &[Vec2; 4], b: &[Vec2; 4]) -> bool {
    edge_normals(a).iter().chain(edge_normals(b).iter()).all(|&axis| {
        let (a_min, a_max) = project(a, axis);
        let (b_min, b_max) = project(b, axis);
        !(a_max < b_min || b_max < a_min)
    })
}

/// Axis-aligned overlap of two boxes
pub fn boxes_overlap(a: &GlowBox, b: &GlowBox) -> bool {
    let (ha, hb) = (a.half_extent(), b.half_extent());
    a.pos.x - ha < b.pos.x + hb
        && a.pos.x + ha > b.pos.x - hb
        && a.pos.y - ha < b.pos.y + hb
        && a.pos.y + ha > b.pos.y - hb
}

/// Push two overlapping boxes apart.
///
/// Equal-mass impulse along the centre line, skipped when they are already
/// separating, then a partial positional correction past the slop.
pub fn resolve_box_collision(a: &mut GlowBox, b: &mut GlowBox) {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return;
    }
    let normal = delta / distance;

    let along_normal = (b.vel - a.vel).dot(normal);
    if along_normal > 0.0 {
        return;
    }
    let impulse = normal * (-(1.0 + BOX_RESTITUTION) * along_normal);
    a.vel -= impulse;
    b.vel += impulse;

    let penetration = a.size - distance;
    if penetration > CORRECTION_SLOP {
        let correction = normal * (penetration * CORRECTION_PERCENT) / 2.0;
        a.pos -= correction;
        b.pos += correction;
    }
}
