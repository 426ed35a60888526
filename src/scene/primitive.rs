//! Scene primitives and their closed-form signed distances

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to a capsule (segment `a`-`b` thickened by `radius`)
#[inline]
pub fn sd_capsule(p: Vec2, a: Vec2, b: Vec2, radius: f32) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let len_sq = ba.length_squared();
    // Degenerate segment collapses to a circle at `a`
    let h = if len_sq > 0.0 {
        (pa.dot(ba) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (pa - ba * h).length() - radius
}

/// A shape in the lit scene.
///
/// Positions are in UV space (`[0, 1]` on both axes, y down) and radii are a
/// fraction of the shorter screen side. `color` is the display-space emissive
/// colour picked up by any ray that reaches the shape's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Circle {
        center: Vec2,
        radius: f32,
        color: Vec3,
    },
    Capsule {
        a: Vec2,
        b: Vec2,
        radius: f32,
        color: Vec3,
    },
}

impl Primitive {
    pub fn circle(center: Vec2, radius: f32, color: Vec3) -> Self {
        Primitive::Circle {
            center,
            radius,
            color,
        }
    }

    pub fn capsule(a: Vec2, b: Vec2, radius: f32, color: Vec3) -> Self {
        Primitive::Capsule { a, b, radius, color }
    }

    pub fn color(&self) -> Vec3 {
        match *self {
            Primitive::Circle { color, .. } | Primitive::Capsule { color, .. } => color,
        }
    }

    /// Convert UV-space geometry into pixel space for a `size` texture
    pub fn to_pixels(&self, size: Vec2) -> Self {
        let radius_scale = size.x.min(size.y);
        match *self {
            Primitive::Circle {
                center,
                radius,
                color,
            } => Primitive::Circle {
                center: center * size,
                radius: radius * radius_scale,
                color: color.max(Vec3::ZERO),
            },
            Primitive::Capsule { a, b, radius, color } => Primitive::Capsule {
                a: a * size,
                b: b * size,
                radius: radius * radius_scale,
                color: color.max(Vec3::ZERO),
            },
        }
    }

    /// Signed distance from `p`, in the same space as the primitive's geometry
    #[inline]
    pub fn distance(&self, p: Vec2) -> f32 {
        match *self {
            Primitive::Circle { center, radius, .. } => sd_circle(p, center, radius),
            Primitive::Capsule { a, b, radius, .. } => sd_capsule(p, a, b, radius),
        }
    }
}
