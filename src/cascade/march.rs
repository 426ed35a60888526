//! Sphere tracing through the scene field

use glam::{Vec2, Vec3, Vec4};

use super::geometry::Interval;
use super::merge::NO_FURTHER_DATA;
use crate::scene::SdfField;

/// A sample at or below this distance (texels) counts as a hit
pub const HIT_THRESHOLD: f32 = 0.5;
/// Smallest advance per step, in texels
pub const MIN_STEP: f32 = 0.5;
/// Fraction of the sampled distance actually advanced; nearest-texel lookups overestimate
pub const SAFETY_SCALE: f32 = 0.9;

/// Linearise a display-space colour
#[inline]
pub fn linearize(color: Vec3, gamma: f32) -> Vec3 {
    color.max(Vec3::ZERO).powf(gamma)
}

/// Marches one ray interval against an [`SdfField`].
///
/// Returns `(rgb, transmittance)`: a hit yields the linearised emissive colour
/// with transmittance 0, a miss yields [`NO_FURTHER_DATA`].
#[derive(Debug, Clone, Copy)]
pub struct RayMarcher {
    max_steps: u32,
    gamma: f32,
}

impl RayMarcher {
    pub fn new(max_steps: u32, gamma: f32) -> Self {
        Self { max_steps, gamma }
    }

    pub fn march(&self, field: &SdfField, origin_uv: Vec2, direction: Vec2, interval: Interval) -> Vec4 {
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            return NO_FURTHER_DATA;
        }
        let direction = direction.normalize();
        let size = field.size().as_vec2();
        let origin = origin_uv * size + direction * interval.start;

        let mut travelled = 0.0;
        for _ in 0..self.max_steps {
            if travelled >= interval.length {
                break;
            }
            let p = origin + direction * travelled;
            if p.x < 0.0 || p.y < 0.0 || p.x >= size.x || p.y >= size.y {
                break;
            }
            let sample = field.sample(p);
            if sample.distance <= HIT_THRESHOLD {
                return linearize(sample.radiance, self.gamma).extend(0.0);
            }
            travelled += sample.distance.max(MIN_STEP) * SAFETY_SCALE;
        }
        NO_FURTHER_DATA
    }
}
