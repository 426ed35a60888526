//! Interval compositing and the coarse-cascade lookup

use glam::{IVec2, UVec2, Vec3, Vec4};
use std::f32::consts::TAU;

use super::geometry::{BILINEAR_OFFSETS, CascadeGeometry};
use super::texture::RadianceTexture;

/// Far value for rays with nothing beyond them: no light, fully transparent
pub const NO_FURTHER_DATA: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

pub const SUN_COLOR: Vec3 = Vec3::new(3.8, 3.6, 3.2);
pub const SKY_COLOR: Vec3 = Vec3::new(1.2, 1.44, 2.1);
/// Weight of the flat sky term against the sun lobe
const SKY_MIX: f32 = 0.3;

/// Front-to-back compositing of a near interval over a far one
#[inline]
pub fn merge_intervals(near: Vec4, far: Vec4) -> Vec4 {
    (near.truncate() + near.w * far.truncate()).extend(near.w * far.w)
}

/// Sky radiance seen along `ray_angle`, with a `cos^4` sun lobe around `sun_angle`
pub fn sun_and_sky(ray_angle: f32, sun_angle: f32) -> Vec3 {
    let delta = (ray_angle - sun_angle).rem_euclid(TAU);
    let intensity = delta.cos().max(0.0).powi(4);
    (SUN_COLOR * intensity).lerp(SKY_COLOR, SKY_MIX)
}

/// Bilinear fetch of direction group `ray` from cascade `cascade_index + 1`
/// around near-cascade probe `probe`.
///
/// The caller guarantees `cascade_index + 1` is a real cascade and `upper` holds it.
pub fn sample_upper(
    upper: &RadianceTexture,
    geometry: &CascadeGeometry,
    cascade_index: u32,
    probe: UVec2,
    ray: u32,
) -> Vec4 {
    let upper_index = cascade_index + 1;
    let upper_size = geometry.size(upper_index).probe_count.as_ivec2();
    let origin = geometry.group_origin(upper_index, ray).as_ivec2();
    let samples = geometry.coarser_bilinear(probe);
    let weights = samples.weights();

    BILINEAR_OFFSETS
        .iter()
        .zip(weights)
        .map(|(offset, weight)| {
            let tap = (samples.base_index + *offset).clamp(IVec2::ZERO, upper_size - 1);
            upper.fetch(origin + tap) * weight
        })
        .sum()
}
