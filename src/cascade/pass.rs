//! One cascade pass: march every texel's rays and merge with the coarser level

use glam::{UVec2, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rayon::prelude::*;

use super::geometry::{CascadeGeometry, ray_angle, ray_direction};
use super::march::{HIT_THRESHOLD, RayMarcher, linearize};
use super::merge::{NO_FURTHER_DATA, merge_intervals, sample_upper, sun_and_sky};
use super::texture::{PingPong, RadianceTexture};
use crate::config::RenderConfig;
use crate::scene::SdfField;

/// Read-only inputs shared by every pass of a frame
#[derive(Clone, Copy)]
pub struct PassContext<'a> {
    pub geometry: &'a CascadeGeometry,
    pub config: &'a RenderConfig,
    pub field: &'a SdfField,
    pub frame_index: u64,
}

impl PassContext<'_> {
    fn marcher(&self) -> RayMarcher {
        RayMarcher::new(self.config.max_steps, self.config.srgb_gamma)
    }
}

/// Per-texel angular jitter in [0, 1), stable for a given frame, cascade and texel
pub fn texel_jitter(frame_index: u64, cascade_index: u32, texel: UVec2) -> f32 {
    let seed = frame_index.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ ((cascade_index as u64) << 48)
        ^ ((texel.y as u64) << 24)
        ^ texel.x as u64;
    Pcg32::seed_from_u64(seed).random::<f32>()
}

/// Run cascades from coarsest to finest. On return the read slot of
/// `ping_pong` holds cascade 0.
pub fn run_cascades(ctx: &PassContext<'_>, ping_pong: &mut PingPong) {
    for cascade_index in (0..ctx.geometry.cascade_count()).rev() {
        let (read, write) = ping_pong.split();
        run_cascade(ctx, read, write, cascade_index);
        ping_pong.swap();
        log::trace!(
            "cascade {} done ({} rays/probe, interval {:?})",
            cascade_index,
            ctx.geometry.size(cascade_index).ray_count,
            ctx.geometry.interval_bounds(cascade_index)
        );
    }
}

/// Fill `write` with cascade `cascade_index`, reading cascade `cascade_index + 1` from `read`
pub fn run_cascade(
    ctx: &PassContext<'_>,
    read: &RadianceTexture,
    write: &mut RadianceTexture,
    cascade_index: u32,
) {
    let marcher = ctx.marcher();
    write.par_rows_mut().enumerate().for_each(|(y, row)| {
        for (x, texel) in row.iter_mut().enumerate() {
            let at = UVec2::new(x as u32, y as u32);
            *texel = shade_texel(ctx, &marcher, read, cascade_index, at);
        }
    });
}

fn shade_texel(
    ctx: &PassContext<'_>,
    marcher: &RayMarcher,
    read: &RadianceTexture,
    cascade_index: u32,
    texel: UVec2,
) -> Vec4 {
    let geometry = ctx.geometry;
    let Some(location) = geometry.texel_probe(cascade_index, texel) else {
        return NO_FURTHER_DATA;
    };

    if cascade_index == 0 {
        let sample = ctx.field.sample(geometry.probe_center_px(location.probe, 0));
        if sample.distance <= HIT_THRESHOLD {
            return linearize(sample.radiance, ctx.config.srgb_gamma).extend(0.0);
        }
    }

    let base = geometry.base_ray_count();
    let ray_count = geometry.size(cascade_index).ray_count;
    let interval = geometry.interval(cascade_index);
    let origin = geometry.probe_screen_pos(location.probe.as_vec2(), cascade_index);
    let coarsest = geometry.is_coarsest(cascade_index);
    let jitter = if ctx.config.add_noise {
        texel_jitter(ctx.frame_index, cascade_index, texel)
    } else {
        0.0
    };

    let mut total = Vec4::ZERO;
    for k in 0..base {
        let ray = location.group * base + k;
        let angle = ray_angle(ray as u64, ray_count, jitter);
        let near = marcher.march(ctx.field, origin, ray_direction(angle), interval);

        let mut merged = if near.w == 0.0 || coarsest {
            near
        } else {
            merge_intervals(near, sample_upper(read, geometry, cascade_index, location.probe, ray))
        };
        if coarsest && ctx.config.enable_sun {
            let sky = sun_and_sky(angle, ctx.config.sun_angle).max(merged.truncate());
            merged = sky.extend(merged.w);
        }
        total += merged;
    }
    total / base as f32
}
