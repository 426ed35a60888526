//! Cascade geometry: probe grids, ray counts and ray intervals
//!
//! Everything here is a pure function of the [`RenderConfig`]. Cascade `i`
//! has `sqrt(B)^i` times the probe spacing of cascade 0 and `B^(i+1)` rays
//! per probe, where `B` is the base ray count. Interval lengths grow by `B`
//! per cascade so that the angular and spatial resolution trade off exactly.
//!
//! Texel layout of a cascade texture (cascade-0 extent on both axes):
//! the texture is split into `spacing x spacing` blocks, one per direction
//! group, each holding the cascade's probe grid. Direction group `g`
//! averages rays `g*B .. g*B + B - 1`, so ray `r` of cascade `i` lines up
//! with direction group `r` of cascade `i + 1`.

use glam::{IVec2, UVec2, Vec2};
use std::f32::consts::TAU;

use crate::config::RenderConfig;

/// Probe grid and angular resolution of one cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeSize {
    pub probe_count: UVec2,
    pub ray_count: u64,
}

/// Distance span (pixels) a cascade's rays are responsible for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f32,
    pub length: f32,
}

/// Which probe and direction group a cascade texel belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TexelProbe {
    pub probe: UVec2,
    pub group: u32,
}

/// Tap offsets matching the order of [`bilinear_weights`]
pub const BILINEAR_OFFSETS: [IVec2; 4] = [
    IVec2::new(0, 0),
    IVec2::new(1, 0),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// Standard 4-tap bilinear weights for a fractional offset
#[inline]
pub fn bilinear_weights(ratio: Vec2) -> [f32; 4] {
    [
        (1.0 - ratio.x) * (1.0 - ratio.y),
        ratio.x * (1.0 - ratio.y),
        (1.0 - ratio.x) * ratio.y,
        ratio.x * ratio.y,
    ]
}

/// Integer base probe plus fractional position toward the next one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilinearSamples {
    pub base_index: IVec2,
    pub ratio: Vec2,
}

impl BilinearSamples {
    pub fn from_index(index: Vec2) -> Self {
        let floor = index.floor();
        Self {
            base_index: floor.as_ivec2(),
            ratio: index - floor,
        }
    }

    pub fn weights(&self) -> [f32; 4] {
        bilinear_weights(self.ratio)
    }
}

/// Cascades needed so the coarsest interval reaches across the screen diagonal
pub fn cascade_count_for(width: u32, height: u32) -> u32 {
    let (w, h) = (width as f32, height as f32);
    let diag = (w * w + h * h).sqrt().max(1.0);
    diag.log(4.0).ceil().max(0.0) as u32 + 1
}

/// Ray angle for `index` out of `ray_count`, with an optional jitter in [0, 1)
#[inline]
pub fn ray_angle(index: u64, ray_count: u64, jitter: f32) -> f32 {
    (index as f32 + 0.5 + jitter) * (TAU / ray_count as f32)
}

/// Unit direction for an angle; counter-clockwise on screen (y down)
#[inline]
pub fn ray_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CascadeGeometry {
    resolution: Vec2,
    extent: UVec2,
    probe_spacing: f32,
    base_ray_count: u32,
    branching: u32,
    cascade_count: u32,
    c0_interval: f32,
    overlap: f32,
}

impl CascadeGeometry {
    /// Derive geometry from an already validated config
    pub fn new(config: &RenderConfig) -> Self {
        let base_ray_count = config.base_ray_count();
        let branching = 2u32.pow(config.ray_count_exponent);
        let (ex, ey) = config.cascade_extent();
        let extent = UVec2::new(ex.max(1), ey.max(1));

        // Hand-tuned rule carried from the reference renderer: small bases stretch
        // the first interval by the probe spacing, larger ones by sqrt(base).
        let modifier = if base_ray_count < 16 {
            config.base_pixels_between_probes
        } else {
            branching as f32
        };

        let wanted = cascade_count_for(config.width, config.height);
        let cascade_count = wanted.min(max_cascades(extent, branching));
        if cascade_count < wanted {
            log::debug!(
                "cascade count capped at {} (wanted {}) by {}x{} probe extent",
                cascade_count,
                wanted,
                extent.x,
                extent.y
            );
        }

        Self {
            resolution: Vec2::new(config.width as f32, config.height as f32),
            extent,
            probe_spacing: config.base_pixels_between_probes,
            base_ray_count,
            branching,
            cascade_count,
            c0_interval: config.ray_interval * modifier,
            overlap: config.interval_overlap,
        }
    }

    pub fn cascade_count(&self) -> u32 {
        self.cascade_count
    }

    /// Texture extent shared by every cascade
    pub fn extent(&self) -> UVec2 {
        self.extent
    }

    pub fn resolution(&self) -> Vec2 {
        self.resolution
    }

    pub fn base_ray_count(&self) -> u32 {
        self.base_ray_count
    }

    /// Spatial scale factor between neighbouring cascades (`sqrt(B)`)
    pub fn branching(&self) -> u32 {
        self.branching
    }

    pub fn is_coarsest(&self, cascade_index: u32) -> bool {
        cascade_index + 1 >= self.cascade_count
    }

    /// Probe spacing of cascade `i` in cascade-0 probe units
    pub fn spacing(&self, cascade_index: u32) -> u32 {
        self.branching.saturating_pow(cascade_index)
    }

    pub fn size(&self, cascade_index: u32) -> CascadeSize {
        let spacing = self.spacing(cascade_index);
        CascadeSize {
            probe_count: (self.extent / spacing).max(UVec2::ONE),
            ray_count: (self.base_ray_count as u64).saturating_pow(cascade_index + 1),
        }
    }

    /// Size of one probe cell of cascade `i` in UV units
    pub fn probe_screen_size(&self, cascade_index: u32) -> Vec2 {
        Vec2::splat(self.spacing(cascade_index) as f32 * self.probe_spacing) / self.resolution
    }

    /// UV position of a (possibly fractional) probe index
    pub fn probe_screen_pos(&self, probe_index: Vec2, cascade_index: u32) -> Vec2 {
        (probe_index + 0.5) * self.probe_screen_size(cascade_index)
    }

    pub fn interval_start(&self, cascade_index: u32) -> f32 {
        // Geometric series: sum of B^k for k < i
        let base = self.base_ray_count as u64;
        let mut sum = 0u64;
        let mut term = 1u64;
        for _ in 0..cascade_index {
            sum = sum.saturating_add(term);
            term = term.saturating_mul(base);
        }
        self.c0_interval * sum as f32
    }

    pub fn interval_length(&self, cascade_index: u32) -> f32 {
        self.c0_interval * (self.base_ray_count as f32).powi(cascade_index as i32)
    }

    /// `(start, end)` in pixels; with no overlap `end(i) == start(i + 1)` exactly
    pub fn interval_bounds(&self, cascade_index: u32) -> (f32, f32) {
        let start = self.interval_start(cascade_index);
        let end = self.interval_start(cascade_index + 1)
            + (self.overlap - 1.0) * self.interval_length(cascade_index);
        (start, end)
    }

    pub fn interval(&self, cascade_index: u32) -> Interval {
        let (start, end) = self.interval_bounds(cascade_index);
        Interval {
            start,
            length: end - start,
        }
    }

    /// Top-left texel of direction group `group` in cascade `i`
    pub fn group_origin(&self, cascade_index: u32, group: u32) -> UVec2 {
        let spacing = self.spacing(cascade_index);
        let block = UVec2::new(group % spacing, group / spacing);
        block * self.size(cascade_index).probe_count
    }

    /// Map a cascade texel back to its probe and direction group.
    ///
    /// Returns `None` for the leftover texels when the extent is not a multiple
    /// of the block size.
    pub fn texel_probe(&self, cascade_index: u32, texel: UVec2) -> Option<TexelProbe> {
        let spacing = self.spacing(cascade_index);
        let size = self.size(cascade_index).probe_count;
        let block = texel / size;
        if block.x >= spacing || block.y >= spacing {
            return None;
        }
        Some(TexelProbe {
            probe: texel - block * size,
            group: block.x + spacing * block.y,
        })
    }

    /// Pixel-space centre of a probe
    pub fn probe_center_px(&self, probe: UVec2, cascade_index: u32) -> Vec2 {
        self.probe_screen_pos(probe.as_vec2(), cascade_index) * self.resolution
    }

    /// Bilinear footprint of a cascade-`i` probe inside the cascade `i + 1` grid
    pub fn coarser_bilinear(&self, probe: UVec2) -> BilinearSamples {
        let index = (probe.as_vec2() + 0.5) / self.branching as f32 - 0.5;
        BilinearSamples::from_index(index)
    }
}

/// Largest cascade count whose coarsest probe block still fits in the extent
fn max_cascades(extent: UVec2, branching: u32) -> u32 {
    let min_extent = extent.x.min(extent.y);
    let mut count = 1;
    let mut spacing = Some(branching);
    while let Some(current) = spacing.filter(|s| *s <= min_extent) {
        count += 1;
        spacing = current.checked_mul(branching);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn geometry(width: u32, height: u32, spacing: f32, exponent: u32) -> CascadeGeometry {
        let config = RenderConfig {
            base_pixels_between_probes: spacing,
            ray_count_exponent: exponent,
            ..RenderConfig::new(width, height)
        };
        config.validate().unwrap();
        CascadeGeometry::new(&config)
    }

    #[test]
    fn test_cascade_count_from_diagonal() {
        // 800x600 -> diagonal 1000 -> log4 ~ 4.98 -> 5 + 1
        assert_eq!(cascade_count_for(800, 600), 6);
        assert_eq!(cascade_count_for(1, 1), 2);
    }

    #[test]
    fn test_sizes_follow_base_ray_count() {
        let g = geometry(256, 256, 1.0, 1);
        assert_eq!(g.base_ray_count(), 4);
        assert_eq!(g.branching(), 2);

        let c0 = g.size(0);
        assert_eq!(c0.probe_count, UVec2::new(256, 256));
        assert_eq!(c0.ray_count, 4);

        let c2 = g.size(2);
        assert_eq!(c2.probe_count, UVec2::new(64, 64));
        assert_eq!(c2.ray_count, 64);
    }

    #[test]
    fn test_every_ray_has_a_texel() {
        // Directions per probe equal groups * base rays for every cascade
        let g = geometry(128, 96, 2.0, 1);
        for i in 0..g.cascade_count() {
            let groups = (g.spacing(i) * g.spacing(i)) as u64;
            assert_eq!(groups * g.base_ray_count() as u64, g.size(i).ray_count);
        }
    }

    #[test]
    fn test_probe_count_never_zero() {
        let g = geometry(20, 20, 1.0, 2);
        for i in 0..=g.cascade_count() {
            let size = g.size(i);
            assert!(size.probe_count.x >= 1 && size.probe_count.y >= 1);
        }
    }

    #[test]
    fn test_cascade_count_capped_by_extent() {
        // 20px wide at 1px spacing with branching 4: 4^2 = 16 <= 20 < 64
        let g = geometry(20, 20, 1.0, 2);
        assert_eq!(g.cascade_count(), 3);
    }

    #[test]
    fn test_max_cascades_stops_at_u32_limit() {
        // Spacing overflows before it can exceed the extent
        assert_eq!(max_cascades(UVec2::splat(u32::MAX), 2), 32);
        assert_eq!(max_cascades(UVec2::splat(u32::MAX), 4), 16);
        assert_eq!(max_cascades(UVec2::new(u32::MAX, 3), 2), 2);
    }

    #[test]
    fn test_probe_screen_pos_centres_probe() {
        let g = geometry(100, 100, 2.0, 1);
        let uv = g.probe_screen_pos(Vec2::new(0.0, 0.0), 0);
        assert!((uv - Vec2::splat(0.01)).length() < 1e-6);
        let px = g.probe_center_px(UVec2::new(24, 24), 0);
        assert!((px - Vec2::splat(49.0)).length() < 1e-4);
    }

    #[test]
    fn test_texel_probe_round_trips_group_origin() {
        let g = geometry(64, 64, 1.0, 1);
        let i = 2;
        let size = g.size(i).probe_count;
        for group in 0..g.spacing(i) * g.spacing(i) {
            let origin = g.group_origin(i, group);
            let probe = UVec2::new(3, 5);
            let loc = g.texel_probe(i, origin + probe).unwrap();
            assert_eq!(loc.group, group);
            assert_eq!(loc.probe, probe);
            assert!(probe.x < size.x && probe.y < size.y);
        }
    }

    #[test]
    fn test_texel_probe_leftover_texels() {
        // Extent 10 with spacing 4 -> blocks of 2, last 2 texels unused
        let g = geometry(10, 10, 1.0, 2);
        assert_eq!(g.size(1).probe_count, UVec2::new(2, 2));
        assert!(g.texel_probe(1, UVec2::new(9, 0)).is_none());
        assert!(g.texel_probe(1, UVec2::new(7, 7)).is_some());
    }

    #[test]
    fn test_bilinear_weights_sum_to_one() {
        let w = bilinear_weights(Vec2::new(0.25, 0.75));
        assert!((w.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((w[0] - 0.75 * 0.25).abs() < 1e-6);
        assert!((w[3] - 0.25 * 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_coarser_bilinear_footprint() {
        let g = geometry(64, 64, 1.0, 1);
        // Probe 3 sits at 3.5 / 2 - 0.5 = 1.25 in the coarser grid
        let s = g.coarser_bilinear(UVec2::new(3, 2));
        assert_eq!(s.base_index, IVec2::new(1, 0));
        assert!((s.ratio - Vec2::new(0.25, 0.75)).length() < 1e-6);

        // Probe 0 lands before the first coarse probe; the tap gets clamped later
        let s = g.coarser_bilinear(UVec2::ZERO);
        assert_eq!(s.base_index, IVec2::new(-1, -1));
    }

    #[test]
    fn test_ray_angles_cover_circle() {
        let count = 16;
        let first = ray_angle(0, count, 0.0);
        let last = ray_angle(count - 1, count, 0.0);
        assert!((first - TAU / 32.0).abs() < 1e-6);
        assert!((last - (TAU - TAU / 32.0)).abs() < 1e-5);
        let d = ray_direction(std::f32::consts::FRAC_PI_2);
        assert!((d - Vec2::new(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_interval_overlap_extends_end() {
        let config = RenderConfig {
            interval_overlap: 1.1,
            ..RenderConfig::new(256, 256)
        };
        let g = CascadeGeometry::new(&config);
        for i in 0..g.cascade_count() {
            let (_, end) = g.interval_bounds(i);
            assert!(end > g.interval_start(i + 1));
        }
    }

    proptest! {
        #[test]
        fn prop_intervals_tile_without_gaps(
            width in 8u32..2048,
            height in 8u32..2048,
            spacing in 1.0f32..4.0,
            exponent in 1u32..=3,
            ray_interval in 0.25f32..4.0,
        ) {
            let config = RenderConfig {
                base_pixels_between_probes: spacing,
                ray_count_exponent: exponent,
                ray_interval,
                ..RenderConfig::new(width, height)
            };
            let g = CascadeGeometry::new(&config);
            prop_assert_eq!(g.interval_start(0), 0.0);
            for i in 0..g.cascade_count() {
                let (start, end) = g.interval_bounds(i);
                let (next_start, _) = g.interval_bounds(i + 1);
                prop_assert_eq!(end, next_start);
                prop_assert!(end > start);
            }
        }

        #[test]
        fn prop_interval_length_scales_with_base(exponent in 1u32..=3, i in 0u32..5) {
            let config = RenderConfig { ray_count_exponent: exponent, ..RenderConfig::new(512, 512) };
            let g = CascadeGeometry::new(&config);
            let base = g.base_ray_count() as f32;
            let ratio = g.interval_length(i + 1) / g.interval_length(i);
            prop_assert!((ratio - base).abs() < 1e-3 * base);
        }
    }
}
