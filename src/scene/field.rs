//! Per-frame signed distance field with winner-take-all emissive colour

use glam::{UVec2, Vec2, Vec3};
use rayon::prelude::*;

use super::primitive::Primitive;
use crate::error::{Result, try_alloc};

/// Running-minimum start value; an empty scene stays at this distance everywhere
pub const DISTANCE_SENTINEL: f32 = 1e6;

/// One texel of the scene field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfSample {
    /// Signed distance to the nearest shape boundary, in texels
    pub distance: f32,
    /// Display-space emissive colour of the nearest shape
    pub radiance: Vec3,
    /// Texel centre lies inside (or on) a shape
    pub hit: bool,
}

impl SdfSample {
    pub const EMPTY: SdfSample = SdfSample {
        distance: DISTANCE_SENTINEL,
        radiance: Vec3::ZERO,
        hit: false,
    };
}

/// Distance + emissive texture at screen resolution
#[derive(Debug, Clone)]
pub struct SdfField {
    width: u32,
    height: u32,
    texels: Vec<SdfSample>,
}

impl SdfField {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = (width as usize).saturating_mul(height as usize);
        let texels = try_alloc("sdf field", len, SdfSample::EMPTY)?;
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Field with the same sample everywhere
    pub fn filled(width: u32, height: u32, sample: SdfSample) -> Result<Self> {
        let mut field = Self::new(width, height)?;
        field.texels.fill(sample);
        Ok(field)
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn texels(&self) -> &[SdfSample] {
        &self.texels
    }

    /// Rebuild the field from this frame's primitives
    pub fn build(&mut self, primitives: &[Primitive]) {
        let size = self.size().as_vec2();
        let shapes: Vec<Primitive> = primitives.iter().map(|p| p.to_pixels(size)).collect();
        let width = self.width as usize;

        self.texels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, texel) in row.iter_mut().enumerate() {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    *texel = evaluate(&shapes, p);
                }
            });

        log::trace!(
            "sdf field rebuilt: {}x{}, {} primitives",
            self.width,
            self.height,
            primitives.len()
        );
    }

    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> &SdfSample {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        &self.texels[y as usize * self.width as usize + x as usize]
    }

    /// Nearest-texel fetch at a pixel-space position (clamped to the edge)
    #[inline]
    pub fn sample(&self, p: Vec2) -> &SdfSample {
        let x = p.x.max(0.0) as u32;
        let y = p.y.max(0.0) as u32;
        self.texel(x, y)
    }

    /// Nearest-texel fetch at a UV position
    #[inline]
    pub fn sample_uv(&self, uv: Vec2) -> &SdfSample {
        self.sample(uv * self.size().as_vec2())
    }
}

/// Minimum distance over all shapes; the closest shape alone supplies the colour
fn evaluate(shapes: &[Primitive], p: Vec2) -> SdfSample {
    let mut best = SdfSample::EMPTY;
    for shape in shapes {
        let d = shape.distance(p);
        if d < best.distance {
            best.distance = d;
            best.radiance = shape.color();
        }
    }
    best.hit = best.distance <= 0.0;
    best
}
