//! Output image and the cascade-0 resolve

use glam::{UVec2, Vec3, Vec4};
use rayon::prelude::*;

use crate::cascade::{CascadeGeometry, RadianceTexture, linearize};
use crate::config::RenderConfig;
use crate::error::{Result, try_alloc};
use crate::scene::SdfField;

/// Display-encoded RGBA image produced once per frame
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            pixels: try_alloc("output frame", len, Vec4::W)?,
        })
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Raw `f32` RGBA bytes for upload elsewhere
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Quantise to 8-bit RGBA
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.to_array())
            .map(|c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8)
            .collect()
    }

    /// Expand cascade 0 to full resolution and encode for display.
    ///
    /// Each pixel takes its own probe's texel; pixels inside a shape show the
    /// shape's colour directly.
    pub(crate) fn resolve(
        &mut self,
        geometry: &CascadeGeometry,
        config: &RenderConfig,
        field: &SdfField,
        cascade0: &RadianceTexture,
    ) {
        let width = self.width.max(1) as usize;
        let last_probe = geometry.extent() - UVec2::ONE;
        let spacing = config.base_pixels_between_probes;
        let gamma = config.srgb_gamma;

        self.pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    let sample = field.texel(x as u32, y as u32);
                    let linear = if sample.hit {
                        linearize(sample.radiance, gamma)
                    } else {
                        let probe = UVec2::new(
                            ((x as f32 + 0.5) / spacing) as u32,
                            ((y as f32 + 0.5) / spacing) as u32,
                        )
                        .min(last_probe);
                        cascade0.get(probe.x, probe.y).truncate()
                    };
                    *pixel = encode(linear, gamma).extend(1.0);
                }
            });
    }
}

#[inline]
fn encode(linear: Vec3, gamma: f32) -> Vec3 {
    linear.max(Vec3::ZERO).powf(1.0 / gamma)
}
