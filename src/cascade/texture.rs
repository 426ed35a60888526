//! Float radiance textures and the two-slot ping-pong pair

use glam::{IVec2, UVec2, Vec4};
use rayon::prelude::*;

use crate::error::{Result, try_alloc};

/// RGB radiance plus transmittance in `w`, one texel per cascade-0 probe slot
#[derive(Debug, Clone)]
pub struct RadianceTexture {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl RadianceTexture {
    pub fn new(size: UVec2) -> Result<Self> {
        Self::filled(size, Vec4::ZERO)
    }

    pub fn filled(size: UVec2, value: Vec4) -> Result<Self> {
        let len = (size.x as usize).saturating_mul(size.y as usize);
        Ok(Self {
            width: size.x,
            height: size.y,
            texels: try_alloc("radiance texture", len, value)?,
        })
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn texels(&self) -> &[Vec4] {
        &self.texels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.texels[y as usize * self.width as usize + x as usize]
    }

    /// Fetch with coordinates clamped to the texture
    #[inline]
    pub fn fetch(&self, at: IVec2) -> Vec4 {
        let max = self.size().as_ivec2() - IVec2::ONE;
        let at = at.clamp(IVec2::ZERO, max.max(IVec2::ZERO));
        self.get(at.x as u32, at.y as u32)
    }

    pub fn set(&mut self, x: u32, y: u32, value: Vec4) {
        let index = y as usize * self.width as usize + x as usize;
        self.texels[index] = value;
    }

    /// Mutable rows for a parallel pass
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, Vec4> {
        let width = self.width.max(1) as usize;
        self.texels.par_chunks_mut(width)
    }
}

/// Two radiance slots reused by every cascade of a frame.
///
/// `parity` names the slot holding the most recently finished pass; the other
/// slot is the write target.
#[derive(Debug, Clone)]
pub struct PingPong {
    slots: [RadianceTexture; 2],
    parity: usize,
}

impl PingPong {
    pub fn new(size: UVec2) -> Result<Self> {
        Ok(Self {
            slots: [RadianceTexture::new(size)?, RadianceTexture::new(size)?],
            parity: 0,
        })
    }

    pub fn size(&self) -> UVec2 {
        self.slots[0].size()
    }

    pub fn parity(&self) -> usize {
        self.parity
    }

    /// The last completed pass
    pub fn read(&self) -> &RadianceTexture {
        &self.slots[self.parity]
    }

    /// Borrow the read slot and the write slot at the same time
    pub fn split(&mut self) -> (&RadianceTexture, &mut RadianceTexture) {
        let (first, second) = self.slots.split_at_mut(1);
        if self.parity == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        }
    }

    /// Publish the write slot as the new read slot
    pub fn swap(&mut self) {
        self.parity ^= 1;
    }
}
