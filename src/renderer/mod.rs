//! Frame driver
//!
//! [`RadianceCascadeRenderer`] owns everything that lives across frames: the
//! validated config, derived geometry, the scene field, both radiance slots
//! and the output image. Each frame rebuilds the field, runs the cascades
//! from coarsest to finest and resolves cascade 0 into the [`Frame`].

pub mod frame;

pub use frame::Frame;

use std::time::Instant;

use crate::cascade::{CascadeGeometry, PassContext, PingPong, run_cascades};
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::scene::{Primitive, SdfField};

pub struct RadianceCascadeRenderer {
    config: RenderConfig,
    geometry: CascadeGeometry,
    field: SdfField,
    ping_pong: PingPong,
    frame: Frame,
    frame_index: u64,
}

impl RadianceCascadeRenderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let geometry = CascadeGeometry::new(&config);
        let field = SdfField::new(config.width, config.height)?;
        let ping_pong = PingPong::new(geometry.extent())?;
        let frame = Frame::new(config.width, config.height)?;

        log::info!(
            "Radiance cascades: {}x{}, {} cascades, {} base rays, probe extent {}x{}",
            config.width,
            config.height,
            geometry.cascade_count(),
            geometry.base_ray_count(),
            geometry.extent().x,
            geometry.extent().y
        );

        Ok(Self {
            config,
            geometry,
            field,
            ping_pong,
            frame,
            frame_index: 0,
        })
    }

    /// Swap in a new configuration between frames.
    ///
    /// Buffers are only reallocated when their size changes. On error the
    /// previous configuration stays active.
    pub fn reconfigure(&mut self, config: RenderConfig) -> Result<()> {
        config.validate()?;
        if config == self.config {
            return Ok(());
        }
        let geometry = CascadeGeometry::new(&config);

        // Allocate everything before touching self so a failure leaves it intact
        let resized = (config.width, config.height) != (self.config.width, self.config.height);
        let buffers = if resized {
            Some((
                SdfField::new(config.width, config.height)?,
                Frame::new(config.width, config.height)?,
            ))
        } else {
            None
        };
        let ping_pong = if geometry.extent() != self.ping_pong.size() {
            Some(PingPong::new(geometry.extent())?)
        } else {
            None
        };

        if let Some((field, frame)) = buffers {
            self.field = field;
            self.frame = frame;
        }
        if let Some(ping_pong) = ping_pong {
            self.ping_pong = ping_pong;
        }

        log::info!(
            "Reconfigured: {}x{}, {} cascades, {} base rays",
            config.width,
            config.height,
            geometry.cascade_count(),
            geometry.base_ray_count()
        );
        self.config = config;
        self.geometry = geometry;
        Ok(())
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn geometry(&self) -> &CascadeGeometry {
        &self.geometry
    }

    /// Number of frames rendered so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The most recently rendered frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Scene field of the last [`render`](Self::render) call
    pub fn field(&self) -> &SdfField {
        &self.field
    }

    /// Build the scene field from `primitives` and render a frame
    pub fn render(&mut self, primitives: &[Primitive]) -> Result<&Frame> {
        let start = Instant::now();
        self.field.build(primitives);

        let ctx = PassContext {
            geometry: &self.geometry,
            config: &self.config,
            field: &self.field,
            frame_index: self.frame_index,
        };
        draw(&ctx, &mut self.ping_pong, &mut self.frame);

        log::debug!(
            "frame {}: {} primitives in {:.2?}",
            self.frame_index,
            primitives.len(),
            start.elapsed()
        );
        self.frame_index += 1;
        Ok(&self.frame)
    }

    /// Render against a caller-built field of the configured resolution
    pub fn render_field(&mut self, field: &SdfField) -> Result<&Frame> {
        let expected = (self.config.width, self.config.height);
        let found = (field.size().x, field.size().y);
        if found != expected {
            return Err(RenderError::SceneMismatch { expected, found });
        }
        let start = Instant::now();

        let ctx = PassContext {
            geometry: &self.geometry,
            config: &self.config,
            field,
            frame_index: self.frame_index,
        };
        draw(&ctx, &mut self.ping_pong, &mut self.frame);

        log::debug!("frame {} (external field) in {:.2?}", self.frame_index, start.elapsed());
        self.frame_index += 1;
        Ok(&self.frame)
    }
}

fn draw(ctx: &PassContext<'_>, ping_pong: &mut PingPong, frame: &mut Frame) {
    run_cascades(ctx, ping_pong);
    frame.resolve(ctx.geometry, ctx.config, ctx.field, ping_pong.read());
}
