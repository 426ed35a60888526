//! Radiance cascades
//!
//! Geometry, the ray marcher, interval merging and the per-cascade pass that
//! ties them together. Cascades run coarsest first; each pass reads the
//! previous one from the ping-pong read slot and writes the other slot.

pub mod geometry;
pub mod march;
pub mod merge;
pub mod pass;
pub mod texture;

pub use geometry::{
    BILINEAR_OFFSETS, BilinearSamples, CascadeGeometry, CascadeSize, Interval, TexelProbe,
    bilinear_weights, cascade_count_for, ray_angle, ray_direction,
};
pub use march::{HIT_THRESHOLD, MIN_STEP, RayMarcher, SAFETY_SCALE, linearize};
pub use merge::{NO_FURTHER_DATA, SKY_COLOR, SUN_COLOR, merge_intervals, sample_upper, sun_and_sky};
pub use pass::{PassContext, run_cascade, run_cascades, texel_jitter};
pub use texture::{PingPong, RadianceTexture};
