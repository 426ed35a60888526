//! SDF scene builder
//!
//! Turns the frame's primitive list into a distance + emissive texture that
//! the ray marcher steps through.

pub mod field;
pub mod primitive;

pub use field::{DISTANCE_SENTINEL, SdfField, SdfSample};
pub use primitive::{Primitive, sd_capsule, sd_circle};
