//! Error types for configuration and frame rendering

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to allocate {what} ({bytes} bytes)")]
    ResourceExhausted { what: &'static str, bytes: usize },

    #[error("scene field is {found:?} but renderer expects {expected:?}")]
    SceneMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Allocate a zero-filled buffer, reporting allocation failure instead of aborting.
pub(crate) fn try_alloc<T: Clone>(what: &'static str, len: usize, fill: T) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| RenderError::ResourceExhausted {
            what,
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    buf.resize(len, fill);
    Ok(buf)
}
