//! Error model for the restoration pipeline.
//!
//! A single enum carries every precondition failure the crate can report.
//! Both variants are input-contract violations detected before any pixel
//! work begins; there are no transient or retryable failure modes.

/// Unified error type for buffer and mask precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    /// `data.len()` does not equal `width * height`.
    #[error("invalid buffer: {len} samples for {width}x{height} image")]
    InvalidBuffer {
        len: usize,
        width: usize,
        height: usize,
    },

    /// Noise mask length does not match the buffer's pixel count.
    #[error("dimension mismatch: mask has {mask} entries, buffer has {pixels} pixels")]
    DimensionMismatch { mask: usize, pixels: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RestoreError>;
