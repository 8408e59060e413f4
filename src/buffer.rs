//! Single-channel raster buffer shared by every pipeline stage.
//!
//! An [`ImageBuffer`] is a flat row-major sequence of `f32` samples
//! (`index = y * width + x`) plus its dimensions. Values are conventionally
//! in `0.0..=1.0`, though inputs are not required to be pre-clamped.
//!
//! The noise mask that accompanies a buffer through the denoising stage is
//! a plain `Vec<bool>` with the same length and implicit layout; see
//! [`NoiseMask`].

use crate::error::{RestoreError, Result};

/// Boolean mask co-indexed with an [`ImageBuffer`], `true` = noisy sample.
pub type NoiseMask = Vec<bool>;

/// A rectangular raster of `f32` samples in row-major order.
///
/// Invariant: `data.len() == width * height`. The fallible constructors
/// enforce it; transformations re-check it at their boundary so a
/// hand-assembled buffer cannot smuggle a mismatch past them.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl ImageBuffer {
    /// Create a zero-filled buffer of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        ImageBuffer {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// Wrap existing samples, checking the length invariant.
    ///
    /// # Errors
    /// [`RestoreError::InvalidBuffer`] if `data.len() != width * height`.
    pub fn from_raw(data: Vec<f32>, width: usize, height: usize) -> Result<Self> {
        if data.len() != width * height {
            return Err(RestoreError::InvalidBuffer {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(ImageBuffer {
            data,
            width,
            height,
        })
    }

    /// Re-check the length invariant on an already-constructed buffer.
    pub fn validate(&self) -> Result<()> {
        if self.data.len() != self.width * self.height {
            return Err(RestoreError::InvalidBuffer {
                len: self.data.len(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// True when the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of `(x, y)`.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Sample at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }
}
