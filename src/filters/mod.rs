//! Restoration stage filters.
//!
//! Every filter here is a pure function over the flat single-channel
//! [`ImageBuffer`](crate::buffer::ImageBuffer): one read-only input, one
//! freshly allocated output, no state retained across calls.
//!
//! ## Stage Catalog
//!
//! - **Preprocessing**: `rgba_to_grayscale` - RGBA frame to normalized luminance
//! - **Detection**: `detect_outliers` - builds the boolean noise mask
//! - **Denoising**: `denoise` - masked 3x3 clean-neighbor median replacement
//! - **Enhancement**: `magnify_2x`, `sharpen`, `enhance` - 2x bilinear
//!   upscale plus clamped Laplacian sharpening
//!
//! Per-pixel work is independent within each stage; row loops are
//! parallelized with Rayon where the stage touches every pixel.

pub mod denoise;
pub mod detect;
pub mod enhance;
pub mod grayscale;

pub use denoise::denoise;
pub use detect::{detect_outliers, DEFAULT_THRESHOLD};
pub use enhance::{enhance, magnify_2x, sharpen, SHARPEN_STRENGTH};
pub use grayscale::rgba_to_grayscale;
