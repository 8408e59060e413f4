//! Upscale-and-sharpen enhancement stage.
//!
//! Two passes over the input:
//! 1. Fixed 2x bilinear magnification with corner-aligned coordinates.
//! 2. Laplacian sharpening of the magnified buffer, clamped to [0, 1].
//!
//! Each pass writes to a buffer distinct from the one it reads, so results
//! never depend on pixel processing order within a pass.

use rayon::prelude::*;

use crate::buffer::ImageBuffer;
use crate::error::Result;

/// Sharpening factor applied to the Laplacian in [`enhance`].
pub const SHARPEN_STRENGTH: f32 = 0.45;

/// Magnify a buffer to double width and height by bilinear interpolation.
///
/// Corner-aligned scaling: destination `(x, y)` maps to
/// `gx = x / (new_w - 1) * (w - 1)` (denominators are always >= 1 since the
/// output is at least 2x2), pinning the four source corners exactly onto
/// the four destination corners.
///
/// Interpolation taps are fetched by flat index: an out-of-range index or
/// an exactly-zero sample falls back to the top-left tap `a` (zero-valued
/// samples are treated the same as missing ones, a documented quirk kept
/// for output compatibility). The flat fetch row-wraps at the right edge;
/// those wrapped taps always carry zero bilinear weight.
///
/// Parallelized with Rayon across output rows.
///
/// # Arguments
/// * `buffer` - Source samples, never mutated
///
/// # Returns
/// A fresh buffer of `2 * width` x `2 * height`
pub fn magnify_2x(buffer: &ImageBuffer) -> Result<ImageBuffer> {
    buffer.validate()?;

    let (width, height) = (buffer.width, buffer.height);
    let new_w = width * 2;
    let new_h = height * 2;
    let src = &buffer.data;

    let mut output = vec![0.0f32; new_w * new_h];
    output
        .par_chunks_mut(new_w)
        .enumerate()
        .for_each(|(y, row)| {
            let gy = (y as f32 / (new_h - 1) as f32) * (height - 1) as f32;
            let gyi = gy.floor() as usize;
            let yf = gy - gyi as f32;

            for (x, out) in row.iter_mut().enumerate() {
                let gx = (x as f32 / (new_w - 1) as f32) * (width - 1) as f32;
                let gxi = gx.floor() as usize;
                let xf = gx - gxi as f32;

                let a = src[gyi * width + gxi];
                let b = tap(src, gyi * width + gxi + 1, a);
                let c = tap(src, (gyi + 1) * width + gxi, a);
                let d = tap(src, (gyi + 1) * width + gxi + 1, a);

                *out = a * (1.0 - xf) * (1.0 - yf)
                    + b * xf * (1.0 - yf)
                    + c * yf * (1.0 - xf)
                    + d * xf * yf;
            }
        });

    ImageBuffer::from_raw(output, new_w, new_h)
}

/// Fetch an interpolation tap, substituting `fallback` for out-of-range
/// indices and exactly-zero samples.
#[inline]
fn tap(src: &[f32], idx: usize, fallback: f32) -> f32 {
    match src.get(idx) {
        Some(&v) if v != 0.0 => v,
        _ => fallback,
    }
}

/// Sharpen interior pixels with a 4-connected Laplacian.
///
/// Kernel (applied to the Laplacian term, scaled by `strength`):
/// ```text
///  0 -1  0
/// -1  4 -1
///  0 -1  0
/// ```
///
/// `result = clamp(center + laplacian * strength, 0, 1)`. The outermost
/// ring, where a full 4-neighborhood is unavailable, passes through
/// unchanged. Reads come exclusively from the input buffer.
///
/// # Arguments
/// * `buffer` - Source samples, never mutated
/// * `strength` - Laplacian scale factor
///
/// # Returns
/// A fresh buffer with identical dimensions
pub fn sharpen(buffer: &ImageBuffer, strength: f32) -> Result<ImageBuffer> {
    buffer.validate()?;

    let (width, height) = (buffer.width, buffer.height);
    let src = &buffer.data;
    let mut output = src.clone();

    if width >= 3 && height >= 3 {
        output
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                if y == 0 || y == height - 1 {
                    return;
                }
                for x in 1..width - 1 {
                    let idx = y * width + x;
                    let center = src[idx];
                    let laplacian = 4.0 * center
                        - src[idx - width]
                        - src[idx + width]
                        - src[idx - 1]
                        - src[idx + 1];
                    row[x] = (center + laplacian * strength).clamp(0.0, 1.0);
                }
            });
    }

    ImageBuffer::from_raw(output, width, height)
}

/// Enhance a buffer: 2x magnification followed by clamped sharpening.
///
/// # Arguments
/// * `buffer` - Source samples, typically the denoiser's output
///
/// # Returns
/// A fresh buffer of `2 * width` x `2 * height`
pub fn enhance(buffer: &ImageBuffer) -> Result<ImageBuffer> {
    let magnified = magnify_2x(buffer)?;
    sharpen(&magnified, SHARPEN_STRENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_2x2() -> ImageBuffer {
        ImageBuffer::from_raw(vec![0.2, 0.4, 0.6, 0.8], 2, 2).unwrap()
    }

    #[test]
    fn test_dimensions_double() {
        let result = enhance(&buffer_2x2()).unwrap();
        assert_eq!(result.width, 4);
        assert_eq!(result.height, 4);
    }

    #[test]
    fn test_corner_alignment_preserves_source_corners() {
        let magnified = magnify_2x(&buffer_2x2()).unwrap();

        assert!((magnified.get(0, 0) - 0.2).abs() < 1e-6);
        assert!((magnified.get(3, 0) - 0.4).abs() < 1e-6);
        assert!((magnified.get(0, 3) - 0.6).abs() < 1e-6);
        assert!((magnified.get(3, 3) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_single_pixel_source() {
        let buf = ImageBuffer::from_raw(vec![0.7], 1, 1).unwrap();

        let magnified = magnify_2x(&buf).unwrap();

        assert_eq!(magnified.width, 2);
        assert_eq!(magnified.height, 2);
        for &v in &magnified.data {
            assert!((v - 0.7).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_tap_falls_back_to_top_left() {
        // The zero-valued right neighbor is replaced by the top-left tap,
        // so the blend over a half-constant source stays constant.
        let buf = ImageBuffer::from_raw(vec![0.5, 0.0, 0.5, 0.5], 2, 2).unwrap();

        let magnified = magnify_2x(&buf).unwrap();

        assert!((magnified.get(1, 0) - 0.5).abs() < 1e-6);
        assert!((magnified.get(2, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sharpened_interior_stays_clamped() {
        let data: Vec<f32> = (0..36).map(|i| if i % 3 == 0 { 1.0 } else { 0.05 }).collect();
        let buf = ImageBuffer::from_raw(data, 6, 6).unwrap();

        let result = enhance(&buf).unwrap();

        for &v in &result.data {
            assert!((0.0..=1.0).contains(&v), "value {v} out of range");
        }
    }

    #[test]
    fn test_border_ring_not_sharpened() {
        let data: Vec<f32> = (0..16).map(|i| 0.05 + 0.05 * i as f32).collect();
        let buf = ImageBuffer::from_raw(data, 4, 4).unwrap();

        let magnified = magnify_2x(&buf).unwrap();
        let result = enhance(&buf).unwrap();

        let (w, h) = (result.width, result.height);
        for x in 0..w {
            assert_eq!(result.get(x, 0), magnified.get(x, 0));
            assert_eq!(result.get(x, h - 1), magnified.get(x, h - 1));
        }
        for y in 0..h {
            assert_eq!(result.get(0, y), magnified.get(0, y));
            assert_eq!(result.get(w - 1, y), magnified.get(w - 1, y));
        }
    }

    #[test]
    fn test_sharpen_flat_field_is_identity() {
        let buf = ImageBuffer::from_raw(vec![0.5; 25], 5, 5).unwrap();

        let result = sharpen(&buf, SHARPEN_STRENGTH).unwrap();

        assert_eq!(result.data, buf.data);
    }

    #[test]
    fn test_end_to_end_corners() {
        let result = enhance(&buffer_2x2()).unwrap();

        // Corners sit on the unsharpened border ring and keep the
        // corner-aligned source values.
        assert!((result.get(0, 0) - 0.2).abs() < 1e-6);
        assert!((result.get(3, 3) - 0.8).abs() < 1e-6);
    }
}
