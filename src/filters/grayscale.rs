//! Grayscale preprocessing stage.
//!
//! Converts RGBA input frames to the single-channel normalized buffer the
//! restoration stages operate on. Uses ITU-R BT.601 luminance coefficients,
//! matching the capture pipeline feeding this crate.

use ndarray::ArrayView3;

use crate::buffer::ImageBuffer;

/// ITU-R BT.601 luminance coefficients
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Convert an RGBA u8 frame to a normalized grayscale buffer.
///
/// Alpha is ignored; the output is a single luminance channel scaled to
/// `0.0..=1.0`.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 4) with RGBA u8 values (0-255)
///
/// # Returns
/// Flat row-major [`ImageBuffer`] of luminance samples
pub fn rgba_to_grayscale(input: ArrayView3<u8>) -> ImageBuffer {
    let (height, width, _) = input.dim();
    let mut output = ImageBuffer::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let r = input[[y, x, 0]] as f32;
            let g = input[[y, x, 1]] as f32;
            let b = input[[y, x, 2]] as f32;

            // ITU-R BT.601 luminance, normalized to [0, 1]
            output.data[y * width + x] = (LUMA_R * r + LUMA_G * g + LUMA_B * b) / 255.0;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_white_maps_to_one() {
        let mut img = Array3::<u8>::zeros((2, 2, 4));
        img.fill(255);

        let result = rgba_to_grayscale(img.view());

        assert_eq!(result.width, 2);
        assert_eq!(result.height, 2);
        for &v in &result.data {
            assert!((v - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_bt601_weights() {
        let mut img = Array3::<u8>::zeros((1, 3, 4));
        img[[0, 0, 0]] = 255; // pure red
        img[[0, 1, 1]] = 255; // pure green
        img[[0, 2, 2]] = 255; // pure blue

        let result = rgba_to_grayscale(img.view());

        assert!((result.get(0, 0) - 0.299).abs() < 1e-5);
        assert!((result.get(1, 0) - 0.587).abs() < 1e-5);
        assert!((result.get(2, 0) - 0.114).abs() < 1e-5);
    }
}
