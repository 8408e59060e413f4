//! WebAssembly exports for the restoration pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Buffers
//! cross the boundary as flat row-major arrays plus dimensions; the noise
//! mask crosses as bytes (0 = clean, nonzero = noisy) since wasm-bindgen
//! has no boolean-slice type.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::buffer::ImageBuffer;
use crate::filters::{denoise, detect_outliers, enhance, magnify_2x, rgba_to_grayscale};

/// Convert an RGBA u8 frame to a normalized grayscale buffer.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of luminance floats, values 0.0-1.0
#[wasm_bindgen]
pub fn preprocess_wasm(data: &[u8], width: usize, height: usize) -> Vec<f32> {
    let input = Array3::from_shape_vec((height, width, 4), data.to_vec())
        .expect("Invalid dimensions");

    rgba_to_grayscale(input.view()).data
}

/// Build the noise mask for a grayscale buffer.
///
/// # Arguments
/// * `data` - Flat array of luminance floats (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `threshold` - Detection threshold in normalized units
///
/// # Returns
/// Flat array of mask bytes, 1 = noisy
#[wasm_bindgen]
pub fn detect_wasm(data: &[f32], width: usize, height: usize, threshold: f32) -> Vec<u8> {
    let buffer = ImageBuffer::from_raw(data.to_vec(), width, height)
        .expect("Invalid dimensions");

    let mask = detect_outliers(&buffer, threshold).expect("Invalid dimensions");
    mask.into_iter().map(u8::from).collect()
}

/// Denoise a grayscale buffer under a noise mask.
///
/// # Arguments
/// * `data` - Flat array of luminance floats (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `mask` - Flat array of mask bytes (same length), nonzero = noisy
///
/// # Returns
/// Flat array of denoised floats with identical dimensions
#[wasm_bindgen]
pub fn denoise_wasm(data: &[f32], width: usize, height: usize, mask: &[u8]) -> Vec<f32> {
    let buffer = ImageBuffer::from_raw(data.to_vec(), width, height)
        .expect("Invalid dimensions");
    let mask: Vec<bool> = mask.iter().map(|&m| m != 0).collect();

    denoise(&buffer, &mask).expect("Invalid dimensions").data
}

/// Enhance a grayscale buffer: 2x magnification plus sharpening.
///
/// # Arguments
/// * `data` - Flat array of luminance floats (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of length `(2 * width) * (2 * height)`
#[wasm_bindgen]
pub fn enhance_wasm(data: &[f32], width: usize, height: usize) -> Vec<f32> {
    let buffer = ImageBuffer::from_raw(data.to_vec(), width, height)
        .expect("Invalid dimensions");

    enhance(&buffer).expect("Invalid dimensions").data
}

/// Magnify a grayscale buffer 2x without sharpening.
///
/// # Arguments
/// * `data` - Flat array of luminance floats (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of length `(2 * width) * (2 * height)`
#[wasm_bindgen]
pub fn magnify_wasm(data: &[f32], width: usize, height: usize) -> Vec<f32> {
    let buffer = ImageBuffer::from_raw(data.to_vec(), width, height)
        .expect("Invalid dimensions");

    magnify_2x(&buffer).expect("Invalid dimensions").data
}
