//! AstroClean Rust Core
//!
//! Two-stage restoration for astronomical frames: a noise-masked spatial
//! median denoiser and an upscale-and-sharpen enhancer, with the
//! preprocessing, detection, and orchestration stages around them.
//! Python bindings via PyO3, WASM bindings for JavaScript.
//!
//! ## Buffer Format
//! All stages operate on single-channel `f32` buffers in row-major order
//! (`index = y * width + x`), values conventionally 0.0-1.0. Preprocessing
//! accepts RGBA u8 frames of shape (height, width, 4) and emits such a
//! buffer.
//!
//! ## Stage Architecture
//! Every stage is a pure function: one read-only input, one freshly
//! allocated output, no shared mutable state. The denoiser additionally
//! consumes a co-indexed boolean noise mask produced by the detector; the
//! enhancer doubles both dimensions. Malformed input (buffer length not
//! matching the dimensions, mask length not matching the pixel count) is
//! rejected wholesale at the stage boundary before any pixel work.

pub mod buffer;
pub mod error;
pub mod filters;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use crate::buffer::{ImageBuffer, NoiseMask};
pub use crate::error::{RestoreError, Result};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use ndarray::Array2;
    use numpy::{
        IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2, PyReadonlyArray3,
    };
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::ImageBuffer;
    use crate::error::RestoreError;
    use crate::filters::{self, DEFAULT_THRESHOLD};
    use crate::pipeline;

    fn to_buffer(array: PyReadonlyArray2<f32>) -> ImageBuffer {
        let view = array.as_array();
        let (height, width) = view.dim();
        ImageBuffer {
            data: view.iter().copied().collect(),
            width,
            height,
        }
    }

    fn to_array<'py>(py: Python<'py>, buffer: ImageBuffer) -> Bound<'py, PyArray2<f32>> {
        Array2::from_shape_vec((buffer.height, buffer.width), buffer.data)
            .expect("Shape mismatch in buffer conversion")
            .into_pyarray(py)
    }

    fn shape_err(error: RestoreError) -> PyErr {
        PyValueError::new_err(error.to_string())
    }

    /// Convert an RGBA u8 frame to a normalized grayscale buffer.
    ///
    /// # Arguments
    /// * `image` - Array of shape (height, width, 4) with RGBA u8 values
    ///
    /// # Returns
    /// 2D float array of luminance values, 0.0-1.0
    #[pyfunction]
    pub fn preprocess<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> Bound<'py, PyArray2<f32>> {
        let result = filters::rgba_to_grayscale(image.as_array());
        to_array(py, result)
    }

    /// Build the noise mask for a grayscale buffer.
    ///
    /// # Arguments
    /// * `image` - 2D float array of luminance values
    /// * `threshold` - Detection threshold (default: 0.15)
    ///
    /// # Returns
    /// 1D boolean array in row-major order, True = noisy
    #[pyfunction]
    #[pyo3(signature = (image, threshold=DEFAULT_THRESHOLD))]
    pub fn detect<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
        threshold: f32,
    ) -> PyResult<Bound<'py, PyArray1<bool>>> {
        let buffer = to_buffer(image);
        let mask = filters::detect_outliers(&buffer, threshold).map_err(shape_err)?;
        Ok(PyArray1::from_vec(py, mask))
    }

    /// Denoise a grayscale buffer under a noise mask.
    ///
    /// # Arguments
    /// * `image` - 2D float array of luminance values
    /// * `mask` - 1D boolean array, one entry per pixel, True = noisy
    ///
    /// # Returns
    /// Denoised 2D float array with identical dimensions
    #[pyfunction]
    pub fn denoise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
        mask: PyReadonlyArray1<'py, bool>,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let buffer = to_buffer(image);
        let mask: Vec<bool> = mask.as_array().iter().copied().collect();
        let result = filters::denoise(&buffer, &mask).map_err(shape_err)?;
        Ok(to_array(py, result))
    }

    /// Enhance a grayscale buffer: 2x magnification plus sharpening.
    ///
    /// # Arguments
    /// * `image` - 2D float array of luminance values
    ///
    /// # Returns
    /// 2D float array with both dimensions doubled
    #[pyfunction]
    pub fn enhance<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let buffer = to_buffer(image);
        let result = filters::enhance(&buffer).map_err(shape_err)?;
        Ok(to_array(py, result))
    }

    /// Magnify a grayscale buffer 2x without sharpening.
    ///
    /// # Arguments
    /// * `image` - 2D float array of luminance values
    ///
    /// # Returns
    /// 2D float array with both dimensions doubled
    #[pyfunction]
    pub fn magnify<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f32>,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let buffer = to_buffer(image);
        let result = filters::magnify_2x(&buffer).map_err(shape_err)?;
        Ok(to_array(py, result))
    }

    /// Run the full pipeline on an RGBA frame.
    ///
    /// # Arguments
    /// * `image` - Array of shape (height, width, 4) with RGBA u8 values
    /// * `threshold` - Detection threshold (default: 0.15)
    ///
    /// # Returns
    /// Tuple `(denoised, enhanced, mask, noise_pixels, reduction_ratio,
    /// processing_time_ms)`
    #[pyfunction]
    #[pyo3(signature = (image, threshold=DEFAULT_THRESHOLD))]
    #[allow(clippy::type_complexity)]
    pub fn run_pipeline<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        threshold: f32,
    ) -> PyResult<(
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray1<bool>>,
        usize,
        f32,
        f64,
    )> {
        let report = pipeline::run(image.as_array(), threshold).map_err(shape_err)?;
        Ok((
            to_array(py, report.denoised),
            to_array(py, report.enhanced),
            PyArray1::from_vec(py, report.mask),
            report.stats.noise_pixels,
            report.stats.reduction_ratio,
            report.stats.processing_time_ms,
        ))
    }

    /// AstroClean Rust extension module
    #[pymodule]
    pub fn astroclean_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(preprocess, m)?)?;
        m.add_function(wrap_pyfunction!(detect, m)?)?;
        m.add_function(wrap_pyfunction!(denoise, m)?)?;
        m.add_function(wrap_pyfunction!(enhance, m)?)?;
        m.add_function(wrap_pyfunction!(magnify, m)?)?;
        m.add_function(wrap_pyfunction!(run_pipeline, m)?)?;
        Ok(())
    }
}
