//! Pipeline orchestration: preprocess -> detect -> denoise -> enhance.
//!
//! The orchestrator owns the stage label set and the run statistics; the
//! stage transformations themselves know nothing about either. Stage
//! transitions are reported through the `log` facade at debug level.

use std::fmt;
use std::time::Instant;

use ndarray::ArrayView3;

use crate::buffer::{ImageBuffer, NoiseMask};
use crate::error::Result;
use crate::filters::{denoise, detect_outliers, enhance, rgba_to_grayscale};

/// Progress label for external status reporting.
///
/// Purely descriptive; no stage transformation reads or depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Preprocessing,
    Detection,
    Denoising,
    Enhancement,
    Complete,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Preprocessing => "preprocessing",
            PipelineStage::Detection => "detection",
            PipelineStage::Denoising => "denoising",
            PipelineStage::Enhancement => "enhancement",
            PipelineStage::Complete => "complete",
        };
        f.write_str(label)
    }
}

/// Aggregate statistics for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    /// Pixels flagged by the detector.
    pub noise_pixels: usize,
    /// `noise_pixels / total pixels`.
    pub reduction_ratio: f32,
    /// Wall-clock duration of the full run.
    pub processing_time_ms: f64,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Denoised buffer, same dimensions as the preprocessed input.
    pub denoised: ImageBuffer,
    /// Enhanced buffer, dimensions doubled in each axis.
    pub enhanced: ImageBuffer,
    /// Noise mask produced by the detector.
    pub mask: NoiseMask,
    pub stats: RunStats,
}

/// Run the full restoration pipeline on an RGBA frame.
///
/// # Arguments
/// * `image` - 3D array view of shape (height, width, 4) with RGBA u8 values
/// * `threshold` - Detection threshold, see
///   [`DEFAULT_THRESHOLD`](crate::filters::DEFAULT_THRESHOLD)
///
/// # Returns
/// [`PipelineReport`] with the denoised and enhanced buffers, the noise
/// mask, and run statistics
pub fn run(image: ArrayView3<u8>, threshold: f32) -> Result<PipelineReport> {
    let start = Instant::now();

    log::debug!("stage: {}", PipelineStage::Preprocessing);
    let buffer = rgba_to_grayscale(image);

    log::debug!("stage: {}", PipelineStage::Detection);
    let mask = detect_outliers(&buffer, threshold)?;
    let noise_pixels = mask.iter().filter(|&&m| m).count();
    log::debug!(
        "detector flagged {} of {} pixels",
        noise_pixels,
        buffer.len()
    );

    log::debug!("stage: {}", PipelineStage::Denoising);
    let denoised = denoise(&buffer, &mask)?;

    log::debug!("stage: {}", PipelineStage::Enhancement);
    let enhanced = enhance(&denoised)?;

    let stats = RunStats {
        noise_pixels,
        reduction_ratio: noise_pixels as f32 / buffer.len().max(1) as f32,
        processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    log::debug!(
        "stage: {} ({:.3} ms)",
        PipelineStage::Complete,
        stats.processing_time_ms
    );

    Ok(PipelineReport {
        denoised,
        enhanced,
        mask,
        stats,
    })
}
