//! Outlier (cosmic-ray strike) detection stage.
//!
//! Produces the boolean noise mask the denoiser consumes. A sample is
//! flagged when it sits far above the median of its 3x3 neighbors; the
//! median is used instead of the mean so one bright neighbor (an adjacent
//! strike) cannot hide a hit.

use rayon::prelude::*;

use crate::buffer::{ImageBuffer, NoiseMask};
use crate::error::Result;

/// Default detection threshold in normalized luminance units.
pub const DEFAULT_THRESHOLD: f32 = 0.15;

/// Flag samples exceeding their 3x3 neighbor median by more than `threshold`.
///
/// The center sample never contributes to its own reference median. Pixels
/// with no in-bounds neighbor (a 1x1 buffer) are never flagged.
///
/// Parallelized with Rayon across mask rows.
///
/// # Arguments
/// * `buffer` - Input samples, never mutated
/// * `threshold` - Excess over the neighbor median that marks a sample noisy
///
/// # Returns
/// One boolean per pixel, `true` = noisy
pub fn detect_outliers(buffer: &ImageBuffer, threshold: f32) -> Result<NoiseMask> {
    buffer.validate()?;

    let (width, height) = (buffer.width, buffer.height);
    let src = &buffer.data;

    let mut mask = vec![false; src.len()];
    mask.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let mut neighbors = [0.0f32; 8];
                let mut count = 0usize;

                for dy in -1isize..=1 {
                    let ny = y as isize + dy;
                    if ny < 0 || ny >= height as isize {
                        continue;
                    }
                    for dx in -1isize..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as isize + dx;
                        if nx < 0 || nx >= width as isize {
                            continue;
                        }
                        neighbors[count] = src[ny as usize * width + nx as usize];
                        count += 1;
                    }
                }

                if count == 0 {
                    continue;
                }

                let window = &mut neighbors[..count];
                window.sort_unstable_by(f32::total_cmp);
                let median = window[count / 2];

                row[x] = src[y * width + x] - median > threshold;
            }
        });

    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_field_is_clean() {
        let buf = ImageBuffer::from_raw(vec![0.4; 16], 4, 4).unwrap();

        let mask = detect_outliers(&buf, DEFAULT_THRESHOLD).unwrap();

        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn test_spike_is_flagged_and_neighbors_are_not() {
        let mut data = vec![0.1; 9];
        data[4] = 1.0;
        let buf = ImageBuffer::from_raw(data, 3, 3).unwrap();

        let mask = detect_outliers(&buf, DEFAULT_THRESHOLD).unwrap();

        assert!(mask[4]);
        // One bright neighbor must not drag the others' reference median up
        for (i, &flagged) in mask.iter().enumerate() {
            if i != 4 {
                assert!(!flagged, "pixel {i} wrongly flagged");
            }
        }
    }

    #[test]
    fn test_excess_below_threshold_is_clean() {
        let mut data = vec![0.5; 9];
        data[4] = 0.6;
        let buf = ImageBuffer::from_raw(data, 3, 3).unwrap();

        let mask = detect_outliers(&buf, DEFAULT_THRESHOLD).unwrap();

        assert!(!mask[4]);
    }

    #[test]
    fn test_single_pixel_never_flagged() {
        let buf = ImageBuffer::from_raw(vec![1.0], 1, 1).unwrap();

        let mask = detect_outliers(&buf, DEFAULT_THRESHOLD).unwrap();

        assert_eq!(mask, vec![false]);
    }
}
