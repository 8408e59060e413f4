//! Masked median denoising stage.
//!
//! Replaces each flagged sample with the median of its unflagged 3x3
//! neighbors. Unflagged samples pass through untouched, and every neighbor
//! read comes from the original input buffer, so the result does not depend
//! on the order in which flagged pixels are processed.

use rayon::prelude::*;

use crate::buffer::ImageBuffer;
use crate::error::{RestoreError, Result};

/// Remove flagged noise samples by 3x3 clean-neighbor median replacement.
///
/// For each index where `mask` is `true`, the in-bounds neighbors whose own
/// mask entry is `false` contribute their original values; the sorted
/// median (`sorted[n / 2]`) replaces the flagged sample. The flagged center
/// never contributes to its own replacement. A flagged pixel with no clean
/// neighbor keeps its original value.
///
/// Parallelized with Rayon across output rows.
///
/// # Arguments
/// * `buffer` - Input samples, never mutated
/// * `mask` - One entry per pixel, `true` = noisy
///
/// # Returns
/// A fresh buffer with identical dimensions
///
/// # Errors
/// [`RestoreError::DimensionMismatch`] when `mask.len()` differs from the
/// pixel count; [`RestoreError::InvalidBuffer`] when the buffer's length
/// invariant is broken.
pub fn denoise(buffer: &ImageBuffer, mask: &[bool]) -> Result<ImageBuffer> {
    buffer.validate()?;
    if mask.len() != buffer.data.len() {
        return Err(RestoreError::DimensionMismatch {
            mask: mask.len(),
            pixels: buffer.data.len(),
        });
    }

    let (width, height) = (buffer.width, buffer.height);
    let src = &buffer.data;
    let mut output = src.clone();

    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                if !mask[y * width + x] {
                    continue;
                }

                // 3x3 window, at most 8 clean contributors (the flagged
                // center excludes itself via its own mask entry)
                let mut clean = [0.0f32; 9];
                let mut count = 0usize;

                for dy in -1isize..=1 {
                    let ny = y as isize + dy;
                    if ny < 0 || ny >= height as isize {
                        continue;
                    }
                    for dx in -1isize..=1 {
                        let nx = x as isize + dx;
                        if nx < 0 || nx >= width as isize {
                            continue;
                        }
                        let n_idx = ny as usize * width + nx as usize;
                        if !mask[n_idx] {
                            clean[count] = src[n_idx];
                            count += 1;
                        }
                    }
                }

                if count > 0 {
                    let window = &mut clean[..count];
                    window.sort_unstable_by(f32::total_cmp);
                    row[x] = window[count / 2];
                }
                // count == 0: no clean neighbor, the original value stays
            }
        });

    ImageBuffer::from_raw(output, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_3x3(values: [f32; 9]) -> ImageBuffer {
        ImageBuffer::from_raw(values.to_vec(), 3, 3).unwrap()
    }

    #[test]
    fn test_clean_pixels_pass_through_exactly() {
        let buf = buffer_3x3([0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);
        let mask = vec![false; 9];

        let result = denoise(&buf, &mask).unwrap();

        assert_eq!(result.width, 3);
        assert_eq!(result.height, 3);
        assert_eq!(result.data, buf.data);
    }

    #[test]
    fn test_median_of_odd_clean_count() {
        // Center flagged; exactly three neighbors left clean.
        let buf = buffer_3x3([0.9, 0.5, 0.5, 0.1, 1.0, 0.5, 0.2, 0.5, 0.5]);
        let mut mask = vec![true; 9];
        mask[0] = false; // 0.9
        mask[3] = false; // 0.1
        mask[6] = false; // 0.2

        let result = denoise(&buf, &mask).unwrap();

        // Sorted clean values [0.1, 0.2, 0.9] -> middle element
        assert!((result.get(1, 1) - 0.2).abs() < 1e-7);
    }

    #[test]
    fn test_median_of_even_clean_count() {
        let buf = buffer_3x3([0.1, 0.5, 0.5, 0.5, 1.0, 0.5, 0.9, 0.5, 0.5]);
        let mut mask = vec![true; 9];
        mask[0] = false; // 0.1
        mask[6] = false; // 0.9

        let result = denoise(&buf, &mask).unwrap();

        // Sorted clean values [0.1, 0.9] -> index n/2 = 1
        assert!((result.get(1, 1) - 0.9).abs() < 1e-7);
    }

    #[test]
    fn test_no_clean_neighbor_is_a_no_op() {
        let buf = ImageBuffer::from_raw(vec![0.3, 0.6, 0.7, 0.8], 2, 2).unwrap();
        let mask = vec![true; 4];

        let result = denoise(&buf, &mask).unwrap();

        assert_eq!(result.data, buf.data);
    }

    #[test]
    fn test_flagged_corner_with_flagged_border() {
        // Entire border flagged, single clean interior pixel. The corner's
        // only in-bounds neighbors are border pixels plus the interior.
        let buf = buffer_3x3([1.0, 0.0, 0.0, 0.0, 0.42, 0.0, 0.0, 0.0, 0.0]);
        let mut mask = vec![true; 9];
        mask[4] = false;

        let result = denoise(&buf, &mask).unwrap();

        // Corner (0,0): clean neighborhood = {interior 0.42}
        assert!((result.get(0, 0) - 0.42).abs() < 1e-7);
    }

    #[test]
    fn test_all_clean_mask_is_identity() {
        let buf = ImageBuffer::from_raw(vec![0.2, 0.4, 0.6, 0.8], 2, 2).unwrap();
        let mask = vec![false; 4];

        let result = denoise(&buf, &mask).unwrap();

        assert_eq!(result, buf);
    }

    #[test]
    fn test_mask_length_mismatch_rejected() {
        let buf = ImageBuffer::from_raw(vec![0.5; 4], 2, 2).unwrap();
        let mask = vec![false; 5];

        let err = denoise(&buf, &mask).unwrap_err();

        assert_eq!(err, RestoreError::DimensionMismatch { mask: 5, pixels: 4 });
    }

    #[test]
    fn test_broken_buffer_invariant_rejected() {
        let buf = ImageBuffer {
            data: vec![0.5; 3],
            width: 2,
            height: 2,
        };
        let mask = vec![false; 3];

        let err = denoise(&buf, &mask).unwrap_err();

        assert_eq!(
            err,
            RestoreError::InvalidBuffer {
                len: 3,
                width: 2,
                height: 2
            }
        );
    }
}
