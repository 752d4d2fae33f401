//! Area-averaging resize.
//!
//! Each destination pixel covers a rectangle of the source image; its value is
//! the coverage-weighted mean of every source pixel overlapping that rectangle.
//! Downscaling therefore averages whole blocks, and upscaling blends at most
//! two source pixels per axis. Weights are separable, so the resize runs as a
//! horizontal and a vertical pass like the blur.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

/// Per-destination-index list of (source index, weight) with weights summing
/// to 1.
fn axis_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len).max(first + 1);

            let mut taps: Vec<(usize, f32)> = (first..last)
                .filter_map(|s| {
                    let overlap = (end.min((s + 1) as f64) - start.max(s as f64)).max(0.0);
                    (overlap > 0.0).then_some((s, overlap as f32))
                })
                .collect();
            if taps.is_empty() {
                taps.push((first.min(src_len - 1), 1.0));
            }

            let total: f32 = taps.iter().map(|&(_, w)| w).sum();
            for tap in taps.iter_mut() {
                tap.1 /= total;
            }
            taps
        })
        .collect()
}

/// Resize to exactly `width` × `height` with area averaging.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `width` - Target width, must be non-zero
/// * `height` - Target height, must be non-zero
///
/// # Returns
/// New (height, width, channels) array; a plain copy when sizes already match
pub fn resize_area_u8(input: ArrayView3<u8>, width: usize, height: usize) -> Array3<u8> {
    let (src_h, src_w, channels) = input.dim();

    if src_w == width && src_h == height {
        return input.to_owned();
    }
    if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
        return Array3::zeros((height, width, channels));
    }

    let x_weights = axis_weights(src_w, width);
    let y_weights = axis_weights(src_h, height);

    // Horizontal pass: src_h rows of `width` pixels
    let temp_row = width * channels;
    let mut temp = vec![0.0f32; src_h * temp_row];
    temp.par_chunks_mut(temp_row)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, taps) in x_weights.iter().enumerate() {
                for c in 0..channels {
                    row[x * channels + c] = taps
                        .iter()
                        .map(|&(sx, w)| input[[y, sx, c]] as f32 * w)
                        .sum();
                }
            }
        });

    // Vertical pass
    let mut output_flat = vec![0u8; height * temp_row];
    output_flat
        .par_chunks_mut(temp_row)
        .enumerate()
        .for_each(|(y, row)| {
            let taps = &y_weights[y];
            for (i, out) in row.iter_mut().enumerate() {
                let sum: f32 = taps.iter().map(|&(sy, w)| temp[sy * temp_row + i] * w).sum();
                *out = sum.round().clamp(0.0, 255.0) as u8;
            }
        });

    Array3::from_shape_vec((height, width, channels), output_flat)
        .expect("Shape mismatch in resize_area_u8")
}
