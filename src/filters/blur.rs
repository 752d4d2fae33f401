//! Gaussian smoothing.
//!
//! Separable 2-pass convolution (horizontal then vertical) with edge
//! replication at the borders. The horizontal pass is kept in f32; only the
//! final result is rounded back to u8, so downstream gradient arithmetic runs
//! on exact integers.
//!
//! Rows are processed in parallel with Rayon. Each output row depends only on
//! the input, so results are bit-identical regardless of scheduling.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::core::{clamp_index, gaussian_kernel_1d};

/// Apply a fixed-size Gaussian blur.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `kernel_size` - Number of taps per pass (odd, e.g. 5)
/// * `sigma` - Standard deviation of the Gaussian
///
/// # Returns
/// Blurred image with same dimensions
pub fn gaussian_blur_u8(input: ArrayView3<u8>, kernel_size: usize, sigma: f32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if height == 0 || width == 0 {
        return input.to_owned();
    }

    let kernel = gaussian_kernel_1d(kernel_size, sigma);
    let half = (kernel.len() / 2) as isize;
    let row_len = width * channels;

    // Horizontal pass
    let mut temp = vec![0.0f32; height * row_len];
    temp.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        let sx = clamp_index(x as isize + ki as isize - half, width);
                        sum += input[[y, sx, c]] as f32 * kv;
                    }
                    row[x * channels + c] = sum;
                }
            }
        });

    // Vertical pass
    let mut output_flat = vec![0u8; height * row_len];
    output_flat
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for (i, out) in row.iter_mut().enumerate() {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sy = clamp_index(y as isize + ki as isize - half, height);
                    sum += temp[sy * row_len + i] * kv;
                }
                *out = sum.round().clamp(0.0, 255.0) as u8;
            }
        });

    Array3::from_shape_vec((height, width, channels), output_flat)
        .expect("Shape mismatch in gaussian_blur_u8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_image_unchanged() {
        let img = Array3::<u8>::from_elem((7, 9, 1), 128);
        let result = gaussian_blur_u8(img.view(), 5, 1.5);
        assert!(result.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_point_spreads_symmetrically() {
        let mut img = Array3::<u8>::zeros((9, 9, 1));
        img[[4, 4, 0]] = 255;
        let result = gaussian_blur_u8(img.view(), 5, 1.5);

        let center = result[[4, 4, 0]];
        assert!(center > 0 && center < 255);
        assert_eq!(result[[4, 3, 0]], result[[4, 5, 0]]);
        assert_eq!(result[[3, 4, 0]], result[[5, 4, 0]]);
        assert_eq!(result[[3, 4, 0]], result[[4, 3, 0]]);
        assert!(result[[4, 3, 0]] < center);
        // Outside the 5x5 support
        assert_eq!(result[[4, 7, 0]], 0);
        assert_eq!(result[[1, 4, 0]], 0);
    }

    #[test]
    fn test_step_edge_values() {
        // Black for x < 5, white for x >= 5
        let img = Array3::from_shape_fn((3, 10, 1), |(_, x, _)| if x < 5 { 0u8 } else { 255 });
        let result = gaussian_blur_u8(img.view(), 5, 1.5);

        assert_eq!(result[[1, 2, 0]], 0);
        assert_eq!(result[[1, 3, 0]], 31);
        assert_eq!(result[[1, 4, 0]], 90);
        assert_eq!(result[[1, 5, 0]], 165);
        assert_eq!(result[[1, 6, 0]], 224);
        assert_eq!(result[[1, 7, 0]], 255);
        // Symmetric about the boundary
        assert_eq!(result[[1, 4, 0]] as u16 + result[[1, 5, 0]] as u16, 255);
    }

    #[test]
    fn test_border_replication() {
        // Image smaller than the kernel: zero padding would darken every pixel
        let img = Array3::<u8>::from_elem((3, 3, 1), 200);
        let result = gaussian_blur_u8(img.view(), 5, 1.5);
        assert!(result.iter().all(|&v| v == 200));
    }

    #[test]
    fn test_multichannel_independent() {
        let mut img = Array3::<u8>::zeros((5, 5, 3));
        for y in 0..5 {
            for x in 0..5 {
                img[[y, x, 1]] = 100;
            }
        }
        let result = gaussian_blur_u8(img.view(), 5, 1.5);
        assert_eq!(result[[2, 2, 0]], 0);
        assert_eq!(result[[2, 2, 1]], 100);
        assert_eq!(result[[2, 2, 2]], 0);
    }
}
