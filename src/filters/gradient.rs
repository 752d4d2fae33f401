//! Sobel gradient estimation.
//!
//! - Convolves the 3×3 Sobel pair with edge replication at the borders.
//! - Magnitude is Euclidean, `sqrt(gx² + gy²)`, on the 0-255 intensity scale
//!   (a full black/white step yields 4 × 255 = 1020).
//! - Direction is `atan2(gy, gx)` quantized to four bins, see
//!   [`GradientDirection::from_angle`].

use ndarray::{Array2, ArrayView3};
use rayon::prelude::*;

use super::core::clamp_index;
use crate::buffer::{GradientDirection, GradientMap};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Compute Sobel gradients of the first channel of `input`.
///
/// # Arguments
/// * `input` - Smoothed grayscale image (height, width, 1)
///
/// # Returns
/// Gradient map with the same (width, height)
pub fn sobel_gradients(input: ArrayView3<u8>) -> GradientMap {
    let (height, width, _) = input.dim();
    let mut magnitude = vec![0.0f32; height * width];
    let mut direction = vec![GradientDirection::default(); height * width];

    if width > 0 && height > 0 {
        magnitude
            .par_chunks_mut(width)
            .zip(direction.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (mag_row, dir_row))| {
                let rows = [
                    clamp_index(y as isize - 1, height),
                    y,
                    clamp_index(y as isize + 1, height),
                ];
                for x in 0..width {
                    let cols = [
                        clamp_index(x as isize - 1, width),
                        x,
                        clamp_index(x as isize + 1, width),
                    ];

                    let mut gx = 0.0f32;
                    let mut gy = 0.0f32;
                    for (ky, &sy) in rows.iter().enumerate() {
                        for (kx, &sx) in cols.iter().enumerate() {
                            let v = input[[sy, sx, 0]] as f32;
                            gx += v * SOBEL_KERNEL_X[ky][kx];
                            gy += v * SOBEL_KERNEL_Y[ky][kx];
                        }
                    }

                    mag_row[x] = (gx * gx + gy * gy).sqrt();
                    dir_row[x] = GradientDirection::from_angle(gy.atan2(gx));
                }
            });
    }

    let magnitude = Array2::from_shape_vec((height, width), magnitude)
        .expect("Shape mismatch in sobel_gradients magnitude");
    let direction = Array2::from_shape_vec((height, width), direction)
        .expect("Shape mismatch in sobel_gradients direction");
    GradientMap::new(magnitude, direction).expect("Gradient buffers share one shape")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;

    #[test]
    fn test_flat_image_has_no_gradient() {
        let img = Array3::<u8>::from_elem((6, 6, 1), 90);
        let grad = sobel_gradients(img.view());
        assert_eq!(grad.dims(), (6, 6));
        assert!(grad.magnitude().iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_vertical_step_is_horizontal_gradient() {
        let img = Array3::from_shape_fn((5, 6, 1), |(_, x, _)| if x < 3 { 0u8 } else { 255 });
        let grad = sobel_gradients(img.view());

        // Columns 2 and 3 straddle the step: (255 - 0) * (1 + 2 + 1)
        assert_abs_diff_eq!(grad.magnitude_at(2, 2), 1020.0);
        assert_abs_diff_eq!(grad.magnitude_at(3, 2), 1020.0);
        assert_eq!(grad.direction_at(2, 2), GradientDirection::Horizontal);
        assert_eq!(grad.magnitude_at(0, 2), 0.0);
        assert_eq!(grad.magnitude_at(5, 2), 0.0);
        // Replicated border rows see the same step
        assert_abs_diff_eq!(grad.magnitude_at(2, 0), 1020.0);
    }

    #[test]
    fn test_horizontal_step_is_vertical_gradient() {
        let img = Array3::from_shape_fn((6, 5, 1), |(y, _, _)| if y < 3 { 0u8 } else { 100 });
        let grad = sobel_gradients(img.view());
        assert_abs_diff_eq!(grad.magnitude_at(2, 3), 400.0);
        assert_eq!(grad.direction_at(2, 3), GradientDirection::Vertical);
    }

    #[test]
    fn test_diagonal_step_directions() {
        // Bright below the main diagonal: gradient points down-left
        let img = Array3::from_shape_fn((7, 7, 1), |(y, x, _)| if y > x { 200u8 } else { 0 });
        let grad = sobel_gradients(img.view());
        assert_eq!(grad.direction_at(3, 3), GradientDirection::AntiDiagonal);

        // Bright below the anti-diagonal: gradient points down-right
        let img = Array3::from_shape_fn((7, 7, 1), |(y, x, _)| if x + y > 6 { 200u8 } else { 0 });
        let grad = sobel_gradients(img.view());
        assert_eq!(grad.direction_at(3, 3), GradientDirection::MainDiagonal);
    }

    #[test]
    fn test_empty_image() {
        let img = Array3::<u8>::zeros((0, 0, 1));
        let grad = sobel_gradients(img.view());
        assert_eq!(grad.dims(), (0, 0));
    }
}
