//! Core utilities shared by the filters:
//! - Gaussian kernel generation
//! - Border handling (edge replication)

/// Generate a normalized 1D Gaussian kernel of fixed size.
///
/// # Arguments
/// * `size` - Number of taps (odd)
/// * `sigma` - Standard deviation of the Gaussian
///
/// # Returns
/// Kernel weights summing to 1.0
pub fn gaussian_kernel_1d(size: usize, sigma: f32) -> Vec<f32> {
    if size <= 1 || sigma <= 0.0 {
        return vec![1.0];
    }

    let half = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    // Normalize
    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Replicate-border index: positions outside `[0, len)` snap to the nearest
/// edge sample.
#[inline]
pub fn clamp_index(pos: isize, len: usize) -> usize {
    pos.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let kernel = gaussian_kernel_1d(5, 1.5);
        assert_eq!(kernel.len(), 5);
        assert_abs_diff_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        assert_eq!(kernel[0], kernel[4]);
        assert_eq!(kernel[1], kernel[3]);
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
    }

    #[test]
    fn test_kernel_values_sigma_1_5() {
        let kernel = gaussian_kernel_1d(5, 1.5);
        assert_abs_diff_eq!(kernel[0], 0.1201, epsilon = 1e-3);
        assert_abs_diff_eq!(kernel[1], 0.2339, epsilon = 1e-3);
        assert_abs_diff_eq!(kernel[2], 0.2921, epsilon = 1e-3);
    }

    #[test]
    fn test_degenerate_kernel() {
        assert_eq!(gaussian_kernel_1d(1, 1.5), vec![1.0]);
        assert_eq!(gaussian_kernel_1d(5, 0.0), vec![1.0]);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-2, 10), 0);
        assert_eq!(clamp_index(4, 10), 4);
        assert_eq!(clamp_index(12, 10), 9);
    }
}
