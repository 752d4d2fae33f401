//! Grayscale conversion filter.
//!
//! Reduces an RGB buffer to a single luma channel with a fixed weighted sum.
//! The default weighting is ITU-R BT.601, which matches the luma most
//! camera/JPEG pipelines produce; BT.709 is available through `LumaWeights`.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) - copied through unchanged
//! - **RGB**: (height, width, 3) - weighted sum, rounded to nearest
//!
//! Output is always (height, width, 1).

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

/// ITU-R BT.601 luma coefficients
const BT601_R: f32 = 0.299;
const BT601_G: f32 = 0.587;
const BT601_B: f32 = 0.114;

/// ITU-R BT.709 luma coefficients
const BT709_R: f32 = 0.2126;
const BT709_G: f32 = 0.7152;
const BT709_B: f32 = 0.0722;

/// RGB channel weights for luma computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LumaWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for LumaWeights {
    fn default() -> Self {
        Self::bt601()
    }
}

impl LumaWeights {
    /// BT.601 luma (default)
    pub fn bt601() -> Self {
        Self {
            r: BT601_R,
            g: BT601_G,
            b: BT601_B,
        }
    }

    /// BT.709 luma
    pub fn bt709() -> Self {
        Self {
            r: BT709_R,
            g: BT709_G,
            b: BT709_B,
        }
    }

    #[inline]
    fn apply(&self, r: u8, g: u8, b: u8) -> u8 {
        let y = self.r * r as f32 + self.g * g as f32 + self.b * b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }
}

/// Convert an image to single-channel luma.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `weights` - Channel weights, ignored for single-channel input
///
/// # Returns
/// New (height, width, 1) array
pub fn grayscale_u8(input: ArrayView3<u8>, weights: LumaWeights) -> Array3<u8> {
    let (height, width, channels) = input.dim();

    if channels == 1 {
        return input.to_owned();
    }

    let mut output_flat = vec![0u8; height * width];
    if width > 0 {
        output_flat
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    *out = weights.apply(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
                }
            });
    }

    Array3::from_shape_vec((height, width, 1), output_flat)
        .expect("Shape mismatch in grayscale_u8")
}
