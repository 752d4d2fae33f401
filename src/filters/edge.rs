//! Canny edge extraction: non-maximum suppression, double threshold and
//! hysteresis linking.
//!
//! Each phase is a public function producing a new (height, width) buffer so
//! intermediate results can be inspected:
//!
//! 1. [`suppress_non_maxima`] - thins gradient ridges to one pixel
//! 2. [`classify`] - STRONG / WEAK / SUPPRESSED per pixel
//! 3. [`link_hysteresis`] - keeps WEAK pixels 8-connected to a STRONG one
//!
//! [`extract_edges`] runs all three.
//!
//! ## Suppression rule
//!
//! A pixel survives when its magnitude is strictly greater than the forward
//! neighbor along the gradient and not less than the backward neighbor.
//! On a flat two-pixel ridge exactly one pixel (the forward one) survives;
//! everywhere else this is "strictly greater than both". Magnitudes outside
//! the image count as zero.

use std::collections::VecDeque;

use ndarray::Array2;

use crate::buffer::{EdgeMap, GradientMap};
use crate::config::ThresholdPair;
use crate::error::Result;

/// Per-pixel outcome of the double threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeClass {
    /// Below the low threshold, or removed by suppression.
    Suppressed,
    /// Between the thresholds; kept only if linked to a strong pixel.
    Weak,
    /// At or above the high threshold.
    Strong,
}

const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

// ============================================================================
// Non-maximum suppression
// ============================================================================

/// Zero every pixel that is not a local maximum along its gradient direction.
///
/// # Returns
/// (height, width) magnitudes, zero where suppressed
pub fn suppress_non_maxima(gradient: &GradientMap) -> Array2<f32> {
    let (width, height) = gradient.dims();
    let magnitude = gradient.magnitude();

    let sample = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            0.0
        } else {
            magnitude[[y as usize, x as usize]]
        }
    };

    Array2::from_shape_fn((height, width), |(y, x)| {
        let m = magnitude[[y, x]];
        if m <= 0.0 {
            return 0.0;
        }

        let (dx, dy) = gradient.direction_at(x, y).offset();
        let (xi, yi) = (x as isize, y as isize);
        let forward = sample(xi + dx, yi + dy);
        let backward = sample(xi - dx, yi - dy);

        if m > forward && m >= backward {
            m
        } else {
            0.0
        }
    })
}

// ============================================================================
// Double threshold
// ============================================================================

/// Classify suppressed magnitudes against the threshold pair.
pub fn classify(suppressed: &Array2<f32>, thresholds: ThresholdPair) -> Array2<EdgeClass> {
    let low = thresholds.low as f32;
    let high = thresholds.high as f32;

    suppressed.mapv(|m| {
        if m <= 0.0 || m < low {
            EdgeClass::Suppressed
        } else if m >= high {
            EdgeClass::Strong
        } else {
            EdgeClass::Weak
        }
    })
}

// ============================================================================
// Hysteresis
// ============================================================================

/// Promote STRONG pixels and every WEAK pixel reachable from one through an
/// 8-connected chain of WEAK pixels.
///
/// Uses an explicit FIFO worklist so long chains never grow the call stack.
pub fn link_hysteresis(classes: &Array2<EdgeClass>) -> EdgeMap {
    let (height, width) = classes.dim();
    let mut promoted = Array2::from_elem((height, width), false);
    let mut queue = VecDeque::new();

    for ((y, x), &class) in classes.indexed_iter() {
        if class == EdgeClass::Strong {
            promoted[[y, x]] = true;
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for &(dx, dy) in NEIGHBORS_8.iter() {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !promoted[[ny, nx]] && classes[[ny, nx]] == EdgeClass::Weak {
                promoted[[ny, nx]] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    EdgeMap::from_mask(&promoted)
}

/// Run suppression, classification and hysteresis.
///
/// Fails with `InvalidThreshold` when `low >= high`, before reading the
/// gradient.
pub fn extract_edges(gradient: &GradientMap, thresholds: ThresholdPair) -> Result<EdgeMap> {
    thresholds.validate()?;

    let suppressed = suppress_non_maxima(gradient);
    let classes = classify(&suppressed, thresholds);
    Ok(link_hysteresis(&classes))
}
