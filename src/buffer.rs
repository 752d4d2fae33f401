//! Owned image buffers passed between pipeline stages.
//!
//! ## Layout
//!
//! | Type | Storage | Shape | Values |
//! |------|---------|-------|--------|
//! | `PixelBuffer` | `Array3<u8>` | (H, W, 1) or (H, W, 3) | 0-255, RGB order |
//! | `GradientMap` | `Array2<f32>` + `Array2<GradientDirection>` | (H, W) | magnitude >= 0 |
//! | `EdgeMap` | `Array2<u8>` | (H, W) | 0 or 255 |
//!
//! Every stage allocates a fresh buffer; nothing is shared or mutated in place
//! across stages.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use crate::error::{Error, Result};

/// Value written for an edge pixel.
pub const EDGE: u8 = 255;

/// Value written for a non-edge pixel.
pub const NON_EDGE: u8 = 0;

// ============================================================================
// PixelBuffer
// ============================================================================

/// Row-major 8-bit image with 1 (gray) or 3 (RGB) channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Build from raw interleaved samples.
    ///
    /// Fails with `Decode` when `channels` is not 1 or 3 or when
    /// `data.len() != width * height * channels`.
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        check_channels(channels)?;
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(Error::Decode(format!(
                "buffer of {} bytes does not match {width}x{height}x{channels}",
                data.len()
            )));
        }
        let data = Array3::from_shape_vec((height, width, channels), data)
            .map_err(|e| Error::Decode(e.to_string()))?;
        Ok(Self { data })
    }

    /// Wrap an existing (height, width, channels) array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        check_channels(data.dim().2)?;
        Ok(Self {
            data: data.as_standard_layout().into_owned(),
        })
    }

    /// Build an RGB buffer from raw RGBA samples (e.g. browser canvas data),
    /// dropping alpha.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self> {
        if rgba.len() != width * height * 4 {
            return Err(Error::Decode(format!(
                "RGBA buffer of {} bytes does not match {width}x{height}x4",
                rgba.len()
            )));
        }
        let rgb: Vec<u8> = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::from_raw(width, height, 3, rgb)
    }

    pub(crate) fn zeros(width: usize, height: usize, channels: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, channels)),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    /// (width, height)
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[[y, x, c]]
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    pub(crate) fn as_array_mut(&mut self) -> &mut Array3<u8> {
        &mut self.data
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Interleaved samples in row-major order.
    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }

    /// Three-channel copy. Gray samples are replicated into R, G and B.
    pub fn to_color(&self) -> PixelBuffer {
        if self.channels() == 3 {
            return self.clone();
        }
        let (height, width, _) = self.data.dim();
        let data = Array3::from_shape_fn((height, width, 3), |(y, x, _)| self.data[[y, x, 0]]);
        Self { data }
    }
}

fn check_channels(channels: usize) -> Result<()> {
    if channels == 1 || channels == 3 {
        Ok(())
    } else {
        Err(Error::Decode(format!(
            "unsupported channel count {channels}, expected 1 or 3"
        )))
    }
}

// ============================================================================
// GradientMap
// ============================================================================

/// Gradient orientation folded modulo 180° into four bins.
///
/// The image y axis points down, so `MainDiagonal` is the ↘/↖ axis and
/// `AntiDiagonal` the ↙/↗ axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GradientDirection {
    /// 0° ± 22.5°
    #[default]
    Horizontal,
    /// 45° ± 22.5°
    MainDiagonal,
    /// 90° ± 22.5°
    Vertical,
    /// 135° ± 22.5°
    AntiDiagonal,
}

impl GradientDirection {
    /// Quantize `atan2(gy, gx)` (radians) to the nearest bin.
    pub fn from_angle(angle: f32) -> Self {
        let pi = std::f32::consts::PI;
        let folded = angle.rem_euclid(pi);
        let bin = ((folded / (pi / 4.0)).round() as i32).rem_euclid(4);
        match bin {
            0 => Self::Horizontal,
            1 => Self::MainDiagonal,
            2 => Self::Vertical,
            _ => Self::AntiDiagonal,
        }
    }

    /// Step (dx, dy) towards the forward neighbor along the gradient.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Self::Horizontal => (1, 0),
            Self::MainDiagonal => (1, 1),
            Self::Vertical => (0, 1),
            Self::AntiDiagonal => (-1, 1),
        }
    }
}

/// Per-pixel gradient magnitude and quantized direction.
#[derive(Clone, Debug)]
pub struct GradientMap {
    magnitude: Array2<f32>,
    direction: Array2<GradientDirection>,
}

impl GradientMap {
    /// Both arrays must share the same (height, width) shape.
    pub fn new(magnitude: Array2<f32>, direction: Array2<GradientDirection>) -> Result<Self> {
        if magnitude.dim() != direction.dim() {
            let (mh, mw) = magnitude.dim();
            let (dh, dw) = direction.dim();
            return Err(Error::DimensionMismatch {
                expected: (mw, mh),
                actual: (dw, dh),
            });
        }
        Ok(Self {
            magnitude,
            direction,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.magnitude.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.magnitude.dim().0
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn magnitude(&self) -> ArrayView2<'_, f32> {
        self.magnitude.view()
    }

    #[inline]
    pub fn magnitude_at(&self, x: usize, y: usize) -> f32 {
        self.magnitude[[y, x]]
    }

    #[inline]
    pub fn direction_at(&self, x: usize, y: usize) -> GradientDirection {
        self.direction[[y, x]]
    }
}

// ============================================================================
// EdgeMap
// ============================================================================

/// Binary edge map: every pixel is `EDGE` (255) or `NON_EDGE` (0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    data: Array2<u8>,
}

impl EdgeMap {
    /// Build from a (height, width) mask of promoted pixels.
    pub fn from_mask(mask: &Array2<bool>) -> Self {
        Self {
            data: mask.mapv(|edge| if edge { EDGE } else { NON_EDGE }),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.data[[y, x]] == EDGE
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }

    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == EDGE).count()
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Single-channel buffer with the same samples.
    pub fn to_gray(&self) -> PixelBuffer {
        let (height, width) = self.data.dim();
        let data = Array3::from_shape_fn((height, width, 1), |(y, x, _)| self.data[[y, x]]);
        PixelBuffer { data }
    }

    /// Three-channel buffer, edges white on black.
    pub fn to_color(&self) -> PixelBuffer {
        let (height, width) = self.data.dim();
        let data = Array3::from_shape_fn((height, width, 3), |(y, x, _)| self.data[[y, x]]);
        PixelBuffer { data }
    }
}
