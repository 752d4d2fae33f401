//! Four-panel comparison montage and edge statistics.
//!
//! Layout (each panel has the original image's size):
//!
//! ```text
//! +-----------+-----------+
//! | Original  | Grayscale |
//! +-----------+-----------+
//! | Edges     | Overlay   |
//! +-----------+-----------+
//! ```
//!
//! The overlay is `(1 - alpha) * original + alpha * edges` per channel.
//! Labels are burned in white with the built-in bitmap font.

pub mod font;

use log::warn;
use ndarray::{s, Array3, Zip};
use serde::Serialize;

use crate::buffer::{EdgeMap, PixelBuffer};
use crate::error::{Error, Result};
use crate::filters::resize::resize_area_u8;

pub const PANEL_LABELS: [&str; 4] = ["Original", "Grayscale", "Edges", "Overlay"];

/// Label top-left offset inside each panel; puts the text baseline near y=30.
pub const LABEL_OFFSET: (usize, usize) = (10, 9);
pub const LABEL_SCALE: usize = 3;
const LABEL_COLOR: [u8; 3] = [255, 255, 255];

// ============================================================================
// Statistics
// ============================================================================

/// Share of edge pixels in an edge map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EdgeStatistics {
    pub edge_pixels: usize,
    pub total_pixels: usize,
    /// `100 * edge_pixels / total_pixels`, rounded to two decimals.
    pub edge_percentage: f64,
    pub width: usize,
    pub height: usize,
}

impl EdgeStatistics {
    pub fn from_edges(edges: &EdgeMap) -> Self {
        let edge_pixels = edges.edge_count();
        let total_pixels = edges.pixel_count();
        Self {
            edge_pixels,
            total_pixels,
            edge_percentage: edge_percentage(edge_pixels, total_pixels),
            width: edges.width(),
            height: edges.height(),
        }
    }
}

/// Percentage rounded to two decimals; 0 for an empty image.
pub fn edge_percentage(edge_pixels: usize, total_pixels: usize) -> f64 {
    if total_pixels == 0 {
        return 0.0;
    }
    let percent = edge_pixels as f64 * 100.0 / total_pixels as f64;
    (percent * 100.0).round() / 100.0
}

// ============================================================================
// Montage
// ============================================================================

/// Immutable 2×2 panel composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Montage {
    image: PixelBuffer,
    panel_width: usize,
    panel_height: usize,
}

impl Montage {
    /// Tile four equally sized 3-channel panels, row-major, and draw labels.
    ///
    /// Fails with `DimensionMismatch` when any panel differs from the first.
    pub fn assemble(panels: [&PixelBuffer; 4], labels: [&str; 4]) -> Result<Self> {
        let expected = panels[0].dims();
        for panel in panels.iter().skip(1) {
            if panel.dims() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: panel.dims(),
                });
            }
        }

        let (panel_width, panel_height) = expected;
        let mut image = PixelBuffer::zeros(panel_width * 2, panel_height * 2, 3);
        let canvas = image.as_array_mut();

        for (i, (panel, label)) in panels.iter().zip(labels.iter()).enumerate() {
            let x0 = (i % 2) * panel_width;
            let y0 = (i / 2) * panel_height;
            let color = panel.to_color();
            canvas
                .slice_mut(s![y0..y0 + panel_height, x0..x0 + panel_width, ..])
                .assign(color.as_array());

            font::draw_text(
                canvas,
                label,
                x0 + LABEL_OFFSET.0,
                y0 + LABEL_OFFSET.1,
                LABEL_SCALE,
                LABEL_COLOR,
                (x0, y0, x0 + panel_width, y0 + panel_height),
            );
        }

        Ok(Self {
            image,
            panel_width,
            panel_height,
        })
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    pub fn into_image(self) -> PixelBuffer {
        self.image
    }

    /// (width, height) of one panel.
    pub fn panel_dims(&self) -> (usize, usize) {
        (self.panel_width, self.panel_height)
    }

    /// (width, height) of the whole montage.
    pub fn dims(&self) -> (usize, usize) {
        self.image.dims()
    }
}

/// Blend edges over the original: `(1 - alpha) * original + alpha * edge`.
pub fn overlay(original: &PixelBuffer, edges: &PixelBuffer, alpha: f32) -> Result<PixelBuffer> {
    if original.dims() != edges.dims() {
        return Err(Error::DimensionMismatch {
            expected: original.dims(),
            actual: edges.dims(),
        });
    }

    let original = original.to_color();
    let edges = edges.to_color();
    let mut blended = Array3::<u8>::zeros(original.as_array().dim());
    Zip::from(&mut blended)
        .and(original.as_array())
        .and(edges.as_array())
        .for_each(|out, &o, &e| {
            let v = (1.0 - alpha) * o as f32 + alpha * e as f32;
            *out = v.round().clamp(0.0, 255.0) as u8;
        });
    PixelBuffer::from_array(blended)
}

/// Resize `panel` to `dims` if needed, as a 3-channel buffer.
fn fit_panel(panel: &PixelBuffer, dims: (usize, usize)) -> Result<PixelBuffer> {
    let color = panel.to_color();
    if color.dims() == dims {
        return Ok(color);
    }
    warn!(
        "montage panel is {}x{}, resizing to {}x{}",
        color.width(),
        color.height(),
        dims.0,
        dims.1
    );
    PixelBuffer::from_array(resize_area_u8(color.view(), dims.0, dims.1))
}

/// Build the labeled four-panel montage for one detection.
///
/// # Arguments
/// * `original` - Decoded color image; sets the panel size
/// * `gray` - Grayscale image
/// * `edges` - Final edge map
/// * `overlay_alpha` - Weight of the edge layer in the overlay panel
pub fn compose(
    original: &PixelBuffer,
    gray: &PixelBuffer,
    edges: &EdgeMap,
    overlay_alpha: f32,
) -> Result<Montage> {
    let dims = original.dims();

    let p1 = original.to_color();
    let p2 = fit_panel(gray, dims)?;
    let p3 = fit_panel(&edges.to_color(), dims)?;
    let p4 = overlay(&p1, &p3, overlay_alpha)?;

    Montage::assemble([&p1, &p2, &p3, &p4], PANEL_LABELS)
}
