//! WebAssembly exports for EdgeStag.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Errors are
//! returned as JS exceptions carrying the error message.

use wasm_bindgen::prelude::*;

use crate::config::ThresholdPair;
use crate::error::Error;
use crate::pipeline::EdgePipeline;

fn to_js_err(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ============================================================================
// Frame Processing
// ============================================================================

/// Detect edges in an encoded frame (PNG, JPEG, GIF or BMP).
///
/// # Arguments
/// * `data` - Encoded image bytes
/// * `width` - Output width in pixels, the frame is resized to it
/// * `height` - Output height in pixels
/// * `low` - Low hysteresis threshold
/// * `high` - High hysteresis threshold
///
/// # Returns
/// Flat array of RGB bytes (length = width * height * 3), edges white
#[wasm_bindgen]
pub fn process_frame_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    low: i32,
    high: i32,
) -> Result<Vec<u8>, JsValue> {
    let pipeline = EdgePipeline::default();
    let edges = pipeline
        .run_from_frame(data, width, height, ThresholdPair { low, high })
        .map_err(to_js_err)?;
    Ok(edges.into_raw())
}

// ============================================================================
// Canvas Processing
// ============================================================================

/// Detect edges in raw canvas pixels.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `low` - Low hysteresis threshold
/// * `high` - High hysteresis threshold
///
/// # Returns
/// Flat array of RGBA bytes, edges white on opaque black
#[wasm_bindgen]
pub fn detect_edges_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    low: i32,
    high: i32,
) -> Result<Vec<u8>, JsValue> {
    let pipeline = EdgePipeline::default();
    let edges = pipeline
        .run_from_rgba(data, width, height, ThresholdPair { low, high })
        .map_err(to_js_err)?;
    Ok(edges
        .into_raw()
        .chunks_exact(3)
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect())
}
