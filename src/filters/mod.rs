//! Filter stages of the edge pipeline.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! Filters take an `ArrayView3<u8>` and return a freshly allocated array;
//! nothing is modified in place.
//!
//! ## Stages
//!
//! - **grayscale**: BT.601 / BT.709 luma
//! - **blur**: separable Gaussian, edge-replicated borders
//! - **gradient**: Sobel magnitude and 4-bin direction
//! - **edge**: non-maximum suppression, double threshold, hysteresis
//! - **resize**: area-averaging resize for frames and montage panels
//!
//! Row loops run in parallel with rayon; each output row is computed
//! independently, so results do not depend on scheduling.

pub mod core;
pub mod grayscale;
pub mod blur;
pub mod gradient;
pub mod edge;
pub mod resize;
