//! EdgeStag
//!
//! Canny edge detection on 8-bit raster images, with Python bindings via PyO3
//! and WASM bindings for JavaScript.
//!
//! ## Pipeline
//! 1. **Decode** PNG / JPEG / GIF / BMP bytes into an RGB buffer
//! 2. **Preprocess**: BT.601 grayscale, 5×5 Gaussian (sigma 1.5)
//! 3. **Gradient**: Sobel magnitude and 4-bin direction
//! 4. **Extract**: non-maximum suppression, double threshold, hysteresis
//! 5. **Compose**: labeled 2×2 montage and edge percentage
//!
//! ## Image Format
//! - **Grayscale**: (height, width, 1)
//! - **RGB**: (height, width, 3)
//!
//! All samples are `u8` (0-255). Edge maps hold only 0 and 255.
//!
//! ```no_run
//! use edgestag::{EdgePipeline, ThresholdPair};
//!
//! let pipeline = EdgePipeline::default();
//! let bytes = std::fs::read("photo.png")?;
//! let result = pipeline.process_upload("photo.png", &bytes, ThresholdPair::new(100, 200)?)?;
//! println!("{:.2}% edges", result.statistics.edge_percentage);
//! # Ok::<(), edgestag::Error>(())
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod filters;
pub mod io;
pub mod montage;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{EdgeMap, GradientDirection, GradientMap, PixelBuffer};
pub use config::{LumaStandard, PipelineConfig, PipelineInfo, ThresholdPair, ThresholdPreset};
pub use error::{Error, Result};
pub use montage::{EdgeStatistics, Montage};
pub use pipeline::{EdgeDetection, EdgePipeline, ProcessedImage};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;
    use pyo3::types::PyBytes;

    use crate::buffer::PixelBuffer;
    use crate::config::{PipelineConfig, ThresholdPair};
    use crate::error::Error;
    use crate::pipeline::EdgePipeline;

    fn to_py_err(err: Error) -> PyErr {
        if err.is_client_error() {
            PyValueError::new_err(err.to_string())
        } else {
            PyRuntimeError::new_err(err.to_string())
        }
    }

    // ========================================================================
    // Edge Detection
    // ========================================================================

    /// Detect edges in encoded image bytes.
    ///
    /// # Returns
    /// `(montage, edge_percentage)` with the montage as an (H, W, 3) u8 array
    #[pyfunction]
    #[pyo3(signature = (data, low=100, high=200))]
    pub fn process_image<'py>(
        py: Python<'py>,
        data: &[u8],
        low: i32,
        high: i32,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, f64)> {
        let pipeline = EdgePipeline::default();
        let result = pipeline
            .process_bytes(data, ThresholdPair { low, high })
            .map_err(to_py_err)?;
        let percentage = result.statistics.edge_percentage;
        Ok((result.montage.into_image().into_array().into_pyarray(py), percentage))
    }

    /// Detect edges in an image file.
    ///
    /// # Returns
    /// `(montage, edge_percentage)`
    #[pyfunction]
    #[pyo3(signature = (path, low=100, high=200))]
    pub fn process_path<'py>(
        py: Python<'py>,
        path: &str,
        low: i32,
        high: i32,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, f64)> {
        let pipeline = EdgePipeline::default();
        let detection = pipeline
            .run_from_path(path, ThresholdPair { low, high })
            .map_err(to_py_err)?;
        let montage = pipeline.compose(&detection).map_err(to_py_err)?;
        let percentage = pipeline.statistics(&detection.edges).edge_percentage;
        Ok((montage.into_image().into_array().into_pyarray(py), percentage))
    }

    /// Real-time frame: decode, resize to `width` × `height`, detect.
    ///
    /// # Returns
    /// (height, width, 3) edge image, white edges on black
    #[pyfunction]
    #[pyo3(signature = (data, width=640, height=480, low=100, high=200))]
    pub fn process_frame<'py>(
        py: Python<'py>,
        data: &[u8],
        width: usize,
        height: usize,
        low: i32,
        high: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let pipeline = EdgePipeline::default();
        let edges = pipeline
            .run_from_frame(data, width, height, ThresholdPair { low, high })
            .map_err(to_py_err)?;
        Ok(edges.into_array().into_pyarray(py))
    }

    /// Encode an (H, W, 1) or (H, W, 3) u8 array as PNG bytes.
    #[pyfunction]
    pub fn encode_png<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let buffer = PixelBuffer::from_array(image.as_array().to_owned()).map_err(to_py_err)?;
        let bytes = crate::io::encode_png(&buffer).map_err(to_py_err)?;
        Ok(PyBytes::new(py, &bytes))
    }

    /// Algorithm description, thresholds and presets as JSON.
    #[pyfunction]
    pub fn pipeline_info() -> PyResult<String> {
        serde_json::to_string(&PipelineConfig::default().info())
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// EdgeStag Rust extension module
    #[pymodule]
    pub fn edgestag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(process_image, m)?)?;
        m.add_function(wrap_pyfunction!(process_path, m)?)?;
        m.add_function(wrap_pyfunction!(process_frame, m)?)?;
        m.add_function(wrap_pyfunction!(encode_png, m)?)?;
        m.add_function(wrap_pyfunction!(pipeline_info, m)?)?;
        Ok(())
    }
}
