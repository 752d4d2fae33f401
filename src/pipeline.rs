//! Edge detection orchestrator.
//!
//! `EdgePipeline` sequences decode → grayscale → Gaussian → Sobel → Canny
//! extraction and, for full requests, the montage and statistics. It owns an
//! immutable [`PipelineConfig`] and keeps no per-request state, so one
//! instance can serve concurrent callers.
//!
//! Thresholds are always checked before any input is decoded.

use std::path::Path;
use std::time::Instant;

use log::debug;

use crate::buffer::{EdgeMap, PixelBuffer};
use crate::config::{PipelineConfig, ThresholdPair};
use crate::error::Result;
use crate::filters::blur::gaussian_blur_u8;
use crate::filters::edge::extract_edges;
use crate::filters::gradient::sobel_gradients;
use crate::filters::grayscale::grayscale_u8;
use crate::io::{decode_frame, decode_image, encode_png, load_image};
use crate::montage::{self, EdgeStatistics, Montage};

/// Result of one detection: the decoded input, its grayscale version and the
/// binary edge map, all with the same dimensions.
#[derive(Clone, Debug)]
pub struct EdgeDetection {
    pub original: PixelBuffer,
    pub gray: PixelBuffer,
    pub edges: EdgeMap,
    pub thresholds: ThresholdPair,
    /// Wall time from preprocessing to the final edge map.
    pub elapsed_ms: f64,
}

/// Full response for an uploaded or downloaded image.
#[derive(Clone, Debug)]
pub struct ProcessedImage {
    pub detection: EdgeDetection,
    pub montage: Montage,
    pub statistics: EdgeStatistics,
}

impl ProcessedImage {
    /// Montage encoded as PNG.
    pub fn montage_png(&self) -> Result<Vec<u8>> {
        encode_png(self.montage.image())
    }
}

#[derive(Clone, Debug, Default)]
pub struct EdgePipeline {
    config: PipelineConfig,
}

impl EdgePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Grayscale conversion followed by Gaussian smoothing.
    ///
    /// # Returns
    /// (grayscale, smoothed), both single-channel with the input's dimensions
    pub fn preprocess(&self, image: &PixelBuffer) -> Result<(PixelBuffer, PixelBuffer)> {
        let gray = grayscale_u8(image.view(), self.config.luma.weights());
        let smoothed = gaussian_blur_u8(
            gray.view(),
            self.config.gaussian_kernel_size,
            self.config.gaussian_sigma,
        );
        Ok((PixelBuffer::from_array(gray)?, PixelBuffer::from_array(smoothed)?))
    }

    /// Run preprocessing, gradient estimation and edge extraction on an
    /// already decoded image.
    pub fn detect(&self, image: &PixelBuffer, thresholds: ThresholdPair) -> Result<EdgeDetection> {
        self.config.check_thresholds(thresholds)?;

        let t0 = Instant::now();
        let (gray, smoothed) = self.preprocess(image)?;
        let t_pre = t0.elapsed().as_secs_f64() * 1000.0;

        let gradient = sobel_gradients(smoothed.view());
        let t_grad = t0.elapsed().as_secs_f64() * 1000.0;

        let edges = extract_edges(&gradient, thresholds)?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

        debug!(
            "EdgePipeline::detect {}x{} low={} high={} edges={} preprocess_ms={:.3} gradient_ms={:.3} total_ms={:.3}",
            image.width(),
            image.height(),
            thresholds.low,
            thresholds.high,
            edges.edge_count(),
            t_pre,
            t_grad - t_pre,
            elapsed_ms
        );

        Ok(EdgeDetection {
            original: image.clone(),
            gray,
            edges,
            thresholds,
            elapsed_ms,
        })
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Detect edges in an image file.
    pub fn run_from_path(
        &self,
        path: impl AsRef<Path>,
        thresholds: ThresholdPair,
    ) -> Result<EdgeDetection> {
        self.config.check_thresholds(thresholds)?;
        let image = load_image(path.as_ref())?;
        self.detect(&image, thresholds)
    }

    /// Detect edges in encoded image bytes (PNG, JPEG, GIF or BMP).
    pub fn run_from_bytes(&self, bytes: &[u8], thresholds: ThresholdPair) -> Result<EdgeDetection> {
        self.config.check_thresholds(thresholds)?;
        let image = decode_image(bytes)?;
        self.detect(&image, thresholds)
    }

    /// Real-time frame path: decode, resize to `width` × `height` and return
    /// the edge map as a 3-channel buffer. No montage, no statistics.
    pub fn run_from_frame(
        &self,
        bytes: &[u8],
        width: usize,
        height: usize,
        thresholds: ThresholdPair,
    ) -> Result<PixelBuffer> {
        self.config.check_thresholds(thresholds)?;
        let frame = decode_frame(bytes, width, height)?;
        Ok(self.detect(&frame, thresholds)?.edges.to_color())
    }

    /// Frame path for raw RGBA samples such as browser canvas data.
    pub fn run_from_rgba(
        &self,
        rgba: &[u8],
        width: usize,
        height: usize,
        thresholds: ThresholdPair,
    ) -> Result<PixelBuffer> {
        self.config.check_thresholds(thresholds)?;
        let frame = PixelBuffer::from_rgba(width, height, rgba)?;
        Ok(self.detect(&frame, thresholds)?.edges.to_color())
    }

    // ========================================================================
    // Presentation
    // ========================================================================

    pub fn compose(&self, detection: &EdgeDetection) -> Result<Montage> {
        montage::compose(
            &detection.original,
            &detection.gray,
            &detection.edges,
            self.config.overlay_alpha,
        )
    }

    pub fn statistics(&self, edges: &EdgeMap) -> EdgeStatistics {
        EdgeStatistics::from_edges(edges)
    }

    /// Detection, montage and statistics for image bytes with no filename,
    /// e.g. content fetched from a URL.
    pub fn process_bytes(&self, bytes: &[u8], thresholds: ThresholdPair) -> Result<ProcessedImage> {
        let detection = self.run_from_bytes(bytes, thresholds)?;
        let montage = self.compose(&detection)?;
        let statistics = self.statistics(&detection.edges);
        debug!(
            "EdgePipeline::process_bytes edge_percentage={:.2} montage={}x{}",
            statistics.edge_percentage,
            montage.dims().0,
            montage.dims().1
        );
        Ok(ProcessedImage {
            detection,
            montage,
            statistics,
        })
    }

    /// Like [`process_bytes`](Self::process_bytes), after checking the
    /// upload's extension and size.
    pub fn process_upload(
        &self,
        filename: &str,
        bytes: &[u8],
        thresholds: ThresholdPair,
    ) -> Result<ProcessedImage> {
        self.config.check_upload(filename, bytes.len())?;
        self.process_bytes(bytes, thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn step_image(width: usize, height: usize, column: usize) -> PixelBuffer {
        let data = (0..height)
            .flat_map(|_| (0..width).flat_map(move |x| [if x < column { 0 } else { 255 }; 3]))
            .collect();
        PixelBuffer::from_raw(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_new_validates_config() {
        let config = PipelineConfig {
            gaussian_kernel_size: 4,
            ..PipelineConfig::default()
        };
        assert!(matches!(EdgePipeline::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_preprocess_shapes() {
        let pipeline = EdgePipeline::default();
        let (gray, smoothed) = pipeline.preprocess(&step_image(12, 7, 6)).unwrap();
        assert_eq!(gray.dims(), (12, 7));
        assert_eq!(gray.channels(), 1);
        assert_eq!(smoothed.dims(), (12, 7));
        assert_eq!(smoothed.channels(), 1);
    }

    #[test]
    fn test_detect_step_line() {
        let pipeline = EdgePipeline::default();
        let detection = pipeline
            .detect(&step_image(100, 20, 50), ThresholdPair::default())
            .unwrap();
        for y in 0..20 {
            for x in 0..100 {
                assert_eq!(detection.edges.is_edge(x, y), x == 50, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_thresholds_checked_before_decoding() {
        let pipeline = EdgePipeline::default();
        let inverted = ThresholdPair { low: 200, high: 100 };
        assert!(matches!(
            pipeline.run_from_bytes(&[], inverted),
            Err(Error::InvalidThreshold { .. })
        ));
        assert!(matches!(
            pipeline.run_from_frame(b"junk", 10, 10, inverted),
            Err(Error::InvalidThreshold { .. })
        ));
        assert!(matches!(
            pipeline.run_from_path("/nonexistent.png", inverted),
            Err(Error::InvalidThreshold { .. })
        ));
        // Out of the configured range
        assert!(matches!(
            pipeline.run_from_bytes(&[], ThresholdPair { low: 100, high: 600 }),
            Err(Error::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_run_from_rgba() {
        let pipeline = EdgePipeline::default();
        let (w, h) = (40, 10);
        let rgba: Vec<u8> = (0..h)
            .flat_map(|_| (0..w).flat_map(|x| if x < 20 { [0, 0, 0, 255] } else { [255, 255, 255, 255] }))
            .collect();
        let edges = pipeline.run_from_rgba(&rgba, w, h, ThresholdPair::default()).unwrap();
        assert_eq!(edges.dims(), (w, h));
        assert_eq!(edges.channels(), 3);
        assert_eq!(edges.get(20, 5, 0), 255);
        assert_eq!(edges.get(10, 5, 0), 0);

        assert!(matches!(
            pipeline.run_from_rgba(&rgba[..10], w, h, ThresholdPair::default()),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_process_upload_rejects_before_decoding() {
        let pipeline = EdgePipeline::default();
        assert!(matches!(
            pipeline.process_upload("notes.txt", b"not checked", ThresholdPair::default()),
            Err(Error::UnsupportedExtension(_))
        ));
        assert!(matches!(
            pipeline.process_upload("photo.png", b"garbage", ThresholdPair::default()),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EdgePipeline>();
    }
}
