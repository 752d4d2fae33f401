//! Image decoding and encoding.
//!
//! - `decode_image`: sniff PNG/JPEG/GIF/BMP bytes and decode to RGB.
//! - `decode_frame`: decode, then area-resize to the requested frame size.
//! - `load_image`: read a file from disk and decode it.
//! - `encode_png`: encode a 1- or 3-channel buffer as PNG bytes.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::filters::resize::resize_area_u8;

/// Formats accepted by the decoder.
pub const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
];

/// Decode an encoded raster image into a 3-channel RGB buffer.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer> {
    if bytes.is_empty() {
        return Err(Error::Decode("input is empty".to_string()));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| Error::Decode("unrecognized image format".to_string()))?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(Error::Decode(format!("unsupported image format {format:?}")));
    }

    let rgb = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| Error::Decode(e.to_string()))?
        .into_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    PixelBuffer::from_raw(width, height, 3, rgb.into_raw())
}

/// Decode a video frame and resize it to exactly `width` × `height`.
pub fn decode_frame(bytes: &[u8], width: usize, height: usize) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(Error::Decode(format!(
            "target frame size {width}x{height} must be non-zero"
        )));
    }

    let frame = decode_image(bytes)?;
    if frame.dims() == (width, height) {
        return Ok(frame);
    }
    PixelBuffer::from_array(resize_area_u8(frame.view(), width, height))
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let bytes = fs::read(path)?;
    decode_image(&bytes).map_err(|e| match e {
        Error::Decode(msg) => Error::Decode(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Encode a buffer as PNG. Gray buffers become 8-bit grayscale PNGs.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let (width, height) = (buffer.width() as u32, buffer.height() as u32);
    let channels = buffer.channels();
    let raw = buffer.clone().into_raw();

    let image = if channels == 1 {
        GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8)
    } else {
        RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8)
    }
    .ok_or_else(|| Error::Encode("failed to create image buffer".to_string()))?;

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_as(buffer: &PixelBuffer, format: ImageFormat) -> Vec<u8> {
        let rgb = RgbImage::from_raw(
            buffer.width() as u32,
            buffer.height() as u32,
            buffer.clone().into_raw(),
        )
        .unwrap();
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    fn gradient_rgb(width: usize, height: usize) -> PixelBuffer {
        let data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        PixelBuffer::from_raw(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(decode_image(&[]), Err(Error::Decode(_))));
    }

    #[test]
    fn test_garbage_input() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_truncated_png() {
        let bytes = encode_png(&gradient_rgb(8, 8)).unwrap();
        assert!(matches!(decode_image(&bytes[..20]), Err(Error::Decode(_))));
    }

    #[test]
    fn test_png_lossless_roundtrip() {
        let original = gradient_rgb(7, 5);
        let decoded = decode_image(&encode_png(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_gray_png_decodes_to_rgb() {
        let gray = PixelBuffer::from_raw(2, 1, 1, vec![10, 240]).unwrap();
        let decoded = decode_image(&encode_png(&gray).unwrap()).unwrap();
        assert_eq!(decoded.channels(), 3);
        assert_eq!(decoded.into_raw(), vec![10, 10, 10, 240, 240, 240]);
    }

    #[test]
    fn test_bmp_and_jpeg_decode() {
        let original = gradient_rgb(16, 8);
        let bmp = decode_image(&encode_as(&original, ImageFormat::Bmp)).unwrap();
        assert_eq!(bmp, original);

        let jpeg = decode_image(&encode_as(&original, ImageFormat::Jpeg)).unwrap();
        assert_eq!(jpeg.dims(), (16, 8));
    }

    #[test]
    fn test_frame_resized_to_target() {
        let bytes = encode_png(&gradient_rgb(40, 30)).unwrap();
        let frame = decode_frame(&bytes, 20, 10).unwrap();
        assert_eq!(frame.dims(), (20, 10));
        assert_eq!(frame.channels(), 3);
    }

    #[test]
    fn test_frame_zero_target() {
        let bytes = encode_png(&gradient_rgb(4, 4)).unwrap();
        assert!(matches!(decode_frame(&bytes, 0, 4), Err(Error::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_image(Path::new("/nonexistent/edgestag/input.png"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
