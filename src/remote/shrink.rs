//! Downscale large photos before upload
//!
//! Images that fit inside the shrink box, and formats the `image` crate
//! cannot decode (HEIC/HEIF), are uploaded untouched.

use image::{imageops::FilterType, ImageFormat};
use std::io::Cursor;

use crate::error::Result;

/// Shrink `bytes` to fit inside `max_width` x `max_height`, keeping the
/// aspect ratio and the original encoding. Returns the input unchanged when
/// no resize is needed or the format is unknown.
pub fn shrink_to_fit(bytes: Vec<u8>, max_width: u32, max_height: u32) -> Result<Vec<u8>> {
    let format = match image::guess_format(&bytes) {
        Ok(format) if is_reencodable(format) => format,
        _ => return Ok(bytes),
    };

    let img = image::load_from_memory_with_format(&bytes, format)?;

    if img.width() <= max_width && img.height() <= max_height {
        return Ok(bytes);
    }

    let resized = img.resize(max_width, max_height, FilterType::Lanczos3);
    log::debug!(
        "Shrunk {}x{} -> {}x{}",
        img.width(),
        img.height(),
        resized.width(),
        resized.height()
    );

    // JPEG has no alpha channel
    let resized = if format == ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(resized.into_rgb8())
    } else {
        resized
    };

    let mut out = Cursor::new(Vec::with_capacity(bytes.len() / 2));
    resized.write_to(&mut out, format)?;
    Ok(out.into_inner())
}

/// Async wrapper, decoding is CPU-bound
pub async fn shrink_async(bytes: Vec<u8>, max_width: u32, max_height: u32) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || shrink_to_fit(bytes, max_width, max_height)).await?
}

fn is_reencodable(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp | ImageFormat::Tiff
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_small_image_untouched() {
        let bytes = encoded(64, 48, ImageFormat::Png);
        let result = shrink_to_fit(bytes.clone(), 1024, 1024).unwrap();
        assert_eq!(result, bytes);
    }

    #[test]
    fn test_large_png_shrinks_keeping_aspect() {
        let bytes = encoded(400, 200, ImageFormat::Png);
        let result = shrink_to_fit(bytes, 100, 100).unwrap();

        assert_eq!(image::guess_format(&result).unwrap(), ImageFormat::Png);
        let img = image::load_from_memory(&result).unwrap();
        assert_eq!(img.dimensions(), (100, 50));
    }

    #[test]
    fn test_large_jpeg_stays_jpeg() {
        let bytes = encoded(300, 300, ImageFormat::Jpeg);
        let result = shrink_to_fit(bytes, 150, 150).unwrap();

        assert_eq!(image::guess_format(&result).unwrap(), ImageFormat::Jpeg);
        let img = image::load_from_memory(&result).unwrap();
        assert_eq!(img.dimensions(), (150, 150));
    }

    #[test]
    fn test_unknown_bytes_passed_through() {
        let bytes = b"not an image at all".to_vec();
        let result = shrink_to_fit(bytes.clone(), 10, 10).unwrap();
        assert_eq!(result, bytes);
    }

    #[tokio::test]
    async fn test_shrink_async() {
        let bytes = encoded(50, 50, ImageFormat::Png);
        let result = shrink_async(bytes, 25, 25).await.unwrap();
        let img = image::load_from_memory(&result).unwrap();
        assert_eq!(img.dimensions(), (25, 25));
    }
}
