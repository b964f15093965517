use std::io::Cursor;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use image::{codecs::jpeg::JpegEncoder, DynamicImage};

/// Minimum spacing between accepted shutter callbacks.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);
/// Longer image side after normalization.
pub const MAX_DIMENSION: u32 = 900;
/// Fixed medium-low JPEG quality for feed-friendly payloads.
const JPEG_QUALITY: u8 = 50;

/// Debounce guard over raw capture events.
///
/// Duplicate hardware callbacks inside the window are rejected without
/// touching the guard timestamp, so the window is always measured from the
/// last *accepted* event.
#[derive(Debug, Default)]
pub struct PhotoIntake {
    last_accepted: Option<Instant>,
}

impl PhotoIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, at: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if at.saturating_duration_since(last) < DEBOUNCE_WINDOW {
                return false;
            }
        }
        self.last_accepted = Some(at);
        true
    }
}

/// Downscales so the longer side fits [`MAX_DIMENSION`] (untouched if already
/// smaller, aspect ratio preserved) and re-encodes as JPEG at fixed quality.
pub fn normalize_photo(raw: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(raw).context("failed to decode captured photo")?;

    let longer_side = decoded.width().max(decoded.height());
    let resized = if longer_side > MAX_DIMENSION {
        decoded.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        decoded
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
        .context("failed to encode normalized photo")?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([64, 128, 192]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_debounce_rejects_rapid_duplicates() {
        let base = Instant::now();
        let mut intake = PhotoIntake::new();

        assert!(intake.accept(base));
        assert!(!intake.accept(base + Duration::from_millis(100)));
        assert!(intake.accept(base + Duration::from_millis(300)));
    }

    #[test]
    fn test_rejected_event_does_not_extend_window() {
        let base = Instant::now();
        let mut intake = PhotoIntake::new();

        assert!(intake.accept(base));
        assert!(!intake.accept(base + Duration::from_millis(200)));
        // 420ms after the accepted event, only 220ms after the rejected one.
        assert!(intake.accept(base + Duration::from_millis(420)));
    }

    #[test]
    fn test_normalize_downscales_large_photo() {
        let out = normalize_photo(&encode_png(1200, 800)).unwrap();

        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Jpeg);
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (900, 600));
    }

    #[test]
    fn test_normalize_keeps_small_photo_dimensions() {
        let out = normalize_photo(&encode_png(320, 240)).unwrap();

        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));
    }

    #[test]
    fn test_normalize_rejects_undecodable_bytes() {
        assert!(normalize_photo(b"not an image").is_err());
    }
}
