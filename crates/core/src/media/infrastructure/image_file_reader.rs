use std::path::Path;

use crate::media::domain::image_reader::ImageReader;
use crate::shared::frame::Frame;

/// Decodes still images with the `image` crate.
///
/// Every format is converted to packed RGB; an alpha channel, if any, is
/// discarded. Frames come back with index 0.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&mut self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)?.into_rgb8();
        let (width, height) = img.dimensions();
        log::debug!("Decoded {} ({width}x{height})", path.display());
        Ok(Frame::new(img.into_raw(), width, height, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_test_image(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("test.png");
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_read_returns_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80);
        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(frame.width(), 100);
        assert_eq!(frame.height(), 80);
        assert_eq!(frame.index(), 0);
    }

    #[test]
    fn test_frame_is_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 10, 10);
        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(frame.pixel(0, 0), [50, 100, 200]);
        assert_eq!(frame.data().len(), 10 * 10 * 3);
    }

    #[test]
    fn test_rgba_input_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        image::RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 4]))
            .save(&path)
            .unwrap();
        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(frame.data().len(), 4 * 4 * 3);
        assert_eq!(frame.pixel(3, 3), [1, 2, 3]);
    }

    #[test]
    fn test_read_nonexistent_errors() {
        let mut reader = ImageFileReader::new();
        assert!(reader.read(Path::new("/nonexistent/test.png")).is_err());
    }
}
