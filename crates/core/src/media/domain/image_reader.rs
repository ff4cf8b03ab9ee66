use std::path::Path;

use crate::shared::frame::Frame;

/// Decodes a single still image into a 3-channel frame.
pub trait ImageReader: Send {
    fn read(&mut self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>>;
}
