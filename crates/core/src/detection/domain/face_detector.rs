use crate::shared::frame::Frame;

use super::detection::Detection;

/// Domain interface for face detection.
///
/// Implementations may be stateful (e.g. caching input geometry across
/// frames), hence `&mut self`. Results are ordered as the detector
/// produced them.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
