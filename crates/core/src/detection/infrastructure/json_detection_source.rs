use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DetectionSourceError {
    #[error("failed to read detections from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse detections in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Replays a fixed list of detections for every frame.
///
/// The JSON document is an array of detections:
///
/// ```json
/// [{ "bbox": [x, y, w, h], "confidence": 0.93,
///    "landmarks": [[x, y], [x, y], [x, y], [x, y], [x, y]] }]
/// ```
///
/// `landmarks` may be omitted. This lets any external detector feed the
/// compositing pipeline through a file.
#[derive(Debug)]
pub struct JsonDetectionSource {
    detections: Vec<Detection>,
}

impl JsonDetectionSource {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn open(path: &Path) -> Result<Self, DetectionSourceError> {
        let json = fs::read_to_string(path).map_err(|source| DetectionSourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let detections =
            serde_json::from_str(&json).map_err(|source| DetectionSourceError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded detections from {}", path.display());
        Ok(Self::new(detections))
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }
}

impl FaceDetector for JsonDetectionSource {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        Ok(self.detections.clone())
    }
}
