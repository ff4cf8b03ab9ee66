use serde::{Deserialize, Serialize};

use crate::shared::rect::Rect;

/// Number of landmark points every detection carries.
pub const NUM_LANDMARKS: usize = 5;

/// Five facial landmarks in frame coordinates, in detector order:
/// right eye, left eye, nose tip, right mouth corner, left mouth corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    points: [(f32, f32); NUM_LANDMARKS],
}

impl FaceLandmarks {
    pub fn new(points: [(f32, f32); NUM_LANDMARKS]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f32, f32); NUM_LANDMARKS] {
        &self.points
    }

    /// Points truncated to integer pixel coordinates.
    pub fn pixel_points(&self) -> [(i32, i32); NUM_LANDMARKS] {
        self.points.map(|(x, y)| (x as i32, y as i32))
    }
}

/// One located face as reported by a detector.
///
/// `bbox` is `(x, y, width, height)` in frame pixels, possibly fractional
/// and possibly extending past the frame edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: (f32, f32, f32, f32),
    pub confidence: f32,
    #[serde(default)]
    pub landmarks: FaceLandmarks,
}

impl Detection {
    pub fn new(bbox: (f32, f32, f32, f32), confidence: f32, landmarks: FaceLandmarks) -> Self {
        Self {
            bbox,
            confidence,
            landmarks,
        }
    }

    /// Integer face rectangle; each component truncates toward zero.
    pub fn to_rect(&self) -> Rect {
        let (x, y, w, h) = self.bbox;
        Rect::new(x as i32, y as i32, w as i32, h as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_rect_truncates_toward_zero() {
        let d = Detection::new((10.9, -3.7, 40.2, 50.99), 0.9, FaceLandmarks::default());
        assert_eq!(d.to_rect(), Rect::new(10, -3, 40, 50));
    }

    #[test]
    fn test_pixel_points_truncate() {
        let lm = FaceLandmarks::new([
            (1.9, 2.1),
            (3.5, 4.5),
            (5.0, 6.0),
            (7.7, 8.8),
            (9.2, 10.6),
        ]);
        assert_eq!(
            lm.pixel_points(),
            [(1, 2), (3, 4), (5, 6), (7, 8), (9, 10)]
        );
    }

    #[test]
    fn test_deserialize_without_landmarks_defaults_to_zero() {
        let json = r#"{"bbox": [1.0, 2.0, 3.0, 4.0], "confidence": 0.75}"#;
        let d: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(d.bbox, (1.0, 2.0, 3.0, 4.0));
        assert_eq!(d.landmarks, FaceLandmarks::default());
    }

    #[test]
    fn test_deserialize_with_landmarks() {
        let json = r#"{
            "bbox": [0, 0, 10, 10],
            "confidence": 1.0,
            "landmarks": [[1, 1], [2, 2], [3, 3], [4, 4], [5, 5]]
        }"#;
        let d: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(d.landmarks.points()[4], (5.0, 5.0));
    }
}
