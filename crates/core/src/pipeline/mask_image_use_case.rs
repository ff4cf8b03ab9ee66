use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::media::domain::image_reader::ImageReader;
use crate::media::domain::image_writer::ImageWriter;

use super::frame_processor::FrameProcessor;

/// Single-image privacy pipeline: read → detect → composite → write.
pub struct MaskImageUseCase {
    reader: Box<dyn ImageReader>,
    image_writer: Box<dyn ImageWriter>,
    detector: Box<dyn FaceDetector>,
    processor: FrameProcessor,
}

impl MaskImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        image_writer: Box<dyn ImageWriter>,
        detector: Box<dyn FaceDetector>,
        processor: FrameProcessor,
    ) -> Self {
        Self {
            reader,
            image_writer,
            detector,
            processor,
        }
    }

    /// Reads a single image, applies the active effect to every confident
    /// face and writes the result. Returns the number of faces processed.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let mut frame = self.reader.read(input_path)?;
        let detections = self.detector.detect(&frame)?;
        log::info!(
            "{}: {} detection(s)",
            input_path.display(),
            detections.len()
        );

        let processed = self.processor.process(&mut frame.view_mut(), &detections);
        self.image_writer.write(output_path, &frame)?;
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositing::domain::privacy_effect::PrivacyMode;
    use crate::detection::domain::detection::{Detection, FaceLandmarks};
    use crate::pipeline::frame_processor::EffectParams;
    use crate::shared::frame::Frame;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubImageReader {
        frame: Frame,
    }

    impl ImageReader for StubImageReader {
        fn read(&mut self, _path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            Ok(self.frame.clone())
        }
    }

    struct FailingImageReader;

    impl ImageReader for FailingImageReader {
        fn read(&mut self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            Err(format!("cannot decode {}", path.display()).into())
        }
    }

    struct StubImageWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
    }

    impl StubImageWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    struct StubDetector {
        detections: Vec<Detection>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Ok(self.detections.clone())
        }
    }

    // --- Helpers ---

    fn face(x: f32, y: f32, confidence: f32) -> Detection {
        Detection::new((x, y, 20.0, 20.0), confidence, FaceLandmarks::default())
    }

    fn use_case(
        frame: Frame,
        detections: Vec<Detection>,
        mode: PrivacyMode,
    ) -> (MaskImageUseCase, Arc<Mutex<Vec<(PathBuf, Frame)>>>) {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let uc = MaskImageUseCase::new(
            Box::new(StubImageReader { frame }),
            Box::new(writer),
            Box::new(StubDetector { detections }),
            FrameProcessor::cpu(mode, EffectParams::default()),
        );
        (uc, written)
    }

    // --- Tests ---

    #[test]
    fn test_writes_processed_frame_to_output_path() {
        let (mut uc, written) = use_case(
            Frame::filled(100, 100, [0, 0, 0]),
            vec![face(10.0, 10.0, 0.9)],
            PrivacyMode::Occlude,
        );
        let n = uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap();

        assert_eq!(n, 1);
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("out.png"));
        assert_eq!(written[0].1.width(), 100);
        assert_eq!(written[0].1.height(), 100);
    }

    #[test]
    fn test_pixelate_changes_only_face_pixels() {
        let mut frame = Frame::filled(60, 60, [100, 100, 100]);
        // checkerboard inside the face so pixelation has something to average
        for y in 10..30u32 {
            for x in 10..30u32 {
                let v = if (x + y) % 2 == 0 { 0 } else { 200 };
                let i = ((y * 60 + x) * 3) as usize;
                frame.data_mut()[i..i + 3].copy_from_slice(&[v, v, v]);
            }
        }
        let (mut uc, written) = use_case(frame, vec![face(10.0, 10.0, 0.9)], PrivacyMode::Pixelate);
        uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap();

        let out = &written.lock().unwrap()[0].1;
        assert_eq!(out.pixel(15, 15), [100, 100, 100]);
        assert_eq!(out.pixel(5, 5), [100, 100, 100]);
        assert_eq!(out.pixel(40, 40), [100, 100, 100]);
    }

    #[test]
    fn test_no_faces_still_writes_image() {
        let (mut uc, written) = use_case(
            Frame::filled(30, 30, [1, 2, 3]),
            vec![],
            PrivacyMode::Blur,
        );
        assert_eq!(uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap(), 0);
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].1.data().chunks(3).all(|p| p == [1, 2, 3]));
    }

    #[test]
    fn test_low_confidence_faces_not_counted() {
        let (mut uc, _) = use_case(
            Frame::filled(100, 100, [0, 0, 0]),
            vec![face(10.0, 10.0, 0.3), face(50.0, 50.0, 0.95)],
            PrivacyMode::Blur,
        );
        assert_eq!(uc.execute(Path::new("in.png"), Path::new("out.png")).unwrap(), 1);
    }

    #[test]
    fn test_reader_error_propagates_without_writing() {
        let writer = StubImageWriter::new();
        let written = writer.written.clone();
        let mut uc = MaskImageUseCase::new(
            Box::new(FailingImageReader),
            Box::new(writer),
            Box::new(StubDetector { detections: vec![] }),
            FrameProcessor::cpu(PrivacyMode::Blur, EffectParams::default()),
        );

        let err = uc.execute(Path::new("broken.png"), Path::new("out.png")).unwrap_err();
        assert!(err.to_string().contains("broken.png"));
        assert!(written.lock().unwrap().is_empty());
    }
}
