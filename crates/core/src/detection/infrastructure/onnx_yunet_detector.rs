/// YuNet face detector using ONNX Runtime via `ort`.
///
/// Pads the frame to a multiple of the largest feature stride, runs the
/// model at the padded resolution, decodes the three anchor-free heads and
/// filters the result with greedy NMS.
use std::path::Path;

use ndarray::Array4;

use crate::detection::domain::detection::{Detection, FaceLandmarks, NUM_LANDMARKS};
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::DEFAULT_MIN_CONFIDENCE;
use crate::shared::frame::{Frame, FRAME_CHANNELS};

/// Feature map strides of the three detection heads.
const STRIDES: [usize; 3] = [8, 16, 32];

/// Input dimensions must be a multiple of the coarsest stride.
const PAD_MULTIPLE: usize = 32;

/// NMS IoU threshold.
pub const DEFAULT_NMS_THRESHOLD: f32 = 0.3;

/// Candidates kept (by score) before NMS.
pub const DEFAULT_TOP_K: usize = 5000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YunetConfig {
    pub score_threshold: f32,
    pub nms_threshold: f32,
    pub top_k: usize,
    /// Set when frames arrive as RGB; the model was trained on BGR.
    pub input_is_rgb: bool,
}

impl Default for YunetConfig {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_MIN_CONFIDENCE,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            input_is_rgb: true,
        }
    }
}

/// YuNet face detector backed by an ONNX Runtime session.
pub struct OnnxYunetDetector {
    session: ort::session::Session,
    config: YunetConfig,
}

impl OnnxYunetDetector {
    /// Load a YuNet ONNX model. Load failures are returned, never retried.
    pub fn new(model_path: &Path, config: YunetConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;
        log::info!("Loaded YuNet model from {}", model_path.display());
        Ok(Self { session, config })
    }
}

impl FaceDetector for OnnxYunetDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        // 1. Preprocess: pad + BGR → NCHW float32 in 0..255
        let input_tensor = preprocess(frame, self.config.input_is_rgb);
        let padded_h = input_tensor.shape()[2];
        let padded_w = input_tensor.shape()[3];

        // 2. Inference
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // 3. Decode every head
        let mut candidates = Vec::new();
        for stride in STRIDES {
            let fetch = |head: &str| -> Result<Vec<f32>, Box<dyn std::error::Error>> {
                let name = format!("{head}_{stride}");
                let value = outputs
                    .get(name.as_str())
                    .ok_or_else(|| format!("YuNet model has no output named {name}"))?;
                let tensor = value.try_extract_array::<f32>()?;
                Ok(tensor.iter().copied().collect())
            };
            let heads = HeadOutputs {
                cls: fetch("cls")?,
                obj: fetch("obj")?,
                bbox: fetch("bbox")?,
                kps: fetch("kps")?,
            };
            let grid = Grid {
                rows: padded_h / stride,
                cols: padded_w / stride,
                stride,
            };
            decode_head(&heads, grid, self.config.score_threshold, &mut candidates)?;
        }

        // 4. NMS
        let kept = nms(candidates, self.config.nms_threshold, self.config.top_k);
        log::trace!(
            "YuNet frame {}: {} face(s) after NMS",
            frame.index(),
            kept.len()
        );
        Ok(kept)
    }
}

/// Return the preferred ONNX execution providers for the current platform.
///
/// ONNX Runtime falls back to CPU when none of them is available.
fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

fn padded_len(len: usize) -> usize {
    len.div_ceil(PAD_MULTIPLE) * PAD_MULTIPLE
}

/// Copy a frame into a zero-padded `[1, 3, H', W']` BGR tensor, where `H'`
/// and `W'` are the frame dimensions rounded up to a multiple of 32.
fn preprocess(frame: &Frame, input_is_rgb: bool) -> Array4<f32> {
    let w = frame.width() as usize;
    let h = frame.height() as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, padded_len(h), padded_len(w)));

    let src = frame.as_ndarray(); // [H, W, C] u8
    for y in 0..h {
        for x in 0..w {
            for c in 0..FRAME_CHANNELS {
                let src_c = if input_is_rgb { 2 - c } else { c };
                tensor[[0, c, y, x]] = src[[y, x, src_c]] as f32;
            }
        }
    }
    tensor
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Flattened outputs of one detection head, one anchor per grid cell.
struct HeadOutputs {
    cls: Vec<f32>,
    obj: Vec<f32>,
    bbox: Vec<f32>,
    kps: Vec<f32>,
}

#[derive(Clone, Copy, Debug)]
struct Grid {
    rows: usize,
    cols: usize,
    stride: usize,
}

/// Decode one head into detections scoring at least `score_threshold`.
fn decode_head(
    heads: &HeadOutputs,
    grid: Grid,
    score_threshold: f32,
    out: &mut Vec<Detection>,
) -> Result<(), String> {
    let cells = grid.rows * grid.cols;
    if heads.cls.len() < cells
        || heads.obj.len() < cells
        || heads.bbox.len() < cells * 4
        || heads.kps.len() < cells * NUM_LANDMARKS * 2
    {
        return Err(format!(
            "YuNet stride {} output is smaller than its {}x{} grid",
            grid.stride, grid.cols, grid.rows
        ));
    }

    let s = grid.stride as f32;
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let idx = row * grid.cols + col;
            let cls = heads.cls[idx].clamp(0.0, 1.0);
            let obj = heads.obj[idx].clamp(0.0, 1.0);
            let score = (cls * obj).sqrt();
            if score < score_threshold {
                continue;
            }

            let b = &heads.bbox[idx * 4..idx * 4 + 4];
            let cx = (col as f32 + b[0]) * s;
            let cy = (row as f32 + b[1]) * s;
            let w = b[2].exp() * s;
            let h = b[3].exp() * s;

            let k = &heads.kps[idx * NUM_LANDMARKS * 2..(idx + 1) * NUM_LANDMARKS * 2];
            let mut points = [(0.0f32, 0.0f32); NUM_LANDMARKS];
            for (n, p) in points.iter_mut().enumerate() {
                *p = ((k[2 * n] + col as f32) * s, (k[2 * n + 1] + row as f32) * s);
            }

            out.push(Detection::new(
                (cx - w / 2.0, cy - h / 2.0, w, h),
                score,
                FaceLandmarks::new(points),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

/// Greedy NMS: sort by confidence descending, keep at most `top_k`
/// candidates, suppress any box overlapping a kept one by more than
/// `iou_thresh`.
fn nms(mut dets: Vec<Detection>, iou_thresh: f32, top_k: usize) -> Vec<Detection> {
    dets.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    dets.truncate(top_k);

    let mut keep: Vec<Detection> = Vec::new();
    for det in dets {
        if keep.iter().all(|k| bbox_iou(&k.bbox, &det.bbox) <= iou_thresh) {
            keep.push(det);
        }
    }
    keep
}

/// IoU between two `(x, y, w, h)` boxes.
fn bbox_iou(a: &(f32, f32, f32, f32), b: &(f32, f32, f32, f32)) -> f32 {
    let x1 = a.0.max(b.0);
    let y1 = a.1.max(b.1);
    let x2 = (a.0 + a.2).min(b.0 + b.2);
    let y2 = (a.1 + a.3).min(b.1 + b.3);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    inter / (a.2 * a.3 + b.2 * b.3 - inter)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
