pub mod json_detection_source;
pub mod onnx_yunet_detector;
