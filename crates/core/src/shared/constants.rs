/// Gaussian kernel edge length used when no override is supplied.
pub const DEFAULT_KERNEL_SIZE: usize = 35;

/// Mosaic block edge length used when no override is supplied.
pub const DEFAULT_PIXEL_SIZE: usize = 20;

/// Occlusion art is drawn over a box this much larger than the face.
pub const DEFAULT_OCCLUSION_SCALE: f32 = 1.5;

/// Detections below this confidence are left untouched.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.6;

pub const YUNET_MODEL_NAME: &str = "face_detection_yunet_2023mar.onnx";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
