use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OcclusionImageError {
    #[error("occlusion image buffer holds {len} bytes, expected {expected} for {width}x{height}x{channels}")]
    LengthMismatch {
        len: usize,
        expected: usize,
        width: u32,
        height: u32,
        channels: u8,
    },
}

/// Immutable overlay art drawn over faces in occlusion mode.
///
/// Three channels are opaque; a fourth channel is per-pixel alpha
/// (0 transparent, 255 opaque). Any other channel count is accepted here
/// and handled by the compositor's fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcclusionImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl OcclusionImage {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<Self, OcclusionImageError> {
        let expected = (width as usize) * (height as usize) * (channels as usize);
        if data.len() != expected {
            return Err(OcclusionImageError::LengthMismatch {
                len: data.len(),
                expected,
                width,
                height,
                channels,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Keeps the alpha channel when the decoded image has one.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        if img.color().has_alpha() {
            Self {
                data: img.into_rgba8().into_raw(),
                width,
                height,
                channels: 4,
            }
        } else {
            Self {
                data: img.into_rgb8().into_raw(),
                width,
                height,
                channels: 3,
            }
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
