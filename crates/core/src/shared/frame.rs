use ndarray::{ArrayView3, ArrayViewMut3, ShapeBuilder};
use thiserror::Error;

use super::rect::FrameBounds;

/// Samples per pixel in every frame the compositor touches.
pub const FRAME_CHANNELS: usize = 3;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("row stride {stride} is smaller than one row of pixels ({row_bytes} bytes)")]
    StrideTooSmall { stride: usize, row_bytes: usize },
    #[error("frame buffer holds {len} bytes but {required} are required")]
    BufferTooSmall { len: usize, required: usize },
}

/// A single owned frame: contiguous 3-channel bytes in row-major order.
///
/// Channel order is whatever the I/O boundary produced (RGB from the
/// `image` crate, BGR from a capture device); effects never reorder it.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * FRAME_CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// A frame filled with one colour.
    pub fn filled(width: u32, height: u32, pixel: [u8; 3]) -> Self {
        let data = pixel.repeat((width as usize) * (height as usize));
        Self::new(data, width, height, 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bounds(&self) -> FrameBounds {
        FrameBounds::new(self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width as usize) + x as usize) * FRAME_CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Borrows the frame as a tightly packed mutable view.
    pub fn view_mut(&mut self) -> FrameView<'_> {
        let stride = self.width as usize * FRAME_CHANNELS;
        FrameView {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            stride,
        }
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, FRAME_CHANNELS)
    }
}

/// Borrowed, mutable view over caller-owned pixel memory.
///
/// Rows may be padded: `stride` is the byte distance between the starts of
/// consecutive rows and is at least `width * 3`. Padding bytes are never
/// read or written.
#[derive(Debug)]
pub struct FrameView<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> FrameView<'a> {
    pub fn new(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> Result<Self, FrameError> {
        let row_bytes = width as usize * FRAME_CHANNELS;
        if stride < row_bytes {
            return Err(FrameError::StrideTooSmall { stride, row_bytes });
        }
        let required = if width == 0 || height == 0 {
            0
        } else {
            stride * (height as usize - 1) + row_bytes
        };
        if data.len() < required {
            return Err(FrameError::BufferTooSmall {
                len: data.len(),
                required,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bounds(&self) -> FrameBounds {
        FrameBounds::new(self.width, self.height)
    }

    /// `[row, col, channel]` view honouring the row stride.
    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        if self.width == 0 || self.height == 0 {
            let shape = (self.height as usize, self.width as usize, FRAME_CHANNELS);
            return ArrayViewMut3::from_shape(shape, &mut self.data[..0])
                .expect("zero-sized shape fits an empty slice");
        }
        let shape = (self.height as usize, self.width as usize, FRAME_CHANNELS)
            .strides((self.stride, FRAME_CHANNELS, 1));
        ArrayViewMut3::from_shape(shape, &mut *self.data)
            .expect("FrameView buffer was validated at construction")
    }
}
