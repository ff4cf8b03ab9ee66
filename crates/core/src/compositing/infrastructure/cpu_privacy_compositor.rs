use std::cell::RefCell;

use ndarray::{s, Axis};

use crate::compositing::domain::frame_compositor::FrameCompositor;
use crate::compositing::domain::occlusion_image::OcclusionImage;
use crate::compositing::domain::privacy_effect::PrivacyEffect;
use crate::shared::frame::{FrameView, FRAME_CHANNELS};
use crate::shared::rect::Rect;

use super::{gaussian, resample};

/// CPU implementation of every privacy effect.
///
/// Each effect copies the face region into a reusable scratch buffer,
/// transforms it there, and writes it back, so pixels outside the region
/// are never touched. Scratch buffers live in `RefCell`s: one compositor
/// serves one frame at a time.
pub struct CpuPrivacyCompositor {
    roi_buf: RefCell<Vec<u8>>,
    blur_temp: RefCell<Vec<f32>>,
    /// Last kernel built; its length is its size.
    kernel: RefCell<Vec<f32>>,
}

impl CpuPrivacyCompositor {
    pub fn new() -> Self {
        Self {
            roi_buf: RefCell::new(Vec::new()),
            blur_temp: RefCell::new(Vec::new()),
            kernel: RefCell::new(Vec::new()),
        }
    }

    /// Gaussian blur of `kernel_size × kernel_size` over the clamped region.
    ///
    /// Even sizes round up to the next odd size; zero acts as 1. Sizes above
    /// [`gaussian::MAX_KERNEL_SIZE`] are capped to it.
    pub fn apply_blur(&self, frame: &mut FrameView<'_>, rect: Rect, kernel_size: usize) {
        let r = rect.clamp_to(frame.bounds());
        if r.is_empty() {
            return;
        }
        let (w, h) = (r.width as usize, r.height as usize);
        let size = gaussian::odd_kernel_size(kernel_size);
        let mut kernel = self.kernel.borrow_mut();
        if kernel.len() != size {
            *kernel = gaussian::gaussian_kernel_1d(size);
        }

        let mut roi = self.roi_buf.borrow_mut();
        read_region(frame, r, &mut roi);
        gaussian::separable_gaussian_blur_with_kernel(
            &mut roi,
            w,
            h,
            FRAME_CHANNELS,
            &kernel,
            &mut self.blur_temp.borrow_mut(),
        );
        write_region(frame, r, &roi);
    }

    /// Mosaic: area-average down to blocks of roughly `pixel_size`, then
    /// nearest-neighbour back up so block edges stay hard.
    pub fn apply_pixelate(&self, frame: &mut FrameView<'_>, rect: Rect, pixel_size: usize) {
        let r = rect.clamp_to(frame.bounds());
        if r.is_empty() {
            return;
        }
        let (w, h) = (r.width as usize, r.height as usize);
        let pixel_size = pixel_size.max(1);
        let grid_w = (w / pixel_size).max(1);
        let grid_h = (h / pixel_size).max(1);

        let mut roi = self.roi_buf.borrow_mut();
        read_region(frame, r, &mut roi);
        let small = resample::resize_area(&roi, w, h, FRAME_CHANNELS, grid_w, grid_h);
        let mosaic = resample::resize_nearest(&small, grid_w, grid_h, FRAME_CHANNELS, w, h);
        write_region(frame, r, &mosaic);
    }

    /// Covers the region with `image` resized to fit, or with a black bar
    /// over the eyes when no usable image is available.
    pub fn apply_occlusion(
        &self,
        frame: &mut FrameView<'_>,
        rect: Rect,
        image: Option<&OcclusionImage>,
    ) {
        let r = rect.intersect_bounds(frame.bounds());
        if r.is_empty() {
            return;
        }

        let image = match image {
            Some(img) if img.is_empty() => {
                log::warn!("Occlusion image has no pixels, drawing black bar instead");
                None
            }
            Some(img) if img.channels() != 3 && img.channels() != 4 => {
                log::warn!(
                    "Occlusion image has {} channels (expected 3 or 4), drawing black bar instead",
                    img.channels()
                );
                None
            }
            other => other,
        };

        let Some(img) = image else {
            fill_black_bar(frame, r);
            return;
        };

        let (w, h) = (r.width as usize, r.height as usize);
        let channels = img.channels() as usize;
        let resized = resample::resize_area(
            img.data(),
            img.width() as usize,
            img.height() as usize,
            channels,
            w,
            h,
        );

        if img.has_alpha() {
            blend_region(frame, r, &resized);
        } else {
            write_region(frame, r, &resized);
        }
    }
}

impl Default for CpuPrivacyCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCompositor for CpuPrivacyCompositor {
    fn apply(&self, frame: &mut FrameView<'_>, rect: Rect, effect: &PrivacyEffect<'_>) {
        match *effect {
            PrivacyEffect::None => {}
            PrivacyEffect::Blur { kernel_size } => self.apply_blur(frame, rect, kernel_size),
            PrivacyEffect::Pixelate { pixel_size } => self.apply_pixelate(frame, rect, pixel_size),
            PrivacyEffect::Occlude { image } => self.apply_occlusion(frame, rect, image),
        }
    }
}

/// "Over" composite of one channel: `dst * (1 - a) + src * a` with
/// `a = alpha / 255`, rounded to nearest.
///
/// 255 is odd, so the exact quotient is never halfway between integers
/// and adding 127 before dividing rounds correctly.
pub fn blend_channel(dst: u8, src: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((dst as u32 * (255 - a) + src as u32 * a + 127) / 255) as u8
}

/// Region bounds as slice ranges. `r` must already be clamped.
fn spans(r: Rect) -> (usize, usize, usize, usize) {
    let x = r.x as usize;
    let y = r.y as usize;
    (x, y, x + r.width as usize, y + r.height as usize)
}

/// Copies the region into `out` as packed `w × h × 3` bytes.
fn read_region(frame: &mut FrameView<'_>, r: Rect, out: &mut Vec<u8>) {
    let (x0, y0, x1, y1) = spans(r);
    let arr = frame.as_ndarray_mut();
    let region = arr.slice(s![y0..y1, x0..x1, ..]);
    out.clear();
    out.extend(region.iter().copied());
}

fn write_region(frame: &mut FrameView<'_>, r: Rect, src: &[u8]) {
    let (x0, y0, x1, y1) = spans(r);
    let mut arr = frame.as_ndarray_mut();
    let mut region = arr.slice_mut(s![y0..y1, x0..x1, ..]);
    for (dst, &v) in region.iter_mut().zip(src) {
        *dst = v;
    }
}

/// Alpha-composites packed RGBA `src` over the region.
fn blend_region(frame: &mut FrameView<'_>, r: Rect, src: &[u8]) {
    let (x0, y0, x1, y1) = spans(r);
    let mut arr = frame.as_ndarray_mut();
    let mut region = arr.slice_mut(s![y0..y1, x0..x1, ..]);
    for (mut px, overlay) in region
        .lanes_mut(Axis(2))
        .into_iter()
        .zip(src.chunks_exact(4))
    {
        let alpha = overlay[3];
        for c in 0..FRAME_CHANNELS {
            px[c] = blend_channel(px[c], overlay[c], alpha);
        }
    }
}

/// Solid black bar across the full width, from a third of the way down,
/// one fifth of the region tall.
fn fill_black_bar(frame: &mut FrameView<'_>, r: Rect) {
    let bar = Rect::new(r.x, r.y + r.height / 3, r.width, r.height / 5);
    if bar.is_empty() {
        return;
    }
    let (x0, y0, x1, y1) = spans(bar);
    frame
        .as_ndarray_mut()
        .slice_mut(s![y0..y1, x0..x1, ..])
        .fill(0);
}
