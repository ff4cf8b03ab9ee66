//! Debug overlay drawn on top of processed faces: the detection box and the
//! five landmark dots.
//!
//! The box is drawn after the effect together with the dots, rather than
//! before it, so it stays visible over blurred or occluded faces.

use crate::detection::domain::detection::{Detection, NUM_LANDMARKS};
use crate::shared::frame::FrameView;
use crate::shared::rect::Rect;

pub const BOX_COLOR: [u8; 3] = [0, 255, 0];
pub const BOX_THICKNESS: i32 = 2;
pub const LANDMARK_RADIUS: i32 = 3;

/// RGB colours for right eye, left eye, nose tip, right and left mouth corner.
pub const LANDMARK_COLORS: [[u8; 3]; NUM_LANDMARKS] = [
    [0, 0, 255],
    [255, 0, 0],
    [0, 255, 0],
    [255, 0, 255],
    [255, 255, 0],
];

pub fn annotate_detection(frame: &mut FrameView<'_>, det: &Detection) {
    draw_rect_outline(frame, det.to_rect(), BOX_COLOR, BOX_THICKNESS);
    for (&(x, y), color) in det.landmarks.pixel_points().iter().zip(LANDMARK_COLORS) {
        fill_circle(frame, x, y, LANDMARK_RADIUS, color);
    }
}

/// Outline drawn inside `rect`, `thickness` pixels wide, clipped to the frame.
pub fn draw_rect_outline(frame: &mut FrameView<'_>, rect: Rect, color: [u8; 3], thickness: i32) {
    if rect.is_empty() || thickness <= 0 {
        return;
    }
    let t_w = thickness.min(rect.width);
    let t_h = thickness.min(rect.height);
    let right = rect.x.saturating_add(rect.width - t_w);
    let bottom = rect.y.saturating_add(rect.height - t_h);

    fill_rect(frame, Rect::new(rect.x, rect.y, rect.width, t_h), color);
    fill_rect(frame, Rect::new(rect.x, bottom, rect.width, t_h), color);
    fill_rect(frame, Rect::new(rect.x, rect.y, t_w, rect.height), color);
    fill_rect(frame, Rect::new(right, rect.y, t_w, rect.height), color);
}

/// Filled disc of every pixel within `radius` of the centre.
pub fn fill_circle(frame: &mut FrameView<'_>, cx: i32, cy: i32, radius: i32, color: [u8; 3]) {
    let frame_rect = frame.bounds().as_rect();
    if radius < 0 || frame_rect.is_empty() {
        return;
    }
    let mut view = frame.as_ndarray_mut();
    let r2 = radius as i64 * radius as i64;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if (dx as i64 * dx as i64 + dy as i64 * dy as i64) > r2 {
                continue;
            }
            let (x, y) = (cx.saturating_add(dx), cy.saturating_add(dy));
            if frame_rect.contains_point(x, y) {
                let (x, y) = (x as usize, y as usize);
                for (c, &v) in color.iter().enumerate() {
                    view[[y, x, c]] = v;
                }
            }
        }
    }
}

fn fill_rect(frame: &mut FrameView<'_>, rect: Rect, color: [u8; 3]) {
    let r = rect.intersect_bounds(frame.bounds());
    if r.is_empty() {
        return;
    }
    let mut view = frame.as_ndarray_mut();
    for y in r.y..r.y + r.height {
        for x in r.x..r.x + r.width {
            for (c, &v) in color.iter().enumerate() {
                view[[y as usize, x as usize, c]] = v;
            }
        }
    }
}
