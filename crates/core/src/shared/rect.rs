//! Integer pixel rectangles and the clamping rules every effect relies on
//! before it touches frame memory.

/// Width and height of the frame a rectangle is clamped against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBounds {
    pub width: u32,
    pub height: u32,
}

impl FrameBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The full-frame rectangle `(0, 0, width, height)`.
    pub fn as_rect(&self) -> Rect {
        Rect::new(0, 0, saturate(self.width as i64), saturate(self.height as i64))
    }
}

/// Axis-aligned rectangle in frame pixel coordinates.
///
/// A rectangle with non-positive width or height is empty; every effect
/// treats an empty rectangle as a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        !self.is_empty()
            && px >= self.x
            && py >= self.y
            && (px as i64) < self.x as i64 + self.width as i64
            && (py as i64) < self.y as i64 + self.height as i64
    }

    /// True when the rectangle lies entirely inside `bounds`.
    pub fn is_within(&self, bounds: FrameBounds) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 0
            && self.height >= 0
            && (self.x as i64 + self.width as i64) <= (bounds.width as i64)
            && (self.y as i64 + self.height as i64) <= (bounds.height as i64)
    }

    /// Moves the origin inside the frame, then shrinks the size to fit.
    ///
    /// The far edges stay where they were, so a rectangle hanging off the
    /// left or top loses the part that was off-frame. When nothing fits,
    /// the result is an empty rectangle whose origin is still inside
    /// `bounds`.
    pub fn clamp_to(&self, bounds: FrameBounds) -> Rect {
        let bw = bounds.width as i64;
        let bh = bounds.height as i64;
        let x = (self.x as i64).max(0);
        let y = (self.y as i64).max(0);
        let w = (self.x as i64 + self.width as i64).min(bw) - x;
        let h = (self.y as i64 + self.height as i64).min(bh) - y;

        if w < 0 || h < 0 {
            return Rect::new(saturate(x.min(bw)), saturate(y.min(bh)), 0, 0);
        }
        Rect::new(saturate(x), saturate(y), saturate(w), saturate(h))
    }

    /// Set intersection. Disjoint or empty inputs yield `Rect::default()`.
    ///
    /// Agrees with [`Rect::clamp_to`] against the full frame whenever the
    /// result is non-empty.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x1 = (self.x as i64).max(other.x as i64);
        let y1 = (self.y as i64).max(other.y as i64);
        let x2 = (self.x as i64 + self.width as i64).min(other.x as i64 + other.width as i64);
        let y2 = (self.y as i64 + self.height as i64).min(other.y as i64 + other.height as i64);

        if x2 <= x1 || y2 <= y1 {
            return Rect::default();
        }
        Rect::new(
            saturate(x1),
            saturate(y1),
            saturate(x2 - x1),
            saturate(y2 - y1),
        )
    }

    /// Hard intersection with the full frame.
    pub fn intersect_bounds(&self, bounds: FrameBounds) -> Rect {
        self.intersect(&bounds.as_rect())
    }

    /// Grows (or shrinks) the rectangle by `scale` about its integer centre.
    ///
    /// New sizes truncate toward zero; the centre uses integer halves of the
    /// original size, so odd sizes shift the result by at most one pixel.
    pub fn scaled_about_center(&self, scale: f32) -> Rect {
        let new_w = (self.width as f32 * scale) as i32;
        let new_h = (self.height as f32 * scale) as i32;
        let cx = self.x.saturating_add(self.width / 2);
        let cy = self.y.saturating_add(self.height / 2);
        Rect::new(
            cx.saturating_sub(new_w / 2),
            cy.saturating_sub(new_h / 2),
            new_w,
            new_h,
        )
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
