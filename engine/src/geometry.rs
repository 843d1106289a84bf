//! Pixel-space rectangles.
//!
//! Unlike layout rects, these carry a signed origin: sprites routinely hang off the left or top
//! edge of the surface while scrolling.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// Rounds a floating-point rect to whole pixels. Negative or non-finite sizes become empty.
    pub fn from_f32(x: f32, y: f32, w: f32, h: f32) -> Self {
        let to_i32 = |v: f32| {
            if v.is_finite() {
                v.round().clamp(i32::MIN as f32, i32::MAX as f32) as i32
            } else {
                0
            }
        };
        let to_u32 = |v: f32| {
            if v.is_finite() && v > 0.0 {
                v.round().min(u32::MAX as f32) as u32
            } else {
                0
            }
        };
        Self {
            x: to_i32(x),
            y: to_i32(y),
            w: to_u32(w),
            h: to_u32(h),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        let (px, py) = (px as i64, py as i64);
        px >= self.x as i64 && px < self.right() && py >= self.y as i64 && py < self.bottom()
    }

    /// Overlapping area of two rects, or `None` if they don't overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = (self.x as i64).max(other.x as i64);
        let y0 = (self.y as i64).max(other.y as i64);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect {
            x: x0 as i32,
            y: y0 as i32,
            w: (x1 - x0) as u32,
            h: (y1 - y0) as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_clips_negative_origin() {
        let surface = Rect::from_size(100, 50);
        let sprite = Rect::new(-20, -5, 40, 20);
        assert_eq!(sprite.intersect(&surface), Some(Rect::new(0, 0, 20, 15)));
    }

    #[test]
    fn disjoint_rects_have_no_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert_eq!(a.intersect(&b), None);
        assert!(!a.contains(10, 5));
        assert!(a.contains(9, 9));
    }

    #[test]
    fn from_f32_rounds_and_rejects_negative_size() {
        assert_eq!(
            Rect::from_f32(10.4, -2.6, 108.66, 33.33),
            Rect::new(10, -3, 109, 33)
        );
        assert!(Rect::from_f32(0.0, 0.0, -5.0, 10.0).is_empty());
        assert_eq!(Rect::from_f32(f32::NAN, 1.0, 2.0, 2.0).x, 0);
    }
}
