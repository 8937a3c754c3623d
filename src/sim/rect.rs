//! Axis-aligned rectangles
//!
//! Every entity in the game is a rectangle in canvas pixels with its origin
//! at the top-left corner (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Top-left corner
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos() + self.size()
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos() + self.size() * 0.5
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Shift by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.set_pos(self.pos() + delta);
    }

    /// Clamp the position so the whole rectangle lies inside `[0, bounds]`
    ///
    /// A rectangle larger than the bounds is pinned to the origin.
    pub fn clamp_within(&mut self, bounds: Vec2) {
        let limit = (bounds - self.size()).max(Vec2::ZERO);
        self.set_pos(self.pos().clamp(Vec2::ZERO, limit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.max(), Vec2::new(40.0, 60.0));
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_clamp_within() {
        let bounds = Vec2::new(800.0, 400.0);

        let mut r = Rect::new(-3.0, 395.0, 20.0, 20.0);
        r.clamp_within(bounds);
        assert_eq!(r.pos(), Vec2::new(0.0, 380.0));

        let mut r = Rect::new(790.0, -10.0, 20.0, 20.0);
        r.clamp_within(bounds);
        assert_eq!(r.pos(), Vec2::new(780.0, 0.0));

        let mut huge = Rect::new(5.0, 5.0, 900.0, 20.0);
        huge.clamp_within(bounds);
        assert_eq!(huge.x, 0.0);
    }
}
