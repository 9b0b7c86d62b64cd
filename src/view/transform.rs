//! Grid to screen coordinate mapping
//!
//! The grid is centred on the world container origin. Every component that
//! positions something goes through this type so rounding never diverges.

use glam::Vec2;

use crate::consts::{ACTOR_LIFT, TILE_SIZE};
use crate::model::GridPos;
use crate::settings::Settings;

/// Pure mapping from grid coordinates of a `width x height` stage to world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pub width: i32,
    pub height: i32,
    pub tile_size: f32,
    /// Vertical elevation of actors above their tile
    pub actor_lift: f32,
}

impl CoordinateTransform {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            tile_size: TILE_SIZE,
            actor_lift: ACTOR_LIFT,
        }
    }

    pub fn with_settings(width: i32, height: i32, settings: &Settings) -> Self {
        Self {
            width,
            height,
            tile_size: settings.tile_size,
            actor_lift: settings.actor_lift,
        }
    }

    /// Screen x of the centre of column `v` (fractional columns allowed)
    #[inline]
    pub fn tile_x(&self, v: f32) -> f32 {
        self.tile_size * (v - self.width as f32 * 0.5 + 0.5)
    }

    /// Screen y of the centre of row `v` (fractional rows allowed)
    #[inline]
    pub fn tile_y(&self, v: f32) -> f32 {
        self.tile_size * (v - self.height as f32 * 0.5 + 0.5)
    }

    #[inline]
    pub fn actor_x(&self, v: f32) -> f32 {
        self.tile_x(v)
    }

    #[inline]
    pub fn actor_y(&self, v: f32) -> f32 {
        self.tile_y(v) - self.actor_lift
    }

    pub fn tile_pos(&self, pos: GridPos) -> Vec2 {
        Vec2::new(self.tile_x(pos.x as f32), self.tile_y(pos.y as f32))
    }

    pub fn actor_pos(&self, pos: GridPos) -> Vec2 {
        Vec2::new(self.actor_x(pos.x as f32), self.actor_y(pos.y as f32))
    }

    /// Column under screen x (nearest cell centre)
    pub fn grid_x(&self, screen_x: f32) -> i32 {
        (screen_x / self.tile_size + self.width as f32 * 0.5 - 0.5).round() as i32
    }

    /// Row under screen y (nearest cell centre)
    pub fn grid_y(&self, screen_y: f32) -> i32 {
        (screen_y / self.tile_size + self.height as f32 * 0.5 - 0.5).round() as i32
    }

    /// Inverse of [`Self::tile_pos`]
    pub fn grid_pos(&self, screen: Vec2) -> GridPos {
        GridPos::new(self.grid_x(screen.x), self.grid_y(screen.y))
    }

    /// Size of the whole grid in screen units
    pub fn view_size(&self) -> Vec2 {
        Vec2::new(
            self.tile_size * self.width as f32,
            self.tile_size * self.height as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_centered_grid() {
        let t = CoordinateTransform::new(5, 5);
        assert_eq!(t.tile_x(2.0), 0.0);
        assert_eq!(t.tile_y(2.0), 0.0);
        assert_eq!(t.tile_x(0.0), -140.0);
        assert_eq!(t.tile_x(4.0), 140.0);
        assert_eq!(t.tile_x(3.0), 70.0);
    }

    #[test]
    fn test_even_grid_has_no_center_tile() {
        let t = CoordinateTransform::new(4, 2);
        assert_eq!(t.tile_x(0.0), -105.0);
        assert_eq!(t.tile_x(3.0), 105.0);
        assert_eq!(t.tile_y(0.0), -35.0);
        assert_eq!(t.tile_y(1.0), 35.0);
    }

    #[test]
    fn test_actor_lift() {
        let t = CoordinateTransform::new(5, 5);
        let pos = GridPos::new(1, 3);
        assert_eq!(t.actor_pos(pos).x, t.tile_pos(pos).x);
        assert_eq!(t.actor_pos(pos).y, t.tile_pos(pos).y - 10.0);
    }

    #[test]
    fn test_view_size() {
        let t = CoordinateTransform::new(7, 3);
        assert_eq!(t.view_size(), Vec2::new(490.0, 210.0));
    }

    proptest! {
        #[test]
        fn prop_round_trip(w in 1i32..40, h in 1i32..40, fx in 0.0f64..1.0, fy in 0.0f64..1.0) {
            let x = ((w as f64) * fx) as i32;
            let y = ((h as f64) * fy) as i32;
            let t = CoordinateTransform::new(w, h);
            let pos = GridPos::new(x.min(w - 1), y.min(h - 1));
            prop_assert_eq!(t.grid_pos(t.tile_pos(pos)), pos);
        }

        #[test]
        fn prop_deterministic(w in 1i32..40, h in 1i32..40, x in 0i32..40, y in 0i32..40) {
            let a = CoordinateTransform::new(w, h);
            let b = CoordinateTransform::new(w, h);
            prop_assert_eq!(a.tile_pos(GridPos::new(x, y)), b.tile_pos(GridPos::new(x, y)));
        }
    }
}
