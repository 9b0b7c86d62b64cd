//! Fitting the world container into the viewport

use glam::Vec2;

use super::transform::CoordinateTransform;
use crate::settings::Settings;

/// Axis-aligned rectangle in container-local units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Rectangle of `size` centred on the origin
    pub fn centered(size: Vec2) -> Self {
        Self {
            min: -size * 0.5,
            size,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max()).all()
    }
}

/// Root node every proxy and effect hangs off
#[derive(Debug, Clone, PartialEq)]
pub struct WorldContainer {
    /// Resting screen position
    pub rest: Vec2,
    /// Current screen position (rest plus shake)
    pub position: Vec2,
    /// Uniform scale
    pub scale: f32,
    /// Pointer hit-test zone in local units
    pub hit_area: Rect,
}

impl WorldContainer {
    pub fn new(rest: Vec2) -> Self {
        Self {
            rest,
            position: rest,
            scale: 1.0,
            hit_area: Rect::default(),
        }
    }

    /// Convert a screen point into container-local units
    pub fn to_local(&self, screen: Vec2) -> Vec2 {
        (screen - self.position) / self.scale
    }

    /// Whether a screen point falls inside the hit area
    pub fn hit_test(&self, screen: Vec2) -> bool {
        self.hit_area.contains(self.to_local(screen))
    }
}

/// Scales the world so the grid plus margin spans the stage width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageLayoutController {
    pub stage_width: f32,
    pub margin: f32,
}

impl StageLayoutController {
    pub fn new(settings: &Settings) -> Self {
        Self {
            stage_width: settings.stage_width,
            margin: settings.stage_margin,
        }
    }

    /// `stage_width / (W * tile_size + margin)`
    pub fn fit_scale(&self, transform: &CoordinateTransform) -> f32 {
        let span = transform.view_size().x + self.margin;
        if span <= 0.0 {
            return 1.0;
        }
        self.stage_width / span
    }

    /// Size the hit area to the grid and apply the fitted scale
    pub fn apply(&self, container: &mut WorldContainer, transform: &CoordinateTransform) {
        container.hit_area = Rect::centered(transform.view_size());
        container.scale = self.fit_scale(transform);
        log::debug!(
            "Stage layout: {}x{} grid, scale {:.3}",
            transform.width,
            transform.height,
            container.scale
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale() {
        let layout = StageLayoutController::new(&Settings::default());
        // 800 / (5 * 70 + 200)
        let scale = layout.fit_scale(&CoordinateTransform::new(5, 5));
        assert!((scale - 800.0 / 550.0).abs() < 1e-6);
    }

    #[test]
    fn test_recompute_on_new_dimensions() {
        let layout = StageLayoutController {
            stage_width: 1000.0,
            margin: 200.0,
        };
        let mut container = WorldContainer::new(Vec2::ZERO);
        layout.apply(&mut container, &CoordinateTransform::new(4, 4));
        assert_eq!(container.scale, 1000.0 / 480.0);
        layout.apply(&mut container, &CoordinateTransform::new(8, 3));
        assert_eq!(container.scale, 1000.0 / 760.0);
        assert_eq!(container.hit_area.size, Vec2::new(560.0, 210.0));
    }

    #[test]
    fn test_hit_area() {
        let layout = StageLayoutController {
            stage_width: 550.0,
            margin: 200.0,
        };
        let mut container = WorldContainer::new(Vec2::new(300.0, 300.0));
        layout.apply(&mut container, &CoordinateTransform::new(5, 5));
        assert_eq!(container.scale, 1.0);
        assert!(container.hit_test(Vec2::new(300.0, 300.0)));
        assert!(container.hit_test(Vec2::new(300.0 + 175.0, 300.0 - 175.0)));
        assert!(!container.hit_test(Vec2::new(300.0 + 176.0, 300.0)));
    }
}
