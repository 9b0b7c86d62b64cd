//! Drag gesture quantization
//!
//! `Idle -> Tracking -> Idle`. A drag commits to a direction the first time it
//! leaves the dead zone and yields exactly one intent per press.

use glam::Vec2;

use super::Direction;

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    Idle,
    Tracking { anchor: Vec2, committed: bool },
}

/// Turns a pointer down/move/up stream into at most one direction per press
#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    dead_zone: f32,
}

impl GestureController {
    pub fn new(dead_zone: f32) -> Self {
        Self {
            state: GestureState::Idle,
            dead_zone: dead_zone.max(0.0),
        }
    }

    /// Pointer pressed: anchor a new gesture (restarts any gesture in flight)
    pub fn start(&mut self, x: f32, y: f32) {
        self.state = GestureState::Tracking {
            anchor: Vec2::new(x, y),
            committed: false,
        };
    }

    /// Pointer moved. Returns the committed direction on the first move that
    /// leaves the dead zone; `None` otherwise.
    pub fn drag(&mut self, x: f32, y: f32) -> Option<Direction> {
        let GestureState::Tracking { anchor, committed } = &mut self.state else {
            return None;
        };
        if *committed {
            return None;
        }

        let delta = Vec2::new(x, y) - *anchor;
        if delta.length() <= self.dead_zone {
            return None;
        }

        *committed = true;
        // Screen y points down; flip it so angles run counter-clockwise
        let angle = (-delta.y).atan2(delta.x).to_degrees();
        Some(Direction::from_angle(angle))
    }

    /// Pointer released; any uncommitted drag is discarded
    pub fn end(&mut self) {
        self.state = GestureState::Idle;
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, GestureState::Tracking { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GESTURE_DEAD_ZONE;
    use proptest::prelude::*;

    fn swipe(to: (f32, f32)) -> Option<Direction> {
        let mut gesture = GestureController::new(GESTURE_DEAD_ZONE);
        gesture.start(0.0, 0.0);
        let result = gesture.drag(to.0, to.1);
        gesture.end();
        result
    }

    #[test]
    fn test_upward_drag_is_north() {
        assert_eq!(swipe((0.0, -10.0)), Some(Direction::North));
    }

    #[test]
    fn test_cardinal_and_diagonal() {
        assert_eq!(swipe((12.0, 0.0)), Some(Direction::East));
        assert_eq!(swipe((-12.0, 0.0)), Some(Direction::West));
        assert_eq!(swipe((0.0, 12.0)), Some(Direction::South));
        assert_eq!(swipe((10.0, -10.0)), Some(Direction::NorthEast));
        assert_eq!(swipe((-10.0, 10.0)), Some(Direction::SouthWest));
    }

    #[test]
    fn test_dead_zone() {
        assert_eq!(swipe((3.0, -4.0)), None);
        assert_eq!(swipe((0.0, -8.0)), None);
    }

    #[test]
    fn test_one_intent_per_press() {
        let mut gesture = GestureController::new(GESTURE_DEAD_ZONE);
        gesture.start(100.0, 100.0);
        assert_eq!(gesture.drag(102.0, 101.0), None);
        assert_eq!(gesture.drag(120.0, 100.0), Some(Direction::East));
        assert_eq!(gesture.drag(140.0, 100.0), None);
        assert_eq!(gesture.drag(100.0, 60.0), None);
        gesture.end();
        assert!(!gesture.is_tracking());

        gesture.start(0.0, 0.0);
        assert_eq!(gesture.drag(0.0, 20.0), Some(Direction::South));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut gesture = GestureController::new(GESTURE_DEAD_ZONE);
        assert_eq!(gesture.drag(50.0, 50.0), None);
        gesture.start(0.0, 0.0);
        gesture.end();
        assert_eq!(gesture.drag(50.0, 50.0), None);
    }

    #[test]
    fn test_release_discards_partial_drag() {
        let mut gesture = GestureController::new(GESTURE_DEAD_ZONE);
        gesture.start(0.0, 0.0);
        assert_eq!(gesture.drag(4.0, 0.0), None);
        gesture.end();
        gesture.start(4.0, 0.0);
        assert_eq!(gesture.drag(10.0, 0.0), None);
    }

    proptest! {
        #[test]
        fn prop_swipe_deterministic(x in -100.0f32..100.0, y in -100.0f32..100.0) {
            prop_assert_eq!(swipe((x, y)), swipe((x, y)));
        }

        #[test]
        fn prop_long_swipes_commit(angle in 0.0f32..360.0, len in 9.0f32..200.0) {
            let (sin, cos) = angle.to_radians().sin_cos();
            prop_assert!(swipe((cos * len, -sin * len)).is_some());
        }
    }
}
