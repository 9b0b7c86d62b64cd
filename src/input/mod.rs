//! Input translation
//!
//! Raw pointer and keyboard events become discrete move intents:
//! - `gesture`: drag quantization into eight compass directions
//! - `keymap`: key code table
//! - `router`: gating against game state and forwarding to the rule engine

pub mod gesture;
pub mod keymap;
pub mod router;

pub use gesture::GestureController;
pub use keymap::{KeyIntent, intent_for_code};
pub use router::{InputRouter, InputSink, RawInput, RouteOutcome};

use crate::normalize_degrees;

/// Compass direction in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// Counter-clockwise from east, matching increasing angle
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Quantize an angle (degrees, counter-clockwise from east) into the 45°
    /// sector centred on each direction. A boundary angle belongs to the
    /// sector below it.
    pub fn from_angle(degrees: f32) -> Self {
        let angle = normalize_degrees(degrees);
        let sector = ((angle - 22.5) / 45.0).ceil() as i32;
        Self::ALL[sector.rem_euclid(8) as usize]
    }

    /// Centre angle of this direction's sector
    pub fn angle(self) -> f32 {
        match self {
            Direction::East => 0.0,
            Direction::NorthEast => 45.0,
            Direction::North => 90.0,
            Direction::NorthWest => 135.0,
            Direction::West => 180.0,
            Direction::SouthWest => 225.0,
            Direction::South => 270.0,
            Direction::SouthEast => 315.0,
        }
    }

    /// Grid displacement (y grows downward)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::NorthEast => (1, -1),
            Direction::North => (0, -1),
            Direction::NorthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
        }
    }
}

/// Requested player displacement, each axis in {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    pub dx: i32,
    pub dy: i32,
}

impl MoveIntent {
    /// Pass the turn without moving
    pub const STAY: MoveIntent = MoveIntent { dx: 0, dy: 0 };

    pub fn is_stay(self) -> bool {
        self == Self::STAY
    }
}

impl From<Direction> for MoveIntent {
    fn from(direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        MoveIntent { dx, dy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sector_centres() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_angle(direction.angle()), direction);
        }
    }

    #[test]
    fn test_boundaries_resolve_low() {
        assert_eq!(Direction::from_angle(22.5), Direction::East);
        assert_eq!(Direction::from_angle(67.5), Direction::NorthEast);
        assert_eq!(Direction::from_angle(112.5), Direction::North);
        assert_eq!(Direction::from_angle(157.5), Direction::NorthWest);
        assert_eq!(Direction::from_angle(202.5), Direction::West);
        assert_eq!(Direction::from_angle(247.5), Direction::SouthWest);
        assert_eq!(Direction::from_angle(292.5), Direction::South);
        assert_eq!(Direction::from_angle(337.5), Direction::SouthEast);
        // Repeated evaluation is stable
        for _ in 0..10 {
            assert_eq!(Direction::from_angle(22.5), Direction::East);
        }
    }

    #[test]
    fn test_wraparound() {
        assert_eq!(Direction::from_angle(359.0), Direction::East);
        assert_eq!(Direction::from_angle(-10.0), Direction::East);
        assert_eq!(Direction::from_angle(-90.0), Direction::South);
        assert_eq!(Direction::from_angle(720.0 + 45.0), Direction::NorthEast);
    }

    #[test]
    fn test_intent_from_direction() {
        assert_eq!(MoveIntent::from(Direction::North), MoveIntent { dx: 0, dy: -1 });
        assert_eq!(MoveIntent::from(Direction::SouthWest), MoveIntent { dx: -1, dy: 1 });
        assert!(MoveIntent::STAY.is_stay());
    }

    proptest! {
        #[test]
        fn prop_within_half_sector(angle in -720.0f32..720.0) {
            let direction = Direction::from_angle(angle);
            let diff = normalize_degrees(angle - direction.angle());
            let diff = if diff > 180.0 { diff - 360.0 } else { diff };
            prop_assert!(diff.abs() <= 22.5 + 1e-3);
        }
    }
}
