//! Key mapping from physical key codes to intents.
//!
//! Codes follow the DOM `KeyboardEvent.code` naming. The letter block and the
//! numeric keypad both form a 3x3 grid around the "stay" key.

use super::{Direction, MoveIntent};

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Move(MoveIntent),
    /// Toggle fullscreen (handled by the host)
    Fullscreen,
}

fn dir(direction: Direction) -> Option<KeyIntent> {
    Some(KeyIntent::Move(direction.into()))
}

/// Map a key code to an intent
pub fn intent_for_code(code: &str) -> Option<KeyIntent> {
    match code {
        "KeyQ" | "Numpad7" => dir(Direction::NorthWest),
        "KeyW" | "Numpad8" => dir(Direction::North),
        "KeyE" | "Numpad9" => dir(Direction::NorthEast),
        "KeyA" | "Numpad4" => dir(Direction::West),
        "KeyS" | "Numpad5" => Some(KeyIntent::Move(MoveIntent::STAY)),
        "KeyD" | "Numpad6" => dir(Direction::East),
        "KeyZ" | "Numpad1" => dir(Direction::SouthWest),
        "KeyX" | "Numpad2" => dir(Direction::South),
        "KeyC" | "Numpad3" => dir(Direction::SouthEast),

        "KeyF" => Some(KeyIntent::Fullscreen),

        _ => None,
    }
}
