//! Botgrid - view layer for a turn-based grid game
//!
//! Core modules:
//! - `model`: Read-only game snapshot and rule engine interface
//! - `view`: Entity bindings, synchronization, feedback effects, layout
//! - `input`: Gesture quantization, key mapping, input routing
//! - `screen`: Wires a rule engine, the input router and the world view
//! - `render`: Rendering adapter consumed by the host engine
//! - `settings`: Data-driven visual/timing configuration

pub mod error;
pub mod input;
pub mod model;
pub mod render;
pub mod sandbox;
pub mod screen;
pub mod settings;
pub mod view;

pub use error::{SettingsError, SyncError};
pub use model::{Bot, Decoy, Game, GameEvent, GridPos, Player, RuleEngine, SkillId, Tile};
pub use screen::GameScreen;
pub use settings::Settings;

/// View configuration constants
pub mod consts {
    /// Edge length of one grid cell in screen units
    pub const TILE_SIZE: f32 = 70.0;
    /// Actors stand slightly above their tile
    pub const ACTOR_LIFT: f32 = 10.0;

    /// Random re-pose jitter (± units per axis)
    pub const SYNC_JITTER: f32 = 1.0;
    /// Duration of a synchronization transition (ms)
    pub const SYNC_DURATION_MS: f32 = 100.0;
    /// Vertical sink applied to falling/busted entities
    pub const DROP_OFFSET: f32 = 30.0;
    /// Opacity of frozen bots
    pub const FROZEN_ALPHA: f32 = 0.5;

    /// Shockwave expansion duration (ms)
    pub const SHOCKWAVE_DURATION_MS: f32 = 500.0;
    /// Shockwave starting alpha
    pub const SHOCKWAVE_ALPHA: f32 = 0.25;
    /// Shockwave radius-scale on a collision death
    pub const SHOCKWAVE_COLLISION_SCALE: f32 = 2.0;
    /// Shockwave radius-scale on a plain death
    pub const SHOCKWAVE_PLAIN_SCALE: f32 = 0.5;
    /// Upper bound (exclusive) of the staggered effect delay (ms)
    pub const EFFECT_DELAY_MAX_MS: f32 = 150.0;
    /// Explosion position jitter in grid units
    pub const EXPLOSION_JITTER: f32 = 0.5;

    /// Camera shake decay per frame
    pub const QUAKE_DECAY: f32 = 0.85;
    /// Below this magnitude the world snaps back to rest
    pub const QUAKE_THRESHOLD: f32 = 0.01;

    /// Horizontal breathing room around the grid when fitting the stage
    pub const STAGE_MARGIN: f32 = 200.0;
    /// Default viewport width
    pub const STAGE_WIDTH: f32 = 800.0;

    /// Minimum drag length before a gesture commits
    pub const GESTURE_DEAD_ZONE: f32 = 8.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    angle %= 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    // -0.0 and float rounding of tiny negatives can land exactly on 360
    if angle >= 360.0 { 0.0 } else { angle }
}

/// Convert HSL (all components 0-1) to a packed 0xRRGGBB color
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> u32 {
    fn hue_channel(p: f32, q: f32, mut t: f32) -> f32 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_channel(p, q, h + 1.0 / 3.0),
            hue_channel(p, q, h),
            hue_channel(p, q, h - 1.0 / 3.0),
        )
    };

    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (to_byte(r) << 16) | (to_byte(g) << 8) | to_byte(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), 0xFF0000);
        assert_eq!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), 0x00FF00);
        assert_eq!(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), 0x0000FF);
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), 0xFFFFFF);
    }
}
