//! View settings and preferences
//!
//! Every visual/timing constant is overridable from a JSON document; missing
//! fields fall back to the values in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// View settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Layout ===
    /// Grid cell size in screen units
    pub tile_size: f32,
    /// Actor elevation above its tile
    pub actor_lift: f32,
    /// Viewport width the world is fitted into
    pub stage_width: f32,
    /// Horizontal margin added to the grid width when fitting
    pub stage_margin: f32,

    // === Synchronization ===
    /// Re-pose jitter (± units)
    pub sync_jitter: f32,
    /// Transition duration (ms)
    pub sync_duration_ms: f32,
    /// Sink applied to falling/busted entities
    pub drop_offset: f32,
    /// Opacity of frozen bots (clamped to 0-1)
    pub frozen_alpha: f32,

    // === Effects ===
    /// Shockwave duration (ms)
    pub shockwave_duration_ms: f32,
    /// Upper bound of the staggered effect delay (ms)
    pub effect_delay_max_ms: f32,
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Quake decay per frame
    pub quake_decay: f32,
    /// Quake snap threshold
    pub quake_threshold: f32,

    // === Input ===
    /// Gesture dead zone in screen units
    pub gesture_dead_zone: f32,

    // === Accessibility ===
    /// Reduced motion (no shake, no jitter)
    pub reduced_motion: bool,

    /// RNG seed for jitter and effect placement
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            actor_lift: ACTOR_LIFT,
            stage_width: STAGE_WIDTH,
            stage_margin: STAGE_MARGIN,

            sync_jitter: SYNC_JITTER,
            sync_duration_ms: SYNC_DURATION_MS,
            drop_offset: DROP_OFFSET,
            frozen_alpha: FROZEN_ALPHA,

            shockwave_duration_ms: SHOCKWAVE_DURATION_MS,
            effect_delay_max_ms: EFFECT_DELAY_MAX_MS,
            screen_shake: true,
            quake_decay: QUAKE_DECAY,
            quake_threshold: QUAKE_THRESHOLD,

            gesture_dead_zone: GESTURE_DEAD_ZONE,

            reduced_motion: false,

            seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, filling absent fields with defaults.
    /// Numbers that overflow to infinity are reset to their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Replace every non-finite number with its default
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let fields = [
            ("tile_size", &mut self.tile_size, defaults.tile_size),
            ("actor_lift", &mut self.actor_lift, defaults.actor_lift),
            ("stage_width", &mut self.stage_width, defaults.stage_width),
            ("stage_margin", &mut self.stage_margin, defaults.stage_margin),
            ("sync_jitter", &mut self.sync_jitter, defaults.sync_jitter),
            ("sync_duration_ms", &mut self.sync_duration_ms, defaults.sync_duration_ms),
            ("drop_offset", &mut self.drop_offset, defaults.drop_offset),
            ("frozen_alpha", &mut self.frozen_alpha, defaults.frozen_alpha),
            (
                "shockwave_duration_ms",
                &mut self.shockwave_duration_ms,
                defaults.shockwave_duration_ms,
            ),
            (
                "effect_delay_max_ms",
                &mut self.effect_delay_max_ms,
                defaults.effect_delay_max_ms,
            ),
            ("quake_decay", &mut self.quake_decay, defaults.quake_decay),
            ("quake_threshold", &mut self.quake_threshold, defaults.quake_threshold),
            ("gesture_dead_zone", &mut self.gesture_dead_zone, defaults.gesture_dead_zone),
        ];
        for (name, value, default) in fields {
            if !value.is_finite() {
                log::warn!("Setting {name} = {value} is not finite; using {default}");
                *value = default;
            }
        }
        self
    }

    /// Read settings from a JSON file
    pub fn read(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings from a JSON file, falling back to defaults on failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective re-pose jitter (respects reduced_motion)
    pub fn effective_jitter(&self) -> f32 {
        if self.reduced_motion || !self.sync_jitter.is_finite() {
            0.0
        } else {
            self.sync_jitter.abs()
        }
    }

    /// Upper bound of the effect stagger (0 when negative or non-finite)
    pub fn effective_effect_delay_max(&self) -> f32 {
        if self.effect_delay_max_ms.is_finite() {
            self.effect_delay_max_ms.max(0.0)
        } else {
            0.0
        }
    }

    /// Frozen opacity clamped to a valid alpha
    pub fn effective_frozen_alpha(&self) -> f32 {
        self.frozen_alpha.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let settings = Settings::default();
        assert_eq!(settings.tile_size, 70.0);
        assert_eq!(settings.sync_duration_ms, 100.0);
        assert_eq!(settings.shockwave_duration_ms, 500.0);
        assert_eq!(settings.stage_margin, 200.0);
        assert_eq!(settings.quake_decay, 0.85);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"stage_width": 1024.0, "reduced_motion": true}"#)
            .unwrap();
        assert_eq!(settings.stage_width, 1024.0);
        assert_eq!(settings.tile_size, TILE_SIZE);
        assert!(!settings.effective_screen_shake());
        assert_eq!(settings.effective_jitter(), 0.0);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Settings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overflowing_numbers_reset() {
        let settings = Settings::from_json(
            r#"{"sync_jitter": 1e39, "effect_delay_max_ms": -1e39, "quake_decay": 1e40, "tile_size": 64.0}"#,
        )
        .unwrap();
        assert_eq!(settings.sync_jitter, SYNC_JITTER);
        assert_eq!(settings.effect_delay_max_ms, EFFECT_DELAY_MAX_MS);
        assert_eq!(settings.quake_decay, QUAKE_DECAY);
        assert_eq!(settings.tile_size, 64.0);
    }

    #[test]
    fn test_effective_values_guard_non_finite() {
        let settings = Settings {
            sync_jitter: f32::INFINITY,
            effect_delay_max_ms: f32::NAN,
            ..Default::default()
        };
        assert_eq!(settings.effective_jitter(), 0.0);
        assert_eq!(settings.effective_effect_delay_max(), 0.0);
    }

    #[test]
    fn test_frozen_alpha_clamped() {
        let settings = Settings {
            frozen_alpha: 17.0,
            ..Default::default()
        };
        assert_eq!(settings.effective_frozen_alpha(), 1.0);
    }
}
