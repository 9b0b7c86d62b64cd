//! Error types for contract violations reported by the view layer

use std::{error::Error, fmt};

use crate::view::EntityKind;

/// Reasons a single binding could not be resynchronized.
///
/// These are collaborator contract violations: the offending binding is
/// skipped and every other binding is still synchronized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncError {
    /// The binding points at a model entity that no longer exists.
    MissingEntity { kind: EntityKind, index: usize },
    /// The model entity sits outside the `W x H` grid.
    OutOfBounds {
        kind: EntityKind,
        index: usize,
        x: i32,
        y: i32,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::MissingEntity { kind, index } => {
                write!(f, "{kind:?} #{index} is missing from the game snapshot")
            }
            SyncError::OutOfBounds { kind, index, x, y } => {
                write!(f, "{kind:?} #{index} has out-of-range coordinates ({x}, {y})")
            }
        }
    }
}

impl Error for SyncError {}

/// Failure to read view settings.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io(std::io::Error),
    /// The settings document is not valid JSON for `Settings`.
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "failed to read settings: {err}"),
            SettingsError::Parse(err) => write!(f, "invalid settings: {err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}
