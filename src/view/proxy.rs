//! Visual proxies and the entity tags that bind them to the model
//!
//! A proxy is plain data. The host renderer reads it through
//! [`crate::render::SceneRenderer`]; nothing here talks to a graphics API.

use glam::Vec2;

use super::anim::ClipPlayer;
use super::tween::Pose;

/// Kind of model entity a binding reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tile,
    Bot,
    Player,
    Decoy,
}

/// Tagged reference into the current [`crate::model::Game`] snapshot.
/// Resolved once at bind time; indices point into `Game::tiles` / `Game::bots`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Tile(usize),
    Bot(usize),
    Player,
    Decoy,
}

impl EntityRef {
    pub fn kind(self) -> EntityKind {
        match self {
            EntityRef::Tile(_) => EntityKind::Tile,
            EntityRef::Bot(_) => EntityKind::Bot,
            EntityRef::Player => EntityKind::Player,
            EntityRef::Decoy => EntityKind::Decoy,
        }
    }

    /// Index into the model list (0 for singletons)
    pub fn index(self) -> usize {
        match self {
            EntityRef::Tile(i) | EntityRef::Bot(i) => i,
            EntityRef::Player | EntityRef::Decoy => 0,
        }
    }
}

/// Presentation state derived from model flags on every synchronization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    /// Dead bot or player
    Falling,
    /// Frozen bot
    Frozen,
    /// Destroyed tile
    Busted,
}

impl ViewState {
    /// Falling and busted entities sink and fade out
    pub fn sinks(self) -> bool {
        matches!(self, ViewState::Falling | ViewState::Busted)
    }
}

/// Renderable stand-in for one model entity or transient effect
#[derive(Debug, Clone)]
pub struct VisualProxy {
    /// Texture / sprite-sheet key
    pub texture: &'static str,
    pub position: Vec2,
    pub alpha: f32,
    pub scale: Vec2,
    pub rotation: f32,
    /// Normalized anchor inside the texture
    pub origin: Vec2,
    /// Packed 0xRRGGBB tint
    pub tint: Option<u32>,
    pub visible: bool,
    /// Static sheet frame used when no clip is playing
    pub frame: u32,
    pub anim: ClipPlayer,
}

impl VisualProxy {
    pub fn new(texture: &'static str) -> Self {
        Self {
            texture,
            position: Vec2::ZERO,
            alpha: 1.0,
            scale: Vec2::ONE,
            rotation: 0.0,
            origin: Vec2::splat(0.5),
            tint: None,
            visible: true,
            frame: 0,
            anim: ClipPlayer::default(),
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::splat(scale);
        self
    }

    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = Vec2::new(x, y);
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            alpha: self.alpha,
            scale: self.scale,
        }
    }

    pub fn apply_pose(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.alpha = pose.alpha.clamp(0.0, 1.0);
        self.scale = pose.scale;
    }

    /// Sheet frame to draw this frame
    pub fn current_frame(&self) -> u32 {
        if self.anim.current_key().is_some() {
            self.anim.frame()
        } else {
            self.frame
        }
    }
}
