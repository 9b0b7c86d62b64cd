//! Re-posing of every binding after a model change
//!
//! A synchronization pass derives each binding's [`ViewState`] from the model,
//! computes a target pose and issues an independent timed transition. The
//! pass returns immediately; transitions are advanced by the frame tick.

use glam::Vec2;
use rand::Rng;

use super::anim::{AnimationClip, BOT_FALL, BOT_FREEZE, BOT_IDLE, PLAYER_FALL, PLAYER_IDLE};
use super::layout::WorldContainer;
use super::proxy::{EntityKind, EntityRef, ViewState, VisualProxy};
use super::registry::EntityViewRegistry;
use super::transform::CoordinateTransform;
use super::tween::{Ease, Pose, Transition};
use crate::error::SyncError;
use crate::model::{Decoy, Game, GridPos};
use crate::settings::Settings;

/// Model facts a binding needs for one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub pos: GridPos,
    pub state: ViewState,
    /// Actors are lifted above their tile
    pub actor: bool,
}

/// Look `entity` up in `game` and derive its presentation state
pub fn resolve(entity: EntityRef, game: &Game) -> Result<Resolved, SyncError> {
    let missing = || SyncError::MissingEntity {
        kind: entity.kind(),
        index: entity.index(),
    };

    let resolved = match entity {
        EntityRef::Tile(i) => {
            let tile = game.tiles.get(i).ok_or_else(missing)?;
            Resolved {
                pos: tile.pos(),
                state: if tile.busted { ViewState::Busted } else { ViewState::Idle },
                actor: false,
            }
        }
        EntityRef::Bot(i) => {
            let bot = game.bots.get(i).ok_or_else(missing)?;
            let state = if bot.dead {
                ViewState::Falling
            } else if bot.frozen {
                ViewState::Frozen
            } else {
                ViewState::Idle
            };
            Resolved {
                pos: bot.tile,
                state,
                actor: true,
            }
        }
        EntityRef::Player => Resolved {
            pos: game.player.tile,
            state: if game.player.dead { ViewState::Falling } else { ViewState::Idle },
            actor: true,
        },
        EntityRef::Decoy => Resolved {
            pos: game.decoy.tile,
            state: ViewState::Idle,
            actor: true,
        },
    };

    if !game.in_bounds(resolved.pos) {
        return Err(SyncError::OutOfBounds {
            kind: entity.kind(),
            index: entity.index(),
            x: resolved.pos.x,
            y: resolved.pos.y,
        });
    }
    Ok(resolved)
}

/// Clip presenting `state` for an entity of `kind`
pub fn clip_for(kind: EntityKind, state: ViewState) -> Option<&'static AnimationClip> {
    match (kind, state) {
        (EntityKind::Bot, ViewState::Idle) => Some(&BOT_IDLE),
        (EntityKind::Bot, ViewState::Falling) => Some(&BOT_FALL),
        (EntityKind::Bot, ViewState::Frozen) => Some(&BOT_FREEZE),
        (EntityKind::Player, ViewState::Idle) => Some(&PLAYER_IDLE),
        (EntityKind::Player, ViewState::Falling) => Some(&PLAYER_FALL),
        _ => None,
    }
}

/// Outcome of one synchronization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Bindings that received a new transition
    pub synced: usize,
    /// Bindings skipped because the model broke its contract
    pub skipped: Vec<SyncError>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Issues re-pose transitions and owns the camera shake
#[derive(Debug, Clone)]
pub struct SynchronizationEngine {
    jitter: f32,
    duration: f32,
    drop_offset: f32,
    frozen_alpha: f32,
    pub quake: Quake,
}

impl SynchronizationEngine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            jitter: settings.effective_jitter(),
            duration: settings.sync_duration_ms,
            drop_offset: settings.drop_offset,
            frozen_alpha: settings.effective_frozen_alpha(),
            quake: Quake::new(settings),
        }
    }

    /// Opacity presenting `state`
    pub fn target_alpha(&self, state: ViewState) -> f32 {
        match state {
            ViewState::Falling | ViewState::Busted => 0.0,
            ViewState::Frozen => self.frozen_alpha,
            ViewState::Idle => 1.0,
        }
    }

    /// Re-pose every binding toward the current model, in registry order
    pub fn synchronize(
        &self,
        registry: &mut EntityViewRegistry,
        game: &Game,
        transform: &CoordinateTransform,
        rng: &mut impl Rng,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        for binding in registry.iter_mut() {
            let resolved = match resolve(binding.entity, game) {
                Ok(resolved) => resolved,
                Err(err) => {
                    log::error!("Skipping resync: {err}");
                    report.skipped.push(err);
                    continue;
                }
            };

            let base = if resolved.actor {
                transform.actor_pos(resolved.pos)
            } else {
                transform.tile_pos(resolved.pos)
            };
            let jitter = if self.jitter > 0.0 {
                spread(self.jitter, rng)
            } else {
                Vec2::ZERO
            };
            let drop = if resolved.state.sinks() {
                Vec2::new(0.0, self.drop_offset)
            } else {
                Vec2::ZERO
            };

            let target = Pose {
                position: base + jitter + drop,
                alpha: self.target_alpha(resolved.state),
                scale: binding.view.scale,
            };
            binding.transition = Some(Transition::new(
                binding.view.pose(),
                target,
                self.duration,
                Ease::Linear,
            ));

            if resolved.state != binding.state {
                binding.state = resolved.state;
                match clip_for(binding.kind(), resolved.state) {
                    Some(clip) => {
                        let start = clip.start_frame(rng);
                        binding.view.anim.play_if_changed(clip, start);
                    }
                    None => binding.view.anim.stop(),
                }
            }

            report.synced += 1;
        }

        report
    }

    /// Step every in-flight transition and clip by `dt` ms
    pub fn advance(&self, registry: &mut EntityViewRegistry, dt: f32) {
        for binding in registry.iter_mut() {
            if let Some(transition) = binding.transition.as_mut() {
                let pose = transition.advance(dt);
                binding.view.apply_pose(&pose);
                if transition.is_finished() {
                    binding.transition = None;
                }
            }
            binding.view.anim.advance(dt);
        }
    }
}

/// Decaying camera shake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quake {
    pub magnitude: f32,
    pub decay: f32,
    pub threshold: f32,
    pub enabled: bool,
}

impl Quake {
    pub fn new(settings: &Settings) -> Self {
        Self {
            magnitude: 0.0,
            decay: settings.quake_decay.clamp(0.0, 1.0),
            threshold: settings.quake_threshold,
            enabled: settings.effective_screen_shake(),
        }
    }

    /// Set the shake magnitude (never lowers an ongoing stronger shake).
    /// Non-finite amounts are ignored.
    pub fn shake(&mut self, amount: f32) {
        if !amount.is_finite() {
            log::warn!("Ignoring non-finite shake {amount}");
            return;
        }
        if self.enabled {
            self.magnitude = self.magnitude.max(amount.max(0.0));
        }
    }

    /// Advance one frame and place `container` accordingly
    pub fn tick(&mut self, container: &mut WorldContainer, rng: &mut impl Rng) {
        let (offset, magnitude) = quake_step(self.magnitude, self.decay, self.threshold, rng);
        self.magnitude = magnitude;
        container.position = container.rest + offset;
    }
}

/// One frame of shake: the container offset and the decayed magnitude.
/// At or below `threshold` the offset is exactly zero.
pub fn quake_step(magnitude: f32, decay: f32, threshold: f32, rng: &mut impl Rng) -> (Vec2, f32) {
    if magnitude > threshold {
        (spread(magnitude, rng), magnitude * decay)
    } else {
        (Vec2::ZERO, magnitude)
    }
}

/// Uniform offset in `[-extent, extent]` on both axes. Scaling a unit draw
/// keeps huge extents from overflowing the sampled range.
fn spread(extent: f32, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        extent * rng.random_range(-1.0f32..=1.0),
        extent * rng.random_range(-1.0f32..=1.0),
    )
}

/// Keep the decoy proxy on the decoy's tile and show it only while active
pub fn follow_decoy(view: &mut VisualProxy, decoy: &Decoy, transform: &CoordinateTransform) {
    view.visible = decoy.active;
    view.position = transform.actor_pos(decoy.tile);
}
