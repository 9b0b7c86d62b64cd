//! One-shot feedback effects for bot deaths
//!
//! Effects capture their world position when scheduled and never look back
//! into the registry, so a rebuild can drop them at any point.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::anim::EXPLODE;
use super::proxy::VisualProxy;
use super::transform::CoordinateTransform;
use super::tween::{Delay, Ease, Pose, Transition};
use crate::consts::*;
use crate::model::GridPos;
use crate::settings::Settings;

/// Kind of transient effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Shockwave,
    Explosion,
}

/// Effect parameters fixed at schedule time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectPlan {
    pub kind: EffectKind,
    /// World position
    pub at: Vec2,
    pub rotation: f32,
    /// Final radius-scale (shockwaves) or sprite scale (explosions)
    pub size: f32,
}

/// A live effect sprite
#[derive(Debug, Clone)]
pub struct EffectSprite {
    pub kind: EffectKind,
    pub view: VisualProxy,
    transition: Option<Transition>,
}

impl EffectSprite {
    fn spawn(plan: &EffectPlan, shockwave_ms: f32) -> Self {
        match plan.kind {
            EffectKind::Shockwave => {
                let view = VisualProxy::new("wave")
                    .at(plan.at)
                    .with_rotation(plan.rotation)
                    .with_scale(0.1 * plan.size)
                    .with_alpha(SHOCKWAVE_ALPHA);
                let target = Pose {
                    position: plan.at,
                    alpha: 0.0,
                    scale: Vec2::splat(plan.size),
                };
                let transition = Transition::new(view.pose(), target, shockwave_ms, Ease::QuadOut);
                Self {
                    kind: plan.kind,
                    view,
                    transition: Some(transition),
                }
            }
            EffectKind::Explosion => {
                let mut view = VisualProxy::new("boom")
                    .at(plan.at)
                    .with_rotation(plan.rotation)
                    .with_scale(plan.size);
                view.anim.play(&EXPLODE, 0);
                Self {
                    kind: plan.kind,
                    view,
                    transition: None,
                }
            }
        }
    }

    /// Step by `dt` ms; returns false once the effect has run its course
    fn advance(&mut self, dt: f32) -> bool {
        match self.kind {
            EffectKind::Shockwave => match self.transition.as_mut() {
                Some(transition) => {
                    let pose = transition.advance(dt);
                    self.view.apply_pose(&pose);
                    !transition.is_finished()
                }
                None => false,
            },
            EffectKind::Explosion => {
                self.view.anim.advance(dt);
                !self.view.anim.is_finished()
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    delay: Delay,
    effects: Vec<EffectPlan>,
}

/// Schedules, runs and retires transient effects
#[derive(Debug, Clone)]
pub struct FeedbackAnimator {
    pending: Vec<Scheduled>,
    live: Vec<EffectSprite>,
    delay_max: f32,
    shockwave_ms: f32,
}

impl FeedbackAnimator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pending: Vec::new(),
            live: Vec::new(),
            delay_max: settings.effective_effect_delay_max(),
            shockwave_ms: settings.shockwave_duration_ms,
        }
    }

    /// React to a bot death on `tile`.
    ///
    /// A collision schedules a large shockwave plus an explosion at a point
    /// jittered within half a cell; a plain death schedules a small
    /// shockwave on the tile centre. Both fire after a random stagger.
    pub fn on_bot_die(
        &mut self,
        tile: GridPos,
        collision: bool,
        transform: &CoordinateTransform,
        rng: &mut impl Rng,
    ) {
        let delay = if self.delay_max > 0.0 {
            self.delay_max * rng.random_range(0.0f32..1.0)
        } else {
            0.0
        };

        let effects = if collision {
            let gx = tile.x as f32 + rng.random_range(-EXPLOSION_JITTER..=EXPLOSION_JITTER);
            let gy = tile.y as f32 + rng.random_range(-EXPLOSION_JITTER..=EXPLOSION_JITTER);
            let at = Vec2::new(transform.tile_x(gx), transform.tile_y(gy));
            vec![
                EffectPlan {
                    kind: EffectKind::Shockwave,
                    at,
                    rotation: rng.random_range(0.0..TAU),
                    size: SHOCKWAVE_COLLISION_SCALE,
                },
                EffectPlan {
                    kind: EffectKind::Explosion,
                    at,
                    rotation: rng.random_range(0.0..TAU),
                    size: 1.0,
                },
            ]
        } else {
            vec![EffectPlan {
                kind: EffectKind::Shockwave,
                at: transform.tile_pos(tile),
                rotation: rng.random_range(0.0..TAU),
                size: SHOCKWAVE_PLAIN_SCALE,
            }]
        };

        log::debug!(
            "Bot died at ({}, {}), collision={collision}, effects in {delay:.0}ms",
            tile.x,
            tile.y
        );
        self.pending.push(Scheduled {
            delay: Delay::new(delay),
            effects,
        });
    }

    /// Step live effects, retire finished ones, spawn due ones
    pub fn advance(&mut self, dt: f32) {
        self.live.retain_mut(|effect| effect.advance(dt));

        let shockwave_ms = self.shockwave_ms;
        let mut due = Vec::new();
        self.pending.retain_mut(|scheduled| {
            if scheduled.delay.tick(dt) {
                due.append(&mut scheduled.effects);
                false
            } else {
                true
            }
        });
        self.live
            .extend(due.iter().map(|plan| EffectSprite::spawn(plan, shockwave_ms)));
    }

    /// Drop every pending and live effect. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        let released =
            self.live.len() + self.pending.iter().map(|s| s.effects.len()).sum::<usize>();
        self.pending.clear();
        self.live.clear();
        released
    }

    /// Effects waiting for their stagger delay
    pub fn scheduled(&self) -> impl Iterator<Item = &EffectPlan> {
        self.pending.iter().flat_map(|s| s.effects.iter())
    }

    pub fn live(&self) -> &[EffectSprite] {
        &self.live
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn animator() -> (FeedbackAnimator, CoordinateTransform, Pcg32) {
        (
            FeedbackAnimator::new(&Settings::default()),
            CoordinateTransform::new(5, 5),
            Pcg32::seed_from_u64(11),
        )
    }

    fn count(animator: &FeedbackAnimator, kind: EffectKind) -> usize {
        animator.scheduled().filter(|s| s.kind == kind).count()
    }

    #[test]
    fn test_collision_schedules_wave_and_explosion() {
        let (mut fx, t, mut rng) = animator();
        fx.on_bot_die(GridPos::new(1, 3), true, &t, &mut rng);
        assert_eq!(count(&fx, EffectKind::Shockwave), 1);
        assert_eq!(count(&fx, EffectKind::Explosion), 1);

        let plans: Vec<&EffectPlan> = fx.scheduled().collect();
        let wave = plans.iter().find(|s| s.kind == EffectKind::Shockwave).unwrap();
        let boom = plans.iter().find(|s| s.kind == EffectKind::Explosion).unwrap();
        assert_eq!(wave.size, 2.0);
        assert_eq!(wave.at, boom.at);
        let center = t.tile_pos(GridPos::new(1, 3));
        assert!((wave.at - center).abs().max_element() <= 0.5 * 70.0 + 1e-3);
    }

    #[test]
    fn test_plain_death_schedules_small_wave_only() {
        let (mut fx, t, mut rng) = animator();
        fx.on_bot_die(GridPos::new(4, 0), false, &t, &mut rng);
        assert_eq!(count(&fx, EffectKind::Shockwave), 1);
        assert_eq!(count(&fx, EffectKind::Explosion), 0);
        let wave = fx.scheduled().next().unwrap();
        assert_eq!(wave.size, 0.5);
        assert_eq!(wave.at, t.tile_pos(GridPos::new(4, 0)));
    }

    #[test]
    fn test_spawn_after_delay_then_retire() {
        let (mut fx, t, mut rng) = animator();
        fx.on_bot_die(GridPos::new(2, 2), true, &t, &mut rng);
        assert!(fx.live().is_empty());

        // Delay is below 150ms
        fx.advance(150.0);
        assert_eq!(fx.live().len(), 2);
        assert_eq!(fx.scheduled().count(), 0);

        let wave = fx
            .live()
            .iter()
            .find(|e| e.kind == EffectKind::Shockwave)
            .unwrap();
        assert_eq!(wave.view.alpha, 0.25);
        assert!((wave.view.scale.x - 0.2).abs() < 1e-6);

        fx.advance(250.0);
        let wave = fx
            .live()
            .iter()
            .find(|e| e.kind == EffectKind::Shockwave)
            .unwrap();
        // Quad ease-out at t=0.5 covers 75% of the way
        assert!((wave.view.scale.x - (0.2 + 1.8 * 0.75)).abs() < 1e-4);
        assert!((wave.view.alpha - 0.25 * 0.25).abs() < 1e-4);

        // Explosion (480ms) and shockwave (500ms) both done
        fx.advance(260.0);
        assert!(fx.is_idle());
    }

    #[test]
    fn test_clear_releases_everything() {
        let (mut fx, t, mut rng) = animator();
        fx.on_bot_die(GridPos::new(0, 0), true, &t, &mut rng);
        fx.advance(150.0);
        fx.on_bot_die(GridPos::new(1, 0), false, &t, &mut rng);
        assert_eq!(fx.clear(), 3);
        assert!(fx.is_idle());
        fx.advance(1000.0);
        assert!(fx.live().is_empty());
    }

    #[test]
    fn test_staggered_delays_differ() {
        let (mut fx, t, mut rng) = animator();
        for x in 0..5 {
            fx.on_bot_die(GridPos::new(x, 0), false, &t, &mut rng);
        }
        let delays: Vec<f32> = fx.pending.iter().map(|s| s.delay.remaining()).collect();
        assert!(delays.iter().all(|d| (0.0..150.0).contains(d)));
        assert!(delays.windows(2).any(|w| w[0] != w[1]));
    }
}
