//! The world view: owns every proxy and effect for the current stage
//!
//! Reacts to rule engine events:
//! - `GameStart`: purge, rebuild from the snapshot, fit the stage, re-pose
//! - `Change`: re-pose every binding
//! - `BotDie`: schedule feedback effects
//!
//! All timed work advances in [`GameWorldView::tick`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::effects::FeedbackAnimator;
use super::layout::{StageLayoutController, WorldContainer};
use super::registry::EntityViewRegistry;
use super::sync::{SyncReport, SynchronizationEngine, follow_decoy};
use super::transform::CoordinateTransform;
use crate::model::{Game, GameEvent};
use crate::render::SceneRenderer;
use crate::settings::Settings;

pub struct GameWorldView {
    settings: Settings,
    rng: Pcg32,
    transform: Option<CoordinateTransform>,
    registry: EntityViewRegistry,
    sync: SynchronizationEngine,
    effects: FeedbackAnimator,
    layout: StageLayoutController,
    container: WorldContainer,
}

impl GameWorldView {
    /// Create an empty view whose container rests at `rest` (screen units)
    pub fn new(settings: Settings, rest: Vec2) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            transform: None,
            registry: EntityViewRegistry::new(),
            sync: SynchronizationEngine::new(&settings),
            effects: FeedbackAnimator::new(&settings),
            layout: StageLayoutController::new(&settings),
            container: WorldContainer::new(rest),
            settings,
        }
    }

    /// Dispatch one rule engine event against the current snapshot.
    /// Returns the synchronization report for events that re-pose the world.
    pub fn handle_event(&mut self, event: GameEvent, game: &Game) -> Option<SyncReport> {
        match event {
            GameEvent::GameStart => Some(self.rebuild(game)),
            GameEvent::Change => Some(self.synchronize(game)),
            GameEvent::BotDie { bot, collision } => {
                self.bot_died(game, bot, collision);
                None
            }
        }
    }

    /// Purge every binding and effect, then bind the new snapshot
    pub fn rebuild(&mut self, game: &Game) -> SyncReport {
        let released = self.registry.purge();
        let cancelled = self.effects.clear();
        if released > 0 || cancelled > 0 {
            log::debug!("Released {released} bindings and {cancelled} effects");
        }

        let transform = CoordinateTransform::with_settings(game.width, game.height, &self.settings);
        for (i, tile) in game.tiles.iter().enumerate() {
            self.registry.bind_tile(i, tile, &transform, &mut self.rng);
        }
        for (i, bot) in game.bots.iter().enumerate() {
            self.registry.bind_bot(i, bot, &transform, &mut self.rng);
        }
        self.registry.bind_player(&game.player, &transform, &mut self.rng);
        self.registry.bind_decoy(&game.decoy, &transform);

        self.layout.apply(&mut self.container, &transform);
        self.container.position = self.container.rest;
        self.transform = Some(transform);

        log::info!(
            "Rebuilt world: {}x{} grid, {} tiles, {} bots",
            game.width,
            game.height,
            game.tiles.len(),
            game.bots.len()
        );

        self.synchronize(game)
    }

    /// Re-pose every binding toward `game`
    pub fn synchronize(&mut self, game: &Game) -> SyncReport {
        let Some(transform) = self.transform else {
            log::warn!("Change received before the world was built");
            return SyncReport::default();
        };
        self.sync
            .synchronize(&mut self.registry, game, &transform, &mut self.rng)
    }

    /// Schedule death feedback for `game.bots[bot]`
    pub fn bot_died(&mut self, game: &Game, bot: usize, collision: bool) {
        let (Some(transform), Some(model)) = (self.transform, game.bots.get(bot)) else {
            log::warn!("BotDie for unknown bot #{bot}");
            return;
        };
        self.effects
            .on_bot_die(model.tile, collision, &transform, &mut self.rng);
    }

    /// Add camera shake
    pub fn shake(&mut self, amount: f32) {
        self.sync.quake.shake(amount);
    }

    /// Advance transitions, clips, effects and shake by `dt` ms
    pub fn tick(&mut self, dt: f32, game: Option<&Game>) {
        self.sync.advance(&mut self.registry, dt);
        self.effects.advance(dt);
        self.sync.quake.tick(&mut self.container, &mut self.rng);

        if let (Some(game), Some(transform)) = (game, self.transform.as_ref()) {
            if let Some(decoy) = self.registry.decoy_mut() {
                follow_decoy(&mut decoy.view, &game.decoy, transform);
            }
        }
    }

    /// Walk everything visible in draw order: bindings, then effects
    pub fn render(&self, renderer: &mut impl SceneRenderer) {
        renderer.begin_frame(&self.container);
        for binding in self.registry.iter().filter(|b| b.view.visible) {
            renderer.draw(&binding.view);
        }
        for effect in self.effects.live() {
            renderer.draw(&effect.view);
        }
        renderer.end_frame();
    }

    pub fn registry(&self) -> &EntityViewRegistry {
        &self.registry
    }

    pub fn effects(&self) -> &FeedbackAnimator {
        &self.effects
    }

    pub fn container(&self) -> &WorldContainer {
        &self.container
    }

    pub fn transform(&self) -> Option<&CoordinateTransform> {
        self.transform.as_ref()
    }

    pub fn quake(&self) -> f32 {
        self.sync.quake.magnitude
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bot, GridPos};
    use crate::view::effects::EffectKind;
    use crate::view::proxy::EntityRef;

    fn game(width: i32, height: i32, bots: usize) -> Game {
        let mut game = Game::filled(width, height, GridPos::new(0, 0));
        for i in 0..bots {
            game.bots.push(Bot::new(GridPos::new(i as i32 % width, height - 1)));
        }
        game
    }

    fn view() -> GameWorldView {
        GameWorldView::new(Settings::default(), Vec2::new(400.0, 300.0))
    }

    #[derive(Default)]
    struct Collect {
        frames: usize,
        drawn: Vec<&'static str>,
    }

    impl SceneRenderer for Collect {
        fn begin_frame(&mut self, _container: &WorldContainer) {
            self.frames += 1;
            self.drawn.clear();
        }

        fn draw(&mut self, proxy: &crate::view::VisualProxy) {
            self.drawn.push(proxy.texture);
        }
    }

    #[test]
    fn test_rebuild_replaces_bindings() {
        let mut view = view();
        let first = game(5, 5, 3);
        let report = view.handle_event(GameEvent::GameStart, &first).unwrap();
        assert!(report.is_clean());
        assert_eq!(view.registry().len(), 25 + 3 + 2);

        let second = game(3, 2, 1);
        view.handle_event(GameEvent::GameStart, &second);
        assert_eq!(view.registry().tiles().count(), 6);
        assert_eq!(view.registry().bots().count(), 1);
        assert!(view.registry().player().is_some());
        assert!(view.registry().decoy().is_some());
        assert_eq!(view.transform().unwrap().width, 3);
    }

    #[test]
    fn test_rebuild_rescales_stage() {
        let mut view = view();
        view.rebuild(&game(5, 5, 0));
        assert!((view.container().scale - 800.0 / 550.0).abs() < 1e-6);
        view.rebuild(&game(9, 5, 0));
        assert!((view.container().scale - 800.0 / 830.0).abs() < 1e-6);
    }

    #[test]
    fn test_rebuild_force_clears_effects() {
        let mut view = view();
        let g = game(5, 5, 2);
        view.rebuild(&g);
        view.handle_event(GameEvent::BotDie { bot: 0, collision: true }, &g);
        view.tick(150.0, Some(&g));
        view.handle_event(GameEvent::BotDie { bot: 1, collision: false }, &g);
        assert!(!view.effects().is_idle());
        view.rebuild(&g);
        assert!(view.effects().is_idle());
    }

    #[test]
    fn test_bot_die_unknown_index_ignored() {
        let mut view = view();
        let g = game(5, 5, 1);
        view.rebuild(&g);
        assert!(view.handle_event(GameEvent::BotDie { bot: 4, collision: true }, &g).is_none());
        assert!(view.effects().is_idle());
    }

    #[test]
    fn test_change_before_build_is_noop() {
        let mut view = view();
        let report = view.handle_event(GameEvent::Change, &game(5, 5, 0)).unwrap();
        assert_eq!(report.synced, 0);
    }

    #[test]
    fn test_decoy_follows_model() {
        let mut view = view();
        let mut g = game(5, 5, 0);
        view.rebuild(&g);
        assert!(!view.registry().decoy().unwrap().view.visible);

        g.decoy.active = true;
        g.decoy.tile = GridPos::new(3, 4);
        view.tick(16.0, Some(&g));
        let decoy = &view.registry().decoy().unwrap().view;
        let t = view.transform().unwrap();
        assert!(decoy.visible);
        assert_eq!(decoy.position, t.actor_pos(GridPos::new(3, 4)));
    }

    #[test]
    fn test_render_order_and_visibility() {
        let mut view = view();
        let g = game(2, 1, 1);
        view.rebuild(&g);
        view.handle_event(GameEvent::BotDie { bot: 0, collision: true }, &g);
        view.tick(150.0, Some(&g));

        let mut renderer = Collect::default();
        view.render(&mut renderer);
        assert_eq!(renderer.frames, 1);
        // Decoy is inactive and therefore skipped
        assert_eq!(renderer.drawn, vec!["tile", "tile", "bot", "player", "wave", "boom"]);
        assert_eq!(
            view.effects()
                .live()
                .iter()
                .filter(|e| e.kind == EffectKind::Explosion)
                .count(),
            1
        );
    }

    #[test]
    fn test_shake_decays_to_rest() {
        let mut view = view();
        let g = game(5, 5, 0);
        view.rebuild(&g);
        view.shake(1.0);
        view.tick(16.0, Some(&g));
        assert!((view.quake() - 0.85).abs() < 1e-6);
        for _ in 0..40 {
            view.tick(16.0, Some(&g));
        }
        assert_eq!(view.container().position, view.container().rest);
    }

    #[test]
    fn test_player_settles_on_new_tile() {
        let mut view = view();
        let mut g = game(5, 5, 0);
        view.rebuild(&g);
        g.player.tile = GridPos::new(4, 4);
        view.handle_event(GameEvent::Change, &g);
        view.tick(100.0, Some(&g));
        let t = *view.transform().unwrap();
        let player = view.registry().get(EntityRef::Player).unwrap();
        assert!((player.view.position - t.actor_pos(GridPos::new(4, 4))).abs().max_element() <= 1.0);
    }
}
