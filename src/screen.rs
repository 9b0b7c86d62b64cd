//! Game screen: one rule engine, one router, one world view
//!
//! The host calls [`GameScreen::tick`] every frame. Input pushed through the
//! sink is routed first, then engine events are dispatched to the view, then
//! timed work advances.

use glam::Vec2;

use crate::input::{InputRouter, InputSink, RawInput, RouteOutcome};
use crate::model::{GameEvent, RuleEngine};
use crate::render::SceneRenderer;
use crate::settings::Settings;
use crate::view::{GameWorldView, SyncReport};

pub struct GameScreen<E: RuleEngine> {
    engine: E,
    router: InputRouter,
    view: GameWorldView,
}

impl<E: RuleEngine> GameScreen<E> {
    /// Wrap `engine` and dispatch whatever it has already emitted
    pub fn new(engine: E, settings: Settings, rest: Vec2) -> Self {
        let mut screen = Self {
            router: InputRouter::new(&settings),
            view: GameWorldView::new(settings, rest),
            engine,
        };
        screen.pump_events();
        screen
    }

    /// Open the input subscription host listeners push into
    pub fn subscribe(&mut self) -> InputSink {
        self.router.subscribe()
    }

    pub fn unsubscribe(&mut self) {
        self.router.unsubscribe();
    }

    /// Route one input immediately and dispatch the resulting events.
    /// Once a stage is laid out, presses outside its hit area are ignored.
    pub fn handle_input(&mut self, input: RawInput) -> RouteOutcome {
        if let RawInput::PointerDown { x, y } = input {
            let container = self.view.container();
            if self.view.transform().is_some() && !container.hit_test(Vec2::new(x, y)) {
                log::trace!("Press at ({x}, {y}) outside the stage");
                return RouteOutcome::Ignored;
            }
        }
        let outcome = self.router.route(input, &mut self.engine);
        self.pump_events();
        outcome
    }

    /// Route everything queued on the subscription
    pub fn process_pending_input(&mut self) -> Vec<RouteOutcome> {
        self.router
            .drain_pending()
            .into_iter()
            .map(|input| self.handle_input(input))
            .collect()
    }

    /// Dispatch engine events to the view. Events that precede the last
    /// `GameStart` of a batch belong to a superseded stage and are dropped.
    pub fn pump_events(&mut self) -> Vec<SyncReport> {
        let mut events = self.engine.drain_events();
        if let Some(last_start) = events.iter().rposition(|e| *e == GameEvent::GameStart) {
            if last_start > 0 {
                log::debug!("Dropping {last_start} events from a superseded stage");
            }
            events.drain(..last_start);
        }

        let Some(game) = self.engine.game() else {
            return Vec::new();
        };
        events
            .into_iter()
            .filter_map(|event| self.view.handle_event(event, game))
            .collect()
    }

    /// Advance one frame of `dt` ms
    pub fn tick(&mut self, dt: f32) {
        self.process_pending_input();
        self.view.tick(dt, self.engine.game());
    }

    pub fn render(&self, renderer: &mut impl SceneRenderer) {
        self.view.render(renderer);
    }

    /// Add camera shake
    pub fn shake(&mut self, amount: f32) {
        self.view.shake(amount);
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn view(&self) -> &GameWorldView {
        &self.view
    }
}
