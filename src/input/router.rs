//! Input routing
//!
//! Merges keyboard and gesture intents, gates them on game state and
//! forwards valid moves to the rule engine as `move_to` + `end_turn`.
//!
//! Host listeners feed events through an [`InputSink`] obtained from
//! [`InputRouter::subscribe`]. Unsubscribing (or dropping the router) closes
//! the sink; later pushes are rejected.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::gesture::GestureController;
use super::keymap::{KeyIntent, intent_for_code};
use super::MoveIntent;
use crate::model::{RuleEngine, SkillId};
use crate::settings::Settings;

/// Raw event as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Key pressed, identified by its DOM-style code (`"KeyW"`, `"Numpad8"`)
    KeyDown(String),
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    /// Skill button pressed
    Skill(SkillId),
}

/// What routing an input did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Move forwarded and turn ended
    Moved(MoveIntent),
    /// Target tile does not exist
    Blocked(MoveIntent),
    /// Terminal stage won; advanced to the next
    StageAdvanced,
    /// Terminal stage lost (or no stage); restarted
    StageRestarted,
    SkillUsed(SkillId),
    /// Host should toggle fullscreen
    Fullscreen,
    /// Nothing to do
    Ignored,
}

#[derive(Debug, Default)]
struct InputQueue {
    events: VecDeque<RawInput>,
    open: bool,
}

/// Handle host listeners push raw input into
#[derive(Debug, Clone)]
pub struct InputSink {
    queue: Rc<RefCell<InputQueue>>,
}

impl InputSink {
    /// Queue `input`. Returns false once the subscription is closed.
    pub fn push(&self, input: RawInput) -> bool {
        let mut queue = self.queue.borrow_mut();
        if !queue.open {
            return false;
        }
        queue.events.push_back(input);
        true
    }

    pub fn is_open(&self) -> bool {
        self.queue.borrow().open
    }
}

/// Turns raw input into rule engine requests
#[derive(Debug)]
pub struct InputRouter {
    gesture: GestureController,
    subscription: Option<Rc<RefCell<InputQueue>>>,
}

impl InputRouter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            gesture: GestureController::new(settings.gesture_dead_zone),
            subscription: None,
        }
    }

    /// Open a new input subscription, closing any previous one
    pub fn subscribe(&mut self) -> InputSink {
        self.unsubscribe();
        let queue = Rc::new(RefCell::new(InputQueue {
            events: VecDeque::new(),
            open: true,
        }));
        self.subscription = Some(queue.clone());
        log::debug!("Input subscription opened");
        InputSink { queue }
    }

    /// Close the subscription and drop anything still queued
    pub fn unsubscribe(&mut self) {
        if let Some(queue) = self.subscription.take() {
            let mut queue = queue.borrow_mut();
            queue.open = false;
            queue.events.clear();
            log::debug!("Input subscription closed");
        }
    }

    /// Take every queued input, oldest first
    pub fn drain_pending(&mut self) -> Vec<RawInput> {
        match &self.subscription {
            Some(queue) => queue.borrow_mut().events.drain(..).collect(),
            None => Vec::new(),
        }
    }

    /// Route one input against the engine's current state
    pub fn route<E: RuleEngine + ?Sized>(&mut self, input: RawInput, engine: &mut E) -> RouteOutcome {
        let active = engine.game().is_some_and(|g| !g.over);
        if !active {
            return self.route_terminal(input, engine);
        }

        match input {
            RawInput::KeyDown(code) => match intent_for_code(&code) {
                Some(KeyIntent::Move(intent)) => self.try_move(intent, engine),
                Some(KeyIntent::Fullscreen) => RouteOutcome::Fullscreen,
                None => RouteOutcome::Ignored,
            },
            RawInput::PointerDown { x, y } => {
                self.gesture.start(x, y);
                RouteOutcome::Ignored
            }
            RawInput::PointerMove { x, y } => match self.gesture.drag(x, y) {
                Some(direction) => self.try_move(direction.into(), engine),
                None => RouteOutcome::Ignored,
            },
            RawInput::PointerUp => {
                self.gesture.end();
                RouteOutcome::Ignored
            }
            RawInput::Skill(skill) => {
                log::debug!("Skill {:?} requested", skill);
                engine.use_skill(skill);
                RouteOutcome::SkillUsed(skill)
            }
        }
    }

    /// With no stage or a finished stage, a press means "continue"
    fn route_terminal<E: RuleEngine + ?Sized>(&mut self, input: RawInput, engine: &mut E) -> RouteOutcome {
        match input {
            RawInput::KeyDown(_) | RawInput::PointerDown { .. } => {
                self.gesture.end();
                let victory = engine.game().is_some_and(|g| g.victory);
                if victory {
                    log::info!("Stage won, advancing");
                    engine.advance_stage();
                    RouteOutcome::StageAdvanced
                } else {
                    log::info!("Restarting stage");
                    engine.restart_stage();
                    RouteOutcome::StageRestarted
                }
            }
            RawInput::PointerUp => {
                self.gesture.end();
                RouteOutcome::Ignored
            }
            RawInput::PointerMove { .. } | RawInput::Skill(_) => RouteOutcome::Ignored,
        }
    }

    fn try_move<E: RuleEngine + ?Sized>(&mut self, intent: MoveIntent, engine: &mut E) -> RouteOutcome {
        let Some(player) = engine.game().map(|g| g.player.tile) else {
            return RouteOutcome::Ignored;
        };
        let target = player.offset(intent.dx, intent.dy);
        match engine.get_tile(target.x, target.y) {
            Some(tile) => {
                if intent.is_stay() {
                    log::debug!("Stay on ({}, {})", tile.x, tile.y);
                } else {
                    log::debug!("Move ({}, {}) -> ({}, {})", intent.dx, intent.dy, tile.x, tile.y);
                }
                engine.move_to(tile);
                engine.end_turn();
                RouteOutcome::Moved(intent)
            }
            None => {
                log::debug!("No tile at ({}, {})", target.x, target.y);
                RouteOutcome::Blocked(intent)
            }
        }
    }
}

impl Drop for InputRouter {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
