//! Live (model, view) bindings for the current stage
//!
//! Bindings are created only while the world is rebuilt and are released
//! wholesale by [`EntityViewRegistry::purge`]. Iteration order is insertion
//! order so jitter drawn while iterating is reproducible under a fixed seed.

use rand::Rng;

use super::anim::{BOT_IDLE, PLAYER_IDLE};
use super::proxy::{EntityKind, EntityRef, ViewState, VisualProxy};
use super::transform::CoordinateTransform;
use super::tween::Transition;
use crate::hsl_to_rgb;
use crate::model::{Bot, Decoy, Player, Tile};

/// Sheet frame showing the decoy
const DECOY_FRAME: u32 = 30;

/// One model entity paired with the proxy that reflects it
#[derive(Debug, Clone)]
pub struct EntityBinding {
    pub entity: EntityRef,
    pub view: VisualProxy,
    /// State the proxy currently presents
    pub state: ViewState,
    /// In-flight re-pose, if any
    pub transition: Option<Transition>,
}

impl EntityBinding {
    fn new(entity: EntityRef, view: VisualProxy) -> Self {
        Self {
            entity,
            view,
            state: ViewState::Idle,
            transition: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }
}

/// Ordered owner of every entity binding
#[derive(Debug, Default)]
pub struct EntityViewRegistry {
    bindings: Vec<EntityBinding>,
    player: Option<usize>,
    decoy: Option<usize>,
}

impl EntityViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every proxy. Safe on an empty registry.
    /// Returns the number of bindings released.
    pub fn purge(&mut self) -> usize {
        let released = self.bindings.len();
        self.bindings.clear();
        self.player = None;
        self.decoy = None;
        released
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind `Game::tiles[index]`
    pub fn bind_tile(
        &mut self,
        index: usize,
        model: &Tile,
        transform: &CoordinateTransform,
        rng: &mut impl Rng,
    ) -> &EntityBinding {
        let view = tile_proxy(model, rng).at(transform.tile_pos(model.pos()));
        self.push(EntityBinding::new(EntityRef::Tile(index), view))
    }

    /// Bind `Game::bots[index]`
    pub fn bind_bot(
        &mut self,
        index: usize,
        model: &Bot,
        transform: &CoordinateTransform,
        rng: &mut impl Rng,
    ) -> &EntityBinding {
        let mut view = VisualProxy::new("bot")
            .with_scale(0.175)
            .with_origin(0.4, 0.45)
            .at(transform.actor_pos(model.tile));
        view.anim.play(&BOT_IDLE, BOT_IDLE.start_frame(rng));
        self.push(EntityBinding::new(EntityRef::Bot(index), view))
    }

    /// Bind the player. A second call before [`Self::purge`] replaces the
    /// previous player binding in place.
    pub fn bind_player(
        &mut self,
        model: &Player,
        transform: &CoordinateTransform,
        rng: &mut impl Rng,
    ) -> &EntityBinding {
        let mut view = VisualProxy::new("player")
            .with_scale(0.25)
            .with_origin(0.4, 0.5)
            .at(transform.actor_pos(model.tile));
        view.anim.play(&PLAYER_IDLE, PLAYER_IDLE.start_frame(rng));
        let binding = EntityBinding::new(EntityRef::Player, view);
        let slot = self.player;
        let index = self.place_singleton(slot, binding);
        self.player = Some(index);
        &self.bindings[index]
    }

    /// Bind the decoy. A second call before [`Self::purge`] replaces the
    /// previous decoy binding in place.
    pub fn bind_decoy(&mut self, model: &Decoy, transform: &CoordinateTransform) -> &EntityBinding {
        let mut view = VisualProxy::new("sheet_b")
            .with_scale(0.15)
            .with_origin(0.4, 0.4)
            .at(transform.actor_pos(model.tile));
        view.frame = DECOY_FRAME;
        view.visible = model.active;
        let binding = EntityBinding::new(EntityRef::Decoy, view);
        let slot = self.decoy;
        let index = self.place_singleton(slot, binding);
        self.decoy = Some(index);
        &self.bindings[index]
    }

    /// All bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &EntityBinding> {
        self.bindings.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EntityBinding> {
        self.bindings.iter_mut()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &EntityBinding> {
        self.of_kind(EntityKind::Tile)
    }

    pub fn bots(&self) -> impl Iterator<Item = &EntityBinding> {
        self.of_kind(EntityKind::Bot)
    }

    pub fn player(&self) -> Option<&EntityBinding> {
        self.player.map(|i| &self.bindings[i])
    }

    pub fn decoy(&self) -> Option<&EntityBinding> {
        self.decoy.map(|i| &self.bindings[i])
    }

    pub fn decoy_mut(&mut self) -> Option<&mut EntityBinding> {
        self.decoy.map(|i| &mut self.bindings[i])
    }

    /// Binding reflecting `entity`, if bound
    pub fn get(&self, entity: EntityRef) -> Option<&EntityBinding> {
        match entity {
            EntityRef::Player => self.player(),
            EntityRef::Decoy => self.decoy(),
            _ => self.bindings.iter().find(|b| b.entity == entity),
        }
    }

    fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &EntityBinding> {
        self.bindings.iter().filter(move |b| b.kind() == kind)
    }

    fn push(&mut self, binding: EntityBinding) -> &EntityBinding {
        self.bindings.push(binding);
        &self.bindings[self.bindings.len() - 1]
    }

    fn place_singleton(&mut self, slot: Option<usize>, binding: EntityBinding) -> usize {
        match slot {
            Some(index) => {
                log::warn!("{:?} bound twice without purge; replacing", binding.kind());
                self.bindings[index] = binding;
                index
            }
            None => {
                self.bindings.push(binding);
                self.bindings.len() - 1
            }
        }
    }
}

/// Slightly irregular floor tile with a checkerboard tint
fn tile_proxy(model: &Tile, rng: &mut impl Rng) -> VisualProxy {
    let even = (model.x + model.y) % 2 == 0;
    let (h, s, l) = if even {
        (
            rng.random_range(0.05f32..0.07) + 0.5,
            rng.random_range(0.48f32..0.66),
            rng.random_range(0.62f32..0.72),
        )
    } else {
        (
            rng.random_range(0.09f32..0.11) + 0.4,
            rng.random_range(0.44f32..0.72),
            rng.random_range(0.77f32..0.82),
        )
    };

    let mut view = VisualProxy::new("tile")
        .with_scale(rng.random_range(0.54f32..0.56))
        .with_rotation(rng.random_range(-0.05f32..0.05));
    view.tint = Some(hsl_to_rgb(h, s, l));
    view
}
