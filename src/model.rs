//! Read-only game model consumed by the view layer
//!
//! The rule engine owns these types. The view only ever reads them: it never
//! decides movement legality, deaths or stage outcomes.

use serde::{Deserialize, Serialize};

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring position displaced by `(dx, dy)`
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A floor tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    /// Tile has been destroyed and no longer supports actors
    #[serde(default)]
    pub busted: bool,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, busted: false }
    }

    pub const fn pos(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// A hostile bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bot {
    pub tile: GridPos,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub frozen: bool,
}

impl Bot {
    pub const fn new(tile: GridPos) -> Self {
        Self {
            tile,
            dead: false,
            frozen: false,
        }
    }
}

/// The player-controlled actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Player {
    pub tile: GridPos,
    #[serde(default)]
    pub dead: bool,
}

/// Lure that bots chase while active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Decoy {
    pub tile: GridPos,
    #[serde(default)]
    pub active: bool,
}

/// Snapshot of one stage as exposed by the rule engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Grid width (W)
    pub width: i32,
    /// Grid height (H)
    pub height: i32,
    pub tiles: Vec<Tile>,
    pub bots: Vec<Bot>,
    pub player: Player,
    pub decoy: Decoy,
    /// Stage reached a terminal state
    #[serde(default)]
    pub over: bool,
    /// Terminal state was a win
    #[serde(default)]
    pub victory: bool,
}

impl Game {
    /// Stage with a fully tiled `width x height` floor and no bots
    pub fn filled(width: i32, height: i32, player: GridPos) -> Self {
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(x, y)))
            .collect();
        Self {
            width,
            height,
            tiles,
            bots: Vec::new(),
            player: Player {
                tile: player,
                dead: false,
            },
            decoy: Decoy {
                tile: player,
                active: false,
            },
            over: false,
            victory: false,
        }
    }

    /// Whether `pos` lies inside `[0, W) x [0, H)`
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Tile at `(x, y)`, if any
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.x == x && t.y == y)
    }
}

/// Skill identifier forwarded verbatim to the rule engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub u32);

/// Notifications emitted by the rule engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new stage was created; the world must be rebuilt
    GameStart,
    /// Model state changed; the world must be re-posed
    Change,
    /// A bot died. `bot` indexes `Game::bots`
    BotDie { bot: usize, collision: bool },
}

/// Interface of the turn-based rule engine the view observes and drives
pub trait RuleEngine {
    /// Current stage, if one is active
    fn game(&self) -> Option<&Game>;

    /// Tile at `(x, y)` in the current stage
    fn get_tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.game().and_then(|g| g.tile_at(x, y)).copied()
    }

    /// Move the player onto `tile`
    fn move_to(&mut self, tile: Tile);

    /// Finish the player's turn; bots act and `Change` is emitted
    fn end_turn(&mut self);

    /// Activate a skill
    fn use_skill(&mut self, skill: SkillId);

    /// Continue to the next stage after a victory
    fn advance_stage(&mut self);

    /// Restart the current run after a defeat
    fn restart_stage(&mut self);

    /// Take all events emitted since the last call, oldest first
    fn drain_events(&mut self) -> Vec<GameEvent>;
}
