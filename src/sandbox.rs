//! Minimal in-memory rule engine
//!
//! Walks the player and echoes the events a real engine would emit. It
//! applies no game rules of its own; scripted helpers (`kill_bot`,
//! `finish`) let demos and tests drive deaths and stage outcomes.

use crate::model::{Bot, Game, GameEvent, GridPos, RuleEngine, SkillId, Tile};

#[derive(Debug, Clone)]
pub struct SandboxEngine {
    width: i32,
    height: i32,
    start: GridPos,
    bots: Vec<GridPos>,
    game: Option<Game>,
    events: Vec<GameEvent>,
    /// Stage counter (0-based)
    pub stage: u32,
    /// Every `move_to` target, oldest first
    pub moves: Vec<Tile>,
    pub turns: u32,
    pub skills: Vec<SkillId>,
}

impl SandboxEngine {
    /// Fully tiled `width x height` stage with the player on `start`
    pub fn new(width: i32, height: i32, start: GridPos) -> Self {
        Self {
            width,
            height,
            start,
            bots: Vec::new(),
            game: None,
            events: Vec::new(),
            stage: 0,
            moves: Vec::new(),
            turns: 0,
            skills: Vec::new(),
        }
    }

    /// Place a bot on every new stage
    pub fn with_bot(mut self, pos: GridPos) -> Self {
        self.bots.push(pos);
        self
    }

    /// Create the first stage (emits `GameStart`)
    pub fn start(&mut self) {
        self.stage = 0;
        self.new_stage();
    }

    pub fn game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut()
    }

    /// Kill `bots[index]` (emits `BotDie` then `Change`)
    pub fn kill_bot(&mut self, index: usize, collision: bool) {
        let Some(bot) = self.game.as_mut().and_then(|g| g.bots.get_mut(index)) else {
            return;
        };
        bot.dead = true;
        self.events.push(GameEvent::BotDie {
            bot: index,
            collision,
        });
        self.events.push(GameEvent::Change);
    }

    /// End the stage (emits `Change`)
    pub fn finish(&mut self, victory: bool) {
        if let Some(game) = self.game.as_mut() {
            game.over = true;
            game.victory = victory;
            self.events.push(GameEvent::Change);
        }
    }

    fn new_stage(&mut self) {
        let mut game = Game::filled(self.width, self.height, self.start);
        game.bots = self.bots.iter().copied().map(Bot::new).collect();
        self.game = Some(game);
        self.events.push(GameEvent::GameStart);
    }
}

impl RuleEngine for SandboxEngine {
    fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    fn move_to(&mut self, tile: Tile) {
        self.moves.push(tile);
        if let Some(game) = self.game.as_mut() {
            game.player.tile = tile.pos();
        }
    }

    fn end_turn(&mut self) {
        self.turns += 1;
        self.events.push(GameEvent::Change);
    }

    fn use_skill(&mut self, skill: SkillId) {
        self.skills.push(skill);
        self.events.push(GameEvent::Change);
    }

    fn advance_stage(&mut self) {
        self.stage += 1;
        self.new_stage();
    }

    fn restart_stage(&mut self) {
        self.stage = 0;
        self.new_stage();
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
