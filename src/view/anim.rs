//! Frame-based animation clips

use rand::Rng;

/// A named sprite-sheet animation
#[derive(Debug, PartialEq, Eq)]
pub struct AnimationClip {
    pub key: &'static str,
    pub frames: u32,
    /// Duration of a single frame (ms)
    pub frame_ms: u32,
    pub looping: bool,
}

impl AnimationClip {
    /// Frame to start on: random for looping clips so identical entities
    /// drift apart, the first frame otherwise
    pub fn start_frame(&self, rng: &mut impl Rng) -> u32 {
        if self.looping && self.frames > 1 {
            rng.random_range(0..self.frames)
        } else {
            0
        }
    }
}

pub const BOT_IDLE: AnimationClip = AnimationClip {
    key: "bot-idle",
    frames: 4,
    frame_ms: 125,
    looping: true,
};

pub const BOT_FALL: AnimationClip = AnimationClip {
    key: "bot-fall",
    frames: 8,
    frame_ms: 60,
    looping: false,
};

pub const BOT_FREEZE: AnimationClip = AnimationClip {
    key: "bot-freeze",
    frames: 4,
    frame_ms: 80,
    looping: false,
};

pub const PLAYER_IDLE: AnimationClip = AnimationClip {
    key: "player-idle",
    frames: 4,
    frame_ms: 150,
    looping: true,
};

pub const PLAYER_FALL: AnimationClip = AnimationClip {
    key: "player-fall",
    frames: 8,
    frame_ms: 60,
    looping: false,
};

pub const EXPLODE: AnimationClip = AnimationClip {
    key: "xplode",
    frames: 12,
    frame_ms: 40,
    looping: false,
};

/// Plays one clip at a time
#[derive(Debug, Clone, Default)]
pub struct ClipPlayer {
    clip: Option<&'static AnimationClip>,
    frame: u32,
    frame_elapsed: f32,
    finished: bool,
}

impl ClipPlayer {
    /// Start `clip` at `start_frame` (wrapped into the clip's frame range)
    pub fn play(&mut self, clip: &'static AnimationClip, start_frame: u32) {
        self.clip = Some(clip);
        self.frame = start_frame % clip.frames.max(1);
        self.frame_elapsed = 0.0;
        self.finished = false;
    }

    /// Start `clip` unless it is already the current clip.
    /// Returns whether playback (re)started.
    pub fn play_if_changed(&mut self, clip: &'static AnimationClip, start_frame: u32) -> bool {
        if self.current_key() == Some(clip.key) {
            return false;
        }
        self.play(clip, start_frame);
        true
    }

    pub fn stop(&mut self) {
        self.clip = None;
        self.frame = 0;
        self.frame_elapsed = 0.0;
        self.finished = false;
    }

    pub fn current_key(&self) -> Option<&'static str> {
        self.clip.map(|c| c.key)
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// A non-looping clip reached its last frame
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `dt` ms. Returns true on the tick a non-looping clip completes.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(clip) = self.clip else {
            return false;
        };
        if self.finished || clip.frame_ms == 0 {
            return false;
        }

        self.frame_elapsed += dt;
        let frame_ms = clip.frame_ms as f32;
        if self.frame_elapsed < frame_ms {
            return false;
        }

        let steps = (self.frame_elapsed / frame_ms).floor();
        self.frame_elapsed %= frame_ms;
        if !self.frame_elapsed.is_finite() {
            self.frame_elapsed = 0.0;
        }

        let last = clip.frames.saturating_sub(1);
        let target = self.frame as f32 + steps;
        if target <= last as f32 {
            self.frame = target as u32;
        } else if clip.looping {
            let period = clip.frames.max(1) as f32;
            self.frame = if target.is_finite() { (target % period) as u32 } else { 0 };
        } else {
            self.frame = last;
            self.finished = true;
            return true;
        }
        false
    }
}
