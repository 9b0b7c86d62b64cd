//! Timed transitions advanced by the frame clock
//!
//! Nothing here blocks: a transition is plain data that moves forward each
//! time `advance` is called with the elapsed frame time (ms).

use glam::Vec2;

/// Easing curve applied to normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// Quadratic ease-out: fast start, gentle stop
    QuadOut,
}

impl Ease {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => t * (2.0 - t),
        }
    }
}

/// Animatable subset of a visual proxy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub alpha: f32,
    pub scale: Vec2,
}

impl Pose {
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(other.position, t),
            alpha: self.alpha + (other.alpha - self.alpha) * t,
            scale: self.scale.lerp(other.scale, t),
        }
    }
}

/// A pose interpolation over a fixed duration
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    from: Pose,
    to: Pose,
    elapsed: f32,
    duration: f32,
    ease: Ease,
}

impl Transition {
    pub fn new(from: Pose, to: Pose, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
            ease,
        }
    }

    /// Final pose this transition settles on
    pub fn target(&self) -> &Pose {
        &self.to
    }

    /// Normalized progress (0-1)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Step forward by `dt` ms and return the interpolated pose
    pub fn advance(&mut self, dt: f32) -> Pose {
        self.elapsed += dt.max(0.0);
        self.current()
    }

    pub fn current(&self) -> Pose {
        if self.is_finished() {
            // Land exactly on the target, lerp at t=1 can be off by an ulp
            return self.to;
        }
        self.from.lerp(&self.to, self.ease.apply(self.progress()))
    }
}

/// Countdown for a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delay {
    remaining: f32,
}

impl Delay {
    pub fn new(ms: f32) -> Self {
        Self { remaining: ms }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Consume `dt` ms; true once the delay has elapsed
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(x: f32, alpha: f32) -> Pose {
        Pose {
            position: Vec2::new(x, 0.0),
            alpha,
            scale: Vec2::ONE,
        }
    }

    #[test]
    fn test_quad_out_curve() {
        assert_eq!(Ease::QuadOut.apply(0.0), 0.0);
        assert_eq!(Ease::QuadOut.apply(0.5), 0.75);
        assert_eq!(Ease::QuadOut.apply(1.0), 1.0);
        assert_eq!(Ease::QuadOut.apply(2.0), 1.0);
    }

    #[test]
    fn test_transition_reaches_target() {
        let mut t = Transition::new(pose(0.0, 1.0), pose(100.0, 0.0), 100.0, Ease::Linear);
        let mid = t.advance(50.0);
        assert_eq!(mid.position.x, 50.0);
        assert_eq!(mid.alpha, 0.5);
        assert!(!t.is_finished());
        let end = t.advance(80.0);
        assert_eq!(end, pose(100.0, 0.0));
        assert!(t.is_finished());
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let t = Transition::new(pose(0.0, 1.0), pose(10.0, 1.0), 0.0, Ease::Linear);
        assert!(t.is_finished());
        assert_eq!(t.current().position.x, 10.0);
    }

    #[test]
    fn test_delay() {
        let mut d = Delay::new(30.0);
        assert!(!d.tick(16.0));
        assert!(d.tick(16.0));
    }
}
