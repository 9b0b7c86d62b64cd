//! Rendering adapter
//!
//! The host engine implements [`SceneRenderer`]; the view walks its proxies
//! in draw order once per frame. [`LogRenderer`] is a headless stand-in.

use crate::view::{VisualProxy, WorldContainer};

/// Receives one frame worth of proxies, back to front
pub trait SceneRenderer {
    /// Called once per frame with the world container transform
    fn begin_frame(&mut self, container: &WorldContainer);

    /// Draw one visible proxy in container-local coordinates
    fn draw(&mut self, proxy: &VisualProxy);

    fn end_frame(&mut self) {}
}

/// Traces every draw call through `log`
#[derive(Debug, Default)]
pub struct LogRenderer {
    frame: u64,
    draws: usize,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frame
    }
}

impl SceneRenderer for LogRenderer {
    fn begin_frame(&mut self, container: &WorldContainer) {
        self.frame += 1;
        self.draws = 0;
        log::trace!(
            "frame {} at ({:.1}, {:.1}) x{:.3}",
            self.frame,
            container.position.x,
            container.position.y,
            container.scale
        );
    }

    fn draw(&mut self, proxy: &VisualProxy) {
        self.draws += 1;
        log::trace!(
            "  {} #{} at ({:.1}, {:.1}) alpha {:.2}",
            proxy.texture,
            proxy.current_frame(),
            proxy.position.x,
            proxy.position.y,
            proxy.alpha
        );
    }

    fn end_frame(&mut self) {
        log::trace!("frame {} done: {} draws", self.frame, self.draws);
    }
}
