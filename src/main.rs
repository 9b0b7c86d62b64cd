//! Botgrid headless demo
//!
//! Runs a scripted session on the sandbox engine and traces every frame
//! through the logging renderer. Pass a settings JSON path as the first
//! argument to override the defaults; set `RUST_LOG=trace` to see draws.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use botgrid::input::RawInput;
    use botgrid::render::LogRenderer;
    use botgrid::sandbox::SandboxEngine;
    use botgrid::{GameScreen, GridPos, RuleEngine, Settings};
    use glam::Vec2;

    env_logger::init();
    log::info!("Botgrid (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let rest = Vec2::new(settings.stage_width * 0.5, settings.stage_width * 0.5);

    let mut engine = SandboxEngine::new(5, 5, GridPos::new(2, 2))
        .with_bot(GridPos::new(0, 0))
        .with_bot(GridPos::new(4, 1));
    engine.start();

    let mut screen = GameScreen::new(engine, settings, rest);
    let sink = screen.subscribe();
    let mut renderer = LogRenderer::new();
    let frame_ms = 1000.0 / 60.0;

    let mut run_frames = |screen: &mut GameScreen<SandboxEngine>, frames: u32| {
        for _ in 0..frames {
            screen.tick(frame_ms);
            screen.render(&mut renderer);
        }
    };

    // Keyboard: step east, then north-west
    sink.push(RawInput::KeyDown("KeyD".into()));
    run_frames(&mut screen, 10);
    sink.push(RawInput::KeyDown("Numpad7".into()));
    run_frames(&mut screen, 10);

    // Swipe down
    sink.push(RawInput::PointerDown { x: 300.0, y: 300.0 });
    sink.push(RawInput::PointerMove { x: 302.0, y: 340.0 });
    sink.push(RawInput::PointerUp);
    run_frames(&mut screen, 10);

    // A collision kill with a bit of shake
    screen.engine_mut().kill_bot(0, true);
    screen.pump_events();
    screen.shake(6.0);
    run_frames(&mut screen, 45);

    // Lose the stage; the next press restarts
    screen.engine_mut().finish(false);
    screen.pump_events();
    sink.push(RawInput::KeyDown("KeyW".into()));
    run_frames(&mut screen, 10);

    screen.unsubscribe();

    let engine = screen.engine();
    log::info!(
        "Session done: {} moves, {} turns, stage {}, {} frames rendered",
        engine.moves.len(),
        engine.turns,
        engine.stage,
        renderer.frames()
    );
    if let Some(player) = engine.game().map(|g| g.player.tile) {
        log::info!("Player back at ({}, {})", player.x, player.y);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host engine drives GameScreen directly on the web
}
