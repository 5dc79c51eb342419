//! Oraksil Arcade headless runner
//!
//! Plays both games with scripted input and logs how the runs went.
//! Usage: `oraksil-arcade [seed] [frames] [save-dir] [low|medium|high]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use oraksil_arcade::persistence::{FileStorage, MemoryStorage, Storage};
    use oraksil_arcade::platform::{self, FrameClock, InputState};
    use oraksil_arcade::sim::{Command, GameEvent, GamePhase};
    use oraksil_arcade::{BreakerGame, Game, QualityPreset, Settings, ShooterGame};

    platform::init_logging();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 120);
    let storage: Box<dyn Storage> = match args.next() {
        Some(dir) => match FileStorage::open(&dir) {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("Falling back to memory storage: {}", e);
                Box::new(MemoryStorage::new())
            }
        },
        None => Box::new(MemoryStorage::new()),
    };
    // Without a quality argument the shooter keeps its stored settings
    let quality = args.next().and_then(|name| {
        let preset = QualityPreset::from_name(&name);
        if preset.is_none() {
            log::warn!("Unknown quality '{}', ignoring it", name);
        }
        preset
    });

    log::info!("Oraksil Arcade (native) seed {} for {} frames", seed, frames);

    // Breaker: the pointer tracks the ball, so the paddle mostly keeps up
    let settings = quality.map_or_else(Settings::default, Settings::from_preset);
    log::info!("Breaker quality: {}", settings.quality.as_str());
    let mut breaker = BreakerGame::new(seed, settings);
    let mut clock = FrameClock::new();
    let mut input = InputState::new();
    let _ = breaker.command(Command::Start);
    let mut bricks_hit = 0;
    for frame in 0..frames {
        let dt = clock.frame(frame as f64 * 1000.0 / 60.0);
        let ball = breaker.state().ball.pos;
        input.pointer_move(ball.x);
        breaker.tick(&input.tick_input(), dt);
        bricks_hit += breaker
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickHit { .. }))
            .count();

        match breaker.phase() {
            GamePhase::LevelComplete => {
                let _ = breaker.command(Command::NextLevel);
            }
            GamePhase::GameOver => break,
            _ => {}
        }
    }
    let state = breaker.state();
    log::info!(
        "Breaker: score {}, level {}, lives {}, {} brick hits",
        state.score,
        state.level,
        state.lives,
        bricks_hit
    );

    // Shooter: hold fire and sweep across the field
    let mut shooter = ShooterGame::new(seed, storage);
    if let Some(quality) = quality {
        let mut settings = shooter.settings().clone();
        settings.apply_preset(quality);
        shooter.set_settings(settings);
    }
    log::info!("Shooter quality: {}", shooter.settings().quality.as_str());
    let mut clock = FrameClock::new();
    let mut input = InputState::new();
    let _ = shooter.command(Command::Start);
    input.key_down("Space");
    input.key_down("ArrowRight");
    for frame in 0..frames {
        let dt = clock.frame(frame as f64 * 1000.0 / 60.0);
        let x = shooter.state().player.rect.pos.x;
        if x > 700.0 {
            input.key_up("ArrowRight");
            input.key_down("ArrowLeft");
        } else if x < 60.0 {
            input.key_up("ArrowLeft");
            input.key_down("ArrowRight");
        }
        shooter.tick(&input.tick_input(), dt);
        for event in shooter.drain_events() {
            if let GameEvent::StageCleared { next_stage } = event {
                log::debug!("Reached stage {}", next_stage);
            }
        }
        if shooter.phase() == GamePhase::GameOver {
            break;
        }
    }

    let state = shooter.state();
    log::info!(
        "Shooter: score {}, stage {}, {} kills, {} shots",
        state.score,
        state.stage,
        state.stats.enemies_killed,
        state.stats.shots_fired
    );

    if shooter.phase() == GamePhase::GameOver {
        let new_record = shooter.is_new_record();
        match shooter.submit_score("CPU") {
            Ok(rank) => log::info!("Saved as CPU, rank {:?}, new record: {}", rank, new_record),
            Err(e) => log::warn!("Could not save run: {}", e),
        }
    }
    log::info!(
        "Records: high score {}, {} games played",
        shooter.records().high_score,
        shooter.records().total_games_played
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm_start, this is just to satisfy the compiler
}
