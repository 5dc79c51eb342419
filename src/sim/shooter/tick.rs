//! Space-shooter simulation step
//!
//! Order per frame: player input, enemy motion and escapes, bullet culling,
//! enemy fire, collisions, then the stage-clear bookkeeping.

use glam::Vec2;
use rand::Rng;

use super::state::{RunResult, ShooterState};
use super::wave;
use crate::consts::shooter::*;
use crate::sim::collision::rects_overlap;
use crate::sim::entity::{self, Bounded, Particle};
use crate::sim::session::{Countdown, GameEvent, GamePhase, TickInput};

/// Advance the shooter by `dt_ms` milliseconds
pub fn tick(state: &mut ShooterState, input: &TickInput, dt_ms: f32) {
    match state.phase {
        GamePhase::StagePause => {
            tick_stage_pause(state, dt_ms);
            return;
        }
        GamePhase::Playing => {}
        _ => return,
    }

    state.stats.play_time_ms += dt_ms as f64;

    if input.fire {
        if let Some(bullet) = state.player.try_shoot() {
            state.bullets.push(bullet);
            state.stats.shots_fired += 1;
            state.events.push(GameEvent::ShotFired);
        }
    }
    let field = state.field;
    state.player.update(input, dt_ms, field);

    if update_enemies(state, dt_ms) {
        game_over(state);
        return;
    }

    for bullet in state.bullets.iter_mut() {
        bullet.advance(dt_ms);
    }
    state.bullets.retain(|b| b.rect.pos.y > 0.0);
    for bullet in state.enemy_bullets.iter_mut() {
        bullet.advance(dt_ms);
    }
    state.enemy_bullets.retain(|b| b.rect.pos.y < field.y);

    entity::advance_particles(&mut state.particles, dt_ms);
    if state.screen_flash_ms > 0.0 {
        state.screen_flash_ms = (state.screen_flash_ms - dt_ms).max(0.0);
    }

    enemy_fire(state, dt_ms);

    player_bullets_vs_enemies(state);
    enemy_bullets_vs_player(state);
    enemies_vs_player(state);

    if state.lives == 0 {
        game_over(state);
        return;
    }

    if let Some(clear) = state.stage_clear.as_mut() {
        if clear.tick(dt_ms) {
            state.enter_stage_pause();
            return;
        }
    }

    if state.enemies.is_empty() && state.stage_clear.is_none() {
        state.stage += 1;
        state.stage_clear = Some(Countdown::new(STAGE_CLEAR_DELAY_MS));
        state.events.push(GameEvent::StageCleared {
            next_stage: state.stage,
        });
        log::info!("Wave cleared, next stage {}", state.stage);
    }
}

/// Spawn the wave for the current stage
pub fn spawn_next_wave(state: &mut ShooterState) {
    let width = state.field.x;
    state.enemies = wave::spawn_wave(state.stage, width, &mut state.rng);
    state.enemy_shoot_timer_ms = 0.0;
    state.events.push(GameEvent::WaveSpawned {
        stage: state.stage,
        enemies: state.enemies.len(),
    });
}

fn tick_stage_pause(state: &mut ShooterState, dt_ms: f32) {
    state.stats.play_time_ms += dt_ms as f64;
    entity::advance_particles(&mut state.particles, dt_ms);
    state.screen_flash_ms = (state.screen_flash_ms - dt_ms).max(0.0);

    let done = match state.stage_pause.as_mut() {
        Some(pause) => pause.tick(dt_ms),
        None => true,
    };
    if done {
        state.stage_pause = None;
        spawn_next_wave(state);
        state.phase = GamePhase::Playing;
    }
}

/// Move enemies and handle the ones that slipped past the bottom edge.
/// Returns true when that cost the last life.
fn update_enemies(state: &mut ShooterState, dt_ms: f32) -> bool {
    let ctx = state.move_context();
    let floor = state.field.y;
    let mut escaped = 0;

    let rng = &mut state.rng;
    state.enemies.retain_mut(|enemy| {
        enemy.advance(&ctx, rng, dt_ms);
        if enemy.body.pos.y > floor {
            escaped += 1;
            return false;
        }
        true
    });

    for _ in 0..escaped {
        state.lives = state.lives.saturating_sub(1);
        state.screen_flash_ms = SCREEN_FLASH_MS;
        let width = state.field.x;
        let sparks: Vec<Particle> = (0..WARNING_PARTICLES)
            .map(|_| {
                let x = state.rng.random::<f32>() * width;
                Particle::warning(&mut state.rng, Vec2::new(x, floor - 10.0))
            })
            .collect();
        entity::push_capped(&mut state.particles, sparks, state.max_particles);
        state.events.push(GameEvent::EnemyEscaped);
        state.events.push(GameEvent::LifeLost {
            remaining: state.lives,
        });
        log::debug!("Enemy escaped, {} lives left", state.lives);

        if state.lives == 0 {
            return true;
        }
    }
    false
}

/// Every so often a few ready enemies open fire
fn enemy_fire(state: &mut ShooterState, dt_ms: f32) {
    state.enemy_shoot_timer_ms += dt_ms;
    let interval = (1500.0 - 100.0 * state.stage as f32).max(500.0) + state.rng.random::<f32>() * 1000.0;
    if state.enemy_shoot_timer_ms <= interval {
        return;
    }
    state.enemy_shoot_timer_ms = 0.0;

    let shooters = (state.stage / 3 + 1).min(MAX_SIMULTANEOUS_SHOOTERS) as usize;
    let mut ready: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.can_shoot())
        .map(|(i, _)| i)
        .collect();

    for _ in 0..shooters {
        if ready.is_empty() {
            break;
        }
        let pick = ready.swap_remove(state.rng.random_range(0..ready.len()));
        if let Some(bullet) = state.enemies[pick].shoot(&mut state.rng) {
            state.enemy_bullets.push(bullet);
        }
    }
}

/// Each player bullet hits at most one enemy
fn player_bullets_vs_enemies(state: &mut ShooterState) {
    for b in (0..state.bullets.len()).rev() {
        let bullet_rect = state.bullets[b].rect;
        let Some(e) = state
            .enemies
            .iter()
            .rposition(|enemy| rects_overlap(&bullet_rect, &enemy.bounds()))
        else {
            continue;
        };

        state.bullets.remove(b);
        let destroyed = state.enemies[e].hit();
        state.events.push(GameEvent::EnemyHit { destroyed });
        if !destroyed {
            continue;
        }

        let enemy = state.enemies.remove(e);
        let value = enemy.score_value();
        state.score += value;
        state.stats.enemies_killed += 1;
        explode(state, enemy.bounds().center());
        state.events.push(GameEvent::EnemyKilled {
            kind: enemy.kind,
            score: value,
        });
        log::debug!("{:?} destroyed (+{})", enemy.kind, value);
    }
}

fn enemy_bullets_vs_player(state: &mut ShooterState) {
    if state.player.is_invulnerable() {
        return;
    }
    let player = state.player.bounds();
    if let Some(b) = state
        .enemy_bullets
        .iter()
        .position(|bullet| rects_overlap(&bullet.rect, &player))
    {
        state.enemy_bullets.remove(b);
        player_hit(state);
    }
}

fn enemies_vs_player(state: &mut ShooterState) {
    if state.player.is_invulnerable() {
        return;
    }
    let player = state.player.bounds();
    if let Some(e) = state
        .enemies
        .iter()
        .position(|enemy| rects_overlap(&enemy.bounds(), &player))
    {
        state.enemies.remove(e);
        player_hit(state);
    }
}

fn player_hit(state: &mut ShooterState) {
    state.lives = state.lives.saturating_sub(1);
    let pos = state.player.rect.pos;
    explode(state, pos);
    state.player.make_invulnerable();
    state.events.push(GameEvent::PlayerHit);
    state.events.push(GameEvent::LifeLost {
        remaining: state.lives,
    });
    log::debug!("Player hit, {} lives left", state.lives);
}

fn explode(state: &mut ShooterState, at: Vec2) {
    let sparks: Vec<Particle> = (0..EXPLOSION_PARTICLES)
        .map(|_| Particle::explosion(&mut state.rng, at))
        .collect();
    entity::push_capped(&mut state.particles, sparks, state.max_particles);
}

fn game_over(state: &mut ShooterState) {
    state.phase = GamePhase::GameOver;
    state.stage_clear = None;
    state.stage_pause = None;
    let result = RunResult {
        score: state.score,
        stage: state.stage,
        enemies_killed: state.stats.enemies_killed,
        accuracy: state.stats.accuracy(),
        game_time_secs: (state.stats.play_time_ms / 1000.0).floor(),
    };
    log::info!(
        "Shooter game over: score {}, stage {}, {} kills, {}% accuracy",
        result.score,
        result.stage,
        result.enemies_killed,
        result.accuracy
    );
    state.events.push(GameEvent::GameOver { score: state.score });
    state.pending_result = Some(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::movement::EnemyKind;
    use crate::sim::shooter::state::{Bullet, Enemy};
    use proptest::prelude::*;

    fn playing_state() -> ShooterState {
        let mut state = ShooterState::new(9);
        state.restart();
        state.events.clear();
        state
    }

    fn basic_enemy(state: &mut ShooterState, x: f32, y: f32) -> Enemy {
        Enemy::new(Vec2::new(x, y), EnemyKind::Basic, 1.0, &mut state.rng)
    }

    #[test]
    fn test_start_waits_for_stage_banner() {
        let mut state = ShooterState::new(1);
        state.start();
        assert_eq!(state.phase, GamePhase::StagePause);

        tick(&mut state, &TickInput::default(), 1999.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.phase, GamePhase::StagePause);

        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), 8);
    }

    #[test]
    fn test_stage_clear_schedules_next_wave() {
        let mut state = playing_state();
        state.stage = 3;
        state.enemies.clear();

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.stage, 4);
        assert!(state.stage_clear.is_some());
        assert!(state.events.contains(&GameEvent::StageCleared { next_stage: 4 }));

        tick(&mut state, &TickInput::default(), 300.0);
        assert_eq!(state.phase, GamePhase::StagePause);
        assert!(state.stage_clear.is_none());

        tick(&mut state, &TickInput::default(), 1999.0);
        assert!(state.enemies.is_empty());

        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), 20);
    }

    #[test]
    fn test_bullet_destroys_enemy() {
        let mut state = playing_state();
        let enemy = basic_enemy(&mut state, 100.0, 100.0);
        let keeper = basic_enemy(&mut state, 600.0, 100.0);
        state.enemies = vec![keeper, enemy];
        state
            .bullets
            .push(Bullet::new(Vec2::new(110.0, 110.0), PLAYER_BULLET_SPEED, PLAYER_BULLET_COLOR));

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.enemies.len(), 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 100);
        assert_eq!(state.stats.enemies_killed, 1);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert!(state.events.contains(&GameEvent::EnemyKilled {
            kind: EnemyKind::Basic,
            score: 100
        }));
    }

    #[test]
    fn test_tough_enemy_needs_two_hits() {
        let mut state = playing_state();
        let enemy = Enemy::new(Vec2::new(100.0, 100.0), EnemyKind::Advanced, 1.0, &mut state.rng);
        state.enemies = vec![enemy];
        state
            .bullets
            .push(Bullet::new(Vec2::new(110.0, 110.0), PLAYER_BULLET_SPEED, PLAYER_BULLET_COLOR));

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].health, 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_enemy_bullet_costs_a_life() {
        let mut state = playing_state();
        let pos = state.player.rect.pos + Vec2::new(10.0, 10.0);
        state
            .enemy_bullets
            .push(Bullet::new(pos, ENEMY_BULLET_SPEED, ENEMY_BULLET_COLOR));

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, 2);
        assert!(state.player.is_invulnerable());
        assert!(state.enemy_bullets.is_empty());
        assert!(state.events.contains(&GameEvent::PlayerHit));
    }

    #[test]
    fn test_invulnerable_player_ignores_hits() {
        let mut state = playing_state();
        state.player.make_invulnerable();
        let pos = state.player.rect.pos + Vec2::new(10.0, 10.0);
        state
            .enemy_bullets
            .push(Bullet::new(pos, ENEMY_BULLET_SPEED, ENEMY_BULLET_COLOR));
        let rammer = basic_enemy(&mut state, pos.x, pos.y);
        state.enemies.push(rammer);
        let before = state.enemies.len();

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, 3);
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(state.enemies.len(), before);
    }

    #[test]
    fn test_ramming_enemy_is_removed() {
        let mut state = playing_state();
        let pos = state.player.rect.pos;
        let rammer = basic_enemy(&mut state, pos.x, pos.y);
        let keeper = basic_enemy(&mut state, 600.0, 100.0);
        state.enemies = vec![keeper, rammer];

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, 2);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_escaped_enemy_costs_a_life() {
        let mut state = playing_state();
        let runner = basic_enemy(&mut state, 100.0, 601.0);
        let keeper = basic_enemy(&mut state, 600.0, 100.0);
        state.enemies = vec![keeper, runner];

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, 2);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.screen_flash_ms, SCREEN_FLASH_MS);
        assert_eq!(state.particles.len(), WARNING_PARTICLES);
        assert!(state.events.contains(&GameEvent::EnemyEscaped));
    }

    #[test]
    fn test_last_life_ends_run_with_result() {
        let mut state = playing_state();
        state.lives = 1;
        state.score = 1234;
        state.stats.shots_fired = 4;
        state.stats.enemies_killed = 1;
        state.stats.play_time_ms = 61_500.0;
        let runner = basic_enemy(&mut state, 100.0, 601.0);
        state.enemies = vec![runner];

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::GameOver);
        let result = state.pending_result.clone().expect("result is pending");
        assert_eq!(result.score, 1234);
        assert_eq!(result.accuracy, 25);
        assert_eq!(result.game_time_secs, 61.0);

        let player_before = state.player.rect.pos;
        let input = TickInput {
            left: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, 16.0);
        assert_eq!(state.player.rect.pos, player_before);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = playing_state();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);
        tick(&mut state, &input, 100.0);
        tick(&mut state, &input, 100.0);
        assert_eq!(state.stats.shots_fired, 1);
        // The cooldown ran out at the end of the last step
        tick(&mut state, &input, 0.0);
        assert_eq!(state.stats.shots_fired, 2);
    }

    #[test]
    fn test_restart_drops_pending_banner() {
        let mut state = ShooterState::new(4);
        state.start();
        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.stage_pause.is_none());

        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 100.0);
        }
        let waves = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::WaveSpawned { .. }))
            .count();
        assert_eq!(waves, 1);
        assert_eq!(state.stage, 1);
    }

    #[test]
    fn test_enemies_eventually_fire() {
        let mut state = playing_state();
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), 100.0);
        }
        assert!(!state.enemy_bullets.is_empty() || state.enemies.iter().any(|e| !e.can_shoot()));
    }

    proptest! {
        #[test]
        fn lives_never_negative(
            seed in 0u64..500,
            steps in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), 0.0f32..100.0),
                1..300,
            ),
        ) {
            let mut state = ShooterState::new(seed);
            state.restart();
            for (left, right, fire, dt) in steps {
                let input = TickInput { left, right, fire, ..Default::default() };
                let was_over = state.phase == GamePhase::GameOver;
                tick(&mut state, &input, dt);
                if state.lives == 0 {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                    prop_assert!(state.pending_result.is_some());
                }
                if was_over {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
            }
        }
    }
}
