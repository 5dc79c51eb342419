//! Brick-breaker simulation step
//!
//! Order per frame: paddle input, ball motion, walls and floor, ball vs
//! paddle, ball vs bricks (first hit only), power-ups, particles.

use rand::Rng;

use super::state::{BreakerState, PowerUp, PowerUpKind};
use crate::consts::breaker::*;
use crate::sim::collision::{self, rects_overlap};
use crate::sim::entity::{self, Particle};
use crate::sim::session::{GameEvent, GamePhase, TickInput};

/// Advance the breaker by `dt_ms` milliseconds
pub fn tick(state: &mut BreakerState, input: &TickInput, dt_ms: f32) {
    if !state.phase.is_simulating() {
        return;
    }

    state.paddle.update(input, dt_ms, state.field.x);
    state.ball.advance(dt_ms);

    let ball = &mut state.ball;
    let contact =
        collision::ball_wall_collision(&mut ball.pos, &mut ball.vel, ball.radius, state.field.x, TOP_WALL_Y);
    if contact.side || contact.top {
        state.events.push(GameEvent::WallBounce);
    }

    // Ball fell past the paddle
    if state.ball.pos.y > state.field.y {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::LifeLost {
            remaining: state.lives,
        });
        if state.lives == 0 {
            game_over(state);
            return;
        }
        state.respawn_ball();
    }

    if state.ball.overlaps(&state.paddle.rect) {
        state.ball.bounce_off_paddle(&state.paddle.rect);
        state.score += PADDLE_HIT_SCORE;
        state.events.push(GameEvent::PaddleHit);
    }

    // Newest bricks first; only the first overlapping brick responds
    if let Some(index) = state
        .bricks
        .iter()
        .rposition(|brick| state.ball.overlaps(&brick.rect))
    {
        let brick_rect = state.bricks[index].rect;
        state.ball.bounce_off_brick(&brick_rect);

        let destroyed = state.bricks[index].hit();
        state.events.push(GameEvent::BrickHit { destroyed });
        if destroyed {
            let brick = state.bricks.remove(index);
            destroy_brick(state, brick.rect.center(), brick.color, brick.score_value());

            if state.bricks.is_empty() {
                state.phase = GamePhase::LevelComplete;
                state.events.push(GameEvent::LevelComplete { level: state.level });
                log::info!("Level {} complete, score {}", state.level, state.score);
                return;
            }
        }
    }

    update_power_ups(state, dt_ms);
    entity::advance_particles(&mut state.particles, dt_ms);
}

/// Score, debris and a possible power-up drop for a destroyed brick
fn destroy_brick(state: &mut BreakerState, center: glam::Vec2, color: u32, value: u64) {
    let debris: Vec<Particle> = (0..BRICK_PARTICLES)
        .map(|_| Particle::debris(&mut state.rng, center, color))
        .collect();
    entity::push_capped(&mut state.particles, debris, state.max_particles);

    state.score += value;
    state.bricks_destroyed += 1;
    log::debug!("Brick destroyed (+{}), {} left", value, state.bricks.len());

    if state.rng.random_bool(POWERUP_DROP_CHANCE) {
        let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
        state.power_ups.push(PowerUp::new(center, kind));
    }
}

fn update_power_ups(state: &mut BreakerState, dt_ms: f32) {
    let mut collected = Vec::new();
    let paddle = state.paddle.rect;
    let floor = state.field.y;

    state.power_ups.retain_mut(|power_up| {
        power_up.advance(dt_ms);
        if rects_overlap(&power_up.rect, &paddle) {
            collected.push(power_up.kind);
            return false;
        }
        power_up.rect.pos.y <= floor
    });

    for kind in collected {
        apply_power_up(state, kind);
    }
}

fn apply_power_up(state: &mut BreakerState, kind: PowerUpKind) {
    state.score += POWERUP_SCORE;
    match kind {
        PowerUpKind::Expand => state.paddle.expand(state.field.x),
        PowerUpKind::MultiBall => {}
        PowerUpKind::Speed => state.ball.speed_up(),
        PowerUpKind::Life => state.lives += 1,
    }
    state.events.push(GameEvent::PowerUpCollected(kind));
    log::debug!("Power-up {:?} collected", kind);
}

fn game_over(state: &mut BreakerState) {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!(
        "Breaker game over: score {}, level {}, {} bricks",
        state.score,
        state.level,
        state.bricks_destroyed
    );
}
