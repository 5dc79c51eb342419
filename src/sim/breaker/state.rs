//! Brick-breaker entities and session state

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::breaker::*;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, START_LIVES};
use crate::sim::collision::{self, BounceAxis};
use crate::sim::entity::{Bounded, Particle, Rect, Trail};
use crate::sim::session::{Countdown, GameEvent, GamePhase, TickInput};

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    pub rect: Rect,
    /// Width before any expansion
    pub base_width: f32,
    pub speed: f32,
    /// Time left on the expand power-up
    pub expand: Option<Countdown>,
}

impl Paddle {
    pub fn new(field: Vec2) -> Self {
        Self {
            rect: Rect::new(
                field.x / 2.0 - PADDLE_WIDTH / 2.0,
                field.y - PADDLE_BOTTOM_OFFSET,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ),
            base_width: PADDLE_WIDTH,
            speed: PADDLE_SPEED,
            expand: None,
        }
    }

    /// Keyboard moves at fixed speed; with no key held the paddle centers
    /// on the pointer, clamped to the field
    pub fn update(&mut self, input: &TickInput, dt_ms: f32, field_width: f32) {
        let step = self.speed * dt_ms / 1000.0;
        let max_x = (field_width - self.rect.size.x).max(0.0);

        if input.left && self.rect.pos.x > 0.0 {
            self.rect.pos.x -= step;
        }
        if input.right && self.rect.pos.x < max_x {
            self.rect.pos.x += step;
        }
        if input.left || input.right {
            self.rect.pos.x = self.rect.pos.x.clamp(0.0, max_x);
        } else {
            if let Some(pointer_x) = input.pointer_x {
                self.rect.pos.x = (pointer_x - self.rect.size.x / 2.0).clamp(0.0, max_x);
            }
        }

        if let Some(expand) = &mut self.expand {
            if expand.tick(dt_ms) {
                self.rect.size.x = self.base_width;
                self.expand = None;
            }
        }
    }

    /// Widen the paddle in place, pulled back inside the field if it now
    /// sticks out; picking up another expand restarts the timer
    pub fn expand(&mut self, field_width: f32) {
        self.rect.size.x = self.base_width * PADDLE_EXPAND_FACTOR;
        let max_x = (field_width - self.rect.size.x).max(0.0);
        self.rect.pos.x = self.rect.pos.x.clamp(0.0, max_x);
        self.expand = Some(Countdown::new(PADDLE_EXPAND_MS));
    }

    pub fn is_expanded(&self) -> bool {
        self.expand.is_some()
    }
}

impl Bounded for Paddle {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// The ball (position is its center)
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Speed magnitude at spawn; paddle bounces use base × multiplier
    pub base_speed: f32,
    pub speed_multiplier: f32,
    pub trail: Trail,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        let vel = Vec2::new(BALL_START_VX, BALL_START_VY);
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            base_speed: vel.length(),
            speed_multiplier: 1.0,
            trail: Trail::new(TRAIL_LENGTH),
        }
    }

    /// Move by velocity and remember the new position for the trail
    pub fn advance(&mut self, dt_ms: f32) {
        self.pos += self.vel * dt_ms / 1000.0;
        self.trail.push(self.pos);
    }

    /// Back to the spawn point heading up, random horizontal direction
    pub fn reset(&mut self, pos: Vec2, rng: &mut impl Rng) {
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.pos = pos;
        self.vel = Vec2::new(self.base_speed * sign * BALL_RESET_X_FACTOR, -self.base_speed);
        self.speed_multiplier = 1.0;
        self.trail.clear();
    }

    /// Takes effect on the next paddle bounce
    pub fn speed_up(&mut self) {
        self.speed_multiplier = (self.speed_multiplier * BALL_SPEED_UP).min(BALL_MAX_MULTIPLIER);
    }

    pub fn current_speed(&self) -> f32 {
        self.base_speed * self.speed_multiplier
    }

    pub fn overlaps(&self, rect: &Rect) -> bool {
        collision::circle_rect_overlap(self.pos, self.radius, rect)
    }

    /// Relaunch from the paddle: hit offset across the paddle maps linearly
    /// onto the launch cone, 0 at the center
    pub fn bounce_off_paddle(&mut self, paddle: &Rect) {
        let hit = ((self.pos.x - paddle.left()) / paddle.size.x).clamp(0.0, 1.0);
        let angle = (hit - 0.5) * 2.0 * PADDLE_LAUNCH_HALF_ANGLE;
        let speed = self.current_speed();
        self.vel = Vec2::new(angle.sin() * speed, -angle.cos() * speed);
        self.pos.y = paddle.top() - self.radius;
    }

    /// Flip the velocity component of the face with the smaller penetration
    pub fn bounce_off_brick(&mut self, brick: &Rect) -> BounceAxis {
        let axis = collision::penetration_axis(self.pos, self.radius, brick);
        self.vel = collision::reflect_axis(self.vel, axis);
        axis
    }
}

/// A brick
#[derive(Debug, Clone)]
pub struct Brick {
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    pub color: u32,
}

impl Brick {
    pub fn new(rect: Rect, color: u32, health: u32) -> Self {
        Self {
            rect,
            health,
            max_health: health,
            color,
        }
    }

    /// Points for destroying this brick
    pub fn score_value(&self) -> u64 {
        self.max_health as u64 * BRICK_SCORE_PER_HEALTH
    }

    /// Take one hit, returns true on the hit that destroys the brick
    pub fn hit(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        self.health == 0
    }
}

impl Bounded for Brick {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Expand,
    /// Collecting it only awards the pickup bonus, the ball count stays one
    MultiBall,
    Speed,
    Life,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Expand,
        PowerUpKind::MultiBall,
        PowerUpKind::Speed,
        PowerUpKind::Life,
    ];

    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Expand => 0xffd93d,
            PowerUpKind::MultiBall => 0xff6b6b,
            PowerUpKind::Speed => 0x4d9de0,
            PowerUpKind::Life => 0x6bcf7f,
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub fall_speed: f32,
}

impl PowerUp {
    /// Spawned with its top-left corner at `pos`
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, POWERUP_SIZE, POWERUP_SIZE),
            kind,
            fall_speed: POWERUP_FALL_SPEED,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.rect.pos.y += self.fall_speed * dt_ms / 1000.0;
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Brick layout for a level: more rows as levels go up, and the top two
/// rows get a second hit point from level 3
pub fn create_bricks(level: u32, field_width: f32) -> Vec<Brick> {
    let rows = (BRICK_BASE_ROWS + level / 3).min(BRICK_MAX_ROWS) as usize;
    let cols = BRICK_COLS;
    let total_width = cols as f32 * (BRICK_WIDTH + BRICK_PADDING) - BRICK_PADDING;
    let offset_x = (field_width - total_width) / 2.0;

    let mut bricks = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let x = offset_x + col as f32 * (BRICK_WIDTH + BRICK_PADDING);
            let y = BRICK_TOP_OFFSET + row as f32 * (BRICK_HEIGHT + BRICK_PADDING);
            let color = BRICK_COLORS[row % BRICK_COLORS.len()];
            let health = if row < 2 && level > 2 { 2 } else { 1 };
            bricks.push(Brick::new(
                Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT),
                color,
                health,
            ));
        }
    }
    log::info!("Level {}: {} rows, {} bricks", level, rows, bricks.len());
    bricks
}

/// Complete brick-breaker session state
#[derive(Debug, Clone)]
pub struct BreakerState {
    pub seed: u64,
    pub rng: Pcg32,
    pub field: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub bricks_destroyed: u32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
}

impl BreakerState {
    /// Create a session on the title screen
    pub fn new(seed: u64) -> Self {
        let field = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            phase: GamePhase::Start,
            score: 0,
            lives: START_LIVES,
            level: 1,
            bricks_destroyed: 0,
            paddle: Paddle::new(field),
            ball: Ball::new(Self::ball_spawn(field)),
            bricks: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            max_particles: usize::MAX,
            events: Vec::new(),
        }
    }

    fn ball_spawn(field: Vec2) -> Vec2 {
        Vec2::new(field.x / 2.0, field.y - BALL_SPAWN_BOTTOM_OFFSET)
    }

    /// Reset score, lives, level and every entity, then start playing
    fn reset_session(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.bricks_destroyed = 0;
        self.paddle = Paddle::new(self.field);
        self.ball = Ball::new(Self::ball_spawn(self.field));
        self.bricks = create_bricks(self.level, self.field.x);
        self.power_ups.clear();
        self.particles.clear();
        self.events.clear();
        self.phase = GamePhase::Playing;
    }

    /// Leave the title screen
    pub fn start(&mut self) {
        if self.phase == GamePhase::Start {
            self.reset_session();
            log::info!("Breaker started (seed {})", self.seed);
        }
    }

    /// Throw the current run away and start over
    pub fn restart(&mut self) {
        self.reset_session();
        log::info!("Breaker restarted");
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    /// Continue after a cleared level
    pub fn next_level(&mut self) {
        if self.phase != GamePhase::LevelComplete {
            return;
        }
        self.level += 1;
        let spawn = Self::ball_spawn(self.field);
        self.ball.reset(spawn, &mut self.rng);
        self.bricks = create_bricks(self.level, self.field.x);
        self.power_ups.clear();
        self.particles.clear();
        self.phase = GamePhase::Playing;
        log::info!("Breaker advanced to level {}", self.level);
    }

    /// Put the ball back after a life was lost
    pub(super) fn respawn_ball(&mut self) {
        let spawn = Self::ball_spawn(self.field);
        self.ball.reset(spawn, &mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_bricks_layout() {
        let bricks = create_bricks(1, 800.0);
        assert_eq!(bricks.len(), 50);
        assert!((bricks[0].rect.pos.x - 27.5).abs() < 1e-3);
        assert_eq!(bricks[0].rect.pos.y, 80.0);
        assert!(bricks.iter().all(|b| b.health == 1));

        // Level 3: six rows, top two rows take two hits
        let bricks = create_bricks(3, 800.0);
        assert_eq!(bricks.len(), 60);
        assert_eq!(bricks.iter().filter(|b| b.health == 2).count(), 20);
        assert_eq!(bricks[0].score_value(), 200);

        // Row count caps at ten
        assert_eq!(create_bricks(40, 800.0).len(), 100);
    }

    #[test]
    fn test_brick_hit_destroys_once() {
        let mut brick = Brick::new(Rect::new(0.0, 0.0, 70.0, 25.0), 0, 2);
        assert!(!brick.hit());
        assert!(brick.hit());
        assert!(!brick.hit());
        assert_eq!(brick.health, 0);
    }

    #[test]
    fn test_paddle_center_hit_goes_straight_up() {
        let paddle = Rect::new(350.0, 560.0, 100.0, 15.0);
        let mut ball = Ball::new(Vec2::new(400.0, 555.0));
        ball.bounce_off_paddle(&paddle);
        assert!(ball.vel.x.abs() < 1e-3);
        assert!(ball.vel.y < 0.0);
        assert!((ball.vel.length() - ball.base_speed).abs() < 1e-3);
        assert_eq!(ball.pos.y, 552.0);
    }

    #[test]
    fn test_paddle_edge_hit_uses_sixty_degree_cone() {
        let paddle = Rect::new(350.0, 560.0, 100.0, 15.0);
        let mut ball = Ball::new(Vec2::new(450.0, 555.0));
        ball.speed_multiplier = 1.5;
        ball.bounce_off_paddle(&paddle);
        let angle = ball.vel.x.atan2(-ball.vel.y);
        assert!((angle - std::f32::consts::FRAC_PI_3).abs() < 1e-4);
        assert!((ball.vel.length() - ball.base_speed * 1.5).abs() < 1e-2);
    }

    #[test]
    fn test_speed_up_caps_at_two() {
        let mut ball = Ball::new(Vec2::ZERO);
        for _ in 0..10 {
            ball.speed_up();
        }
        assert_eq!(ball.speed_multiplier, 2.0);
    }

    #[test]
    fn test_paddle_expand_expires() {
        let field = Vec2::new(800.0, 600.0);
        let mut paddle = Paddle::new(field);
        paddle.expand(field.x);
        assert_eq!(paddle.rect.size.x, 150.0);
        let input = TickInput::default();
        paddle.update(&input, 9_000.0, field.x);
        assert!(paddle.is_expanded());
        paddle.update(&input, 1_000.0, field.x);
        assert!(!paddle.is_expanded());
        assert_eq!(paddle.rect.size.x, 100.0);
    }

    #[test]
    fn test_paddle_keys_never_overshoot_field() {
        let field = Vec2::new(800.0, 600.0);
        let mut paddle = Paddle::new(field);
        paddle.rect.pos.x = 1.0;
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        paddle.update(&left, 100.0, field.x);
        assert_eq!(paddle.rect.pos.x, 0.0);

        paddle.rect.pos.x = 699.0;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        paddle.update(&right, 100.0, field.x);
        assert_eq!(paddle.rect.right(), field.x);
    }

    #[test]
    fn test_expand_at_right_edge_stays_in_field() {
        let field = Vec2::new(800.0, 600.0);
        let mut paddle = Paddle::new(field);
        paddle.rect.pos.x = 700.0;
        paddle.expand(field.x);
        assert_eq!(paddle.rect.size.x, 150.0);
        assert_eq!(paddle.rect.pos.x, 650.0);
        assert_eq!(paddle.rect.right(), field.x);
    }

    #[test]
    fn test_paddle_follows_pointer_within_field() {
        let field = Vec2::new(800.0, 600.0);
        let mut paddle = Paddle::new(field);
        let input = TickInput {
            pointer_x: Some(790.0),
            ..Default::default()
        };
        paddle.update(&input, 16.0, field.x);
        assert_eq!(paddle.rect.pos.x, 700.0);
    }

    #[test]
    fn test_pause_resume_only_from_matching_phase() {
        let mut state = BreakerState::new(1);
        state.pause();
        assert_eq!(state.phase, GamePhase::Start);
        state.start();
        state.pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.resume();
        assert_eq!(state.phase, GamePhase::Playing);
    }
}
