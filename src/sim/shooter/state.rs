//! Space-shooter entities and session state

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::shooter::*;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, START_LIVES};
use crate::sim::entity::{Bounded, Particle, Rect};
use crate::sim::movement::{self, EnemyKind, Kinematics, MoveContext, MovePhase};
use crate::sim::session::{Countdown, GameEvent, GamePhase, TickInput};

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub speed: f32,
    pub shot_cooldown_ms: f32,
    /// Remaining invulnerability after being hit
    pub invulnerable_ms: f32,
}

impl Player {
    pub fn new(field: Vec2) -> Self {
        Self {
            rect: Rect::new(
                field.x / 2.0,
                field.y - PLAYER_BOTTOM_OFFSET,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            speed: PLAYER_SPEED,
            shot_cooldown_ms: 0.0,
            invulnerable_ms: 0.0,
        }
    }

    /// Arrow keys move the ship in all four directions inside the field
    pub fn update(&mut self, input: &TickInput, dt_ms: f32, field: Vec2) {
        if self.invulnerable_ms > 0.0 {
            self.invulnerable_ms -= dt_ms;
        }

        let step = self.speed * dt_ms / 1000.0;
        let max = (field - self.rect.size).max(Vec2::ZERO);
        let pos = &mut self.rect.pos;
        if input.left && pos.x > 0.0 {
            pos.x -= step;
        }
        if input.right && pos.x < max.x {
            pos.x += step;
        }
        if input.up && pos.y > 0.0 {
            pos.y -= step;
        }
        if input.down && pos.y < max.y {
            pos.y += step;
        }
        *pos = pos.clamp(Vec2::ZERO, max);

        if self.shot_cooldown_ms > 0.0 {
            self.shot_cooldown_ms -= dt_ms;
        }
    }

    /// Fire if the gun has cooled down
    pub fn try_shoot(&mut self) -> Option<Bullet> {
        if self.shot_cooldown_ms > 0.0 {
            return None;
        }
        self.shot_cooldown_ms = PLAYER_SHOT_COOLDOWN_MS;
        Some(Bullet::new(
            Vec2::new(self.rect.pos.x + self.rect.size.x / 2.0, self.rect.pos.y),
            PLAYER_BULLET_SPEED,
            PLAYER_BULLET_COLOR,
        ))
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    pub fn make_invulnerable(&mut self) {
        self.invulnerable_ms = INVULNERABLE_MS;
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// A bullet moving straight up (player) or down (enemy)
#[derive(Debug, Clone)]
pub struct Bullet {
    pub rect: Rect,
    /// Vertical speed in px/s, negative is up
    pub speed: f32,
    pub color: u32,
}

impl Bullet {
    pub fn new(pos: Vec2, speed: f32, color: u32) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, BULLET_WIDTH, BULLET_HEIGHT),
            speed,
            color,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.rect.pos.y += self.speed * dt_ms / 1000.0;
    }
}

impl Bounded for Bullet {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// An enemy ship
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub body: Kinematics,
    pub size: Vec2,
    pub size_multiplier: f32,
    pub health: u32,
    pub max_health: u32,
    pub phase: MovePhase,
    pub shot_cooldown_ms: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, kind: EnemyKind, size_multiplier: f32, rng: &mut impl Rng) -> Self {
        let health = kind.max_health();
        Self {
            kind,
            body: Kinematics {
                pos,
                origin_x: pos.x,
                timer_ms: 0.0,
                speed: ENEMY_BASE_SPEED + (size_multiplier - 1.0) * ENEMY_SPEED_PER_SIZE,
            },
            size: Vec2::new(ENEMY_BASE_WIDTH, ENEMY_BASE_HEIGHT) * size_multiplier,
            size_multiplier,
            health,
            max_health: health,
            phase: MovePhase::for_kind(kind, rng),
            shot_cooldown_ms: 0.0,
        }
    }

    pub fn advance(&mut self, ctx: &MoveContext, rng: &mut impl Rng, dt_ms: f32) {
        movement::advance(self.kind, &mut self.phase, &mut self.body, ctx, rng, dt_ms);
        if self.shot_cooldown_ms > 0.0 {
            self.shot_cooldown_ms -= dt_ms;
        }
    }

    pub fn can_shoot(&self) -> bool {
        self.shot_cooldown_ms <= 0.0
    }

    /// Drop a bullet from the nose and start a random cooldown
    pub fn shoot(&mut self, rng: &mut impl Rng) -> Option<Bullet> {
        if !self.can_shoot() {
            return None;
        }
        self.shot_cooldown_ms =
            ENEMY_SHOT_MIN_COOLDOWN_MS + rng.random::<f32>() * ENEMY_SHOT_COOLDOWN_JITTER_MS;
        let nose = Vec2::new(self.body.pos.x + self.size.x / 2.0, self.body.pos.y + self.size.y);
        Some(Bullet::new(nose, ENEMY_BULLET_SPEED, ENEMY_BULLET_COLOR))
    }

    /// Take one hit, returns true on the hit that destroys the enemy
    pub fn hit(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        self.health == 0
    }

    /// Kind score scaled by size, rounded down
    pub fn score_value(&self) -> u64 {
        (self.kind.base_score() as f64 * self.size_multiplier as f64).floor() as u64
    }

    pub fn color(&self) -> u32 {
        if self.health < self.max_health {
            self.kind.damaged_color()
        } else {
            self.kind.color()
        }
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.body.pos,
            size: self.size,
        }
    }
}

/// Running counters for the current run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub shots_fired: u32,
    pub enemies_killed: u32,
    /// Time spent in Playing and StagePause (ms)
    pub play_time_ms: f64,
}

impl RunStats {
    /// Kills per shot as a whole percentage
    pub fn accuracy(&self) -> u32 {
        if self.shots_fired == 0 {
            return 0;
        }
        (self.enemies_killed as f64 / self.shots_fired as f64 * 100.0).round() as u32
    }
}

/// Summary of a finished run, waiting for a name
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub score: u64,
    pub stage: u32,
    pub enemies_killed: u32,
    pub accuracy: u32,
    pub game_time_secs: f64,
}

/// Complete space-shooter session state
#[derive(Debug, Clone)]
pub struct ShooterState {
    pub seed: u64,
    pub rng: Pcg32,
    pub field: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub stage: u32,
    pub stats: RunStats,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    /// Remaining red flash after an enemy slipped past (ms)
    pub screen_flash_ms: f32,
    pub enemy_shoot_timer_ms: f32,
    /// Short delay between the last kill and the stage banner
    pub stage_clear: Option<Countdown>,
    /// Stage banner; the next wave spawns when it runs out
    pub stage_pause: Option<Countdown>,
    /// Set on game over, consumed by score submission
    pub pending_result: Option<RunResult>,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
}

impl ShooterState {
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
            stage: 1,
            stats: RunStats::default(),
            player: Player::new(field),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            max_particles: usize::MAX,
            screen_flash_ms: 0.0,
            enemy_shoot_timer_ms: 0.0,
            stage_clear: None,
            stage_pause: None,
            pending_result: None,
            events: Vec::new(),
        }
    }

    pub fn move_context(&self) -> MoveContext {
        MoveContext {
            stage: self.stage,
            field_width: self.field.x,
            field_height: self.field.y,
        }
    }

    /// Back to initial values; pending countdowns are dropped with the rest
    fn reset_session(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.stage = 1;
        self.stats = RunStats::default();
        self.player = Player::new(self.field);
        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.particles.clear();
        self.screen_flash_ms = 0.0;
        self.enemy_shoot_timer_ms = 0.0;
        self.stage_clear = None;
        self.stage_pause = None;
        self.pending_result = None;
        self.events.clear();
    }

    /// Leave the title screen; the first wave arrives after the stage banner
    pub fn start(&mut self) {
        if self.phase != GamePhase::Start {
            return;
        }
        self.reset_session();
        self.enter_stage_pause();
        log::info!("Shooter started (seed {})", self.seed);
    }

    /// Start over immediately with a fresh first wave
    pub fn restart(&mut self) {
        self.reset_session();
        super::tick::spawn_next_wave(self);
        self.phase = GamePhase::Playing;
        log::info!("Shooter restarted");
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

    /// After a result was saved: clear the run and return to the title screen
    pub fn finish_run(&mut self) {
        self.reset_session();
        self.phase = GamePhase::Start;
    }

    pub(super) fn enter_stage_pause(&mut self) {
        self.stage_clear = None;
        self.stage_pause = Some(Countdown::new(STAGE_PAUSE_MS));
        self.phase = GamePhase::StagePause;
        log::info!("Stage {} banner", self.stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_shot_cooldown() {
        let mut player = Player::new(Vec2::new(800.0, 600.0));
        let bullet = player.try_shoot().expect("first shot fires");
        assert_eq!(bullet.rect.pos, Vec2::new(420.0, 540.0));
        assert!(player.try_shoot().is_none());
        player.update(&TickInput::default(), 200.0, Vec2::new(800.0, 600.0));
        assert!(player.try_shoot().is_some());
    }

    #[test]
    fn test_player_stays_in_field() {
        let field = Vec2::new(800.0, 600.0);
        let mut player = Player::new(field);
        player.rect.pos = Vec2::new(0.0, 0.0);
        let input = TickInput {
            left: true,
            up: true,
            ..Default::default()
        };
        player.update(&input, 100.0, field);
        assert_eq!(player.rect.pos, Vec2::ZERO);
    }

    #[test]
    fn test_player_step_is_clamped_at_far_corner() {
        let field = Vec2::new(800.0, 600.0);
        let mut player = Player::new(field);
        player.rect.pos = Vec2::new(759.0, 569.0);
        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        player.update(&input, 100.0, field);
        assert_eq!(player.rect.right(), field.x);
        assert_eq!(player.rect.bottom(), field.y);
    }

    #[test]
    fn test_enemy_stats_by_kind() {
        let mut rng = Pcg32::seed_from_u64(5);
        let boss = Enemy::new(Vec2::ZERO, EnemyKind::Boss, 1.0, &mut rng);
        assert_eq!(boss.health, 3);
        assert_eq!(boss.score_value(), 500);
        assert_eq!(boss.size, Vec2::new(30.0, 25.0));

        let big = Enemy::new(Vec2::ZERO, EnemyKind::Basic, 1.5, &mut rng);
        assert_eq!(big.score_value(), 150);
        assert_eq!(big.body.speed, 60.0);
        assert_eq!(big.size, Vec2::new(45.0, 37.5));
    }

    #[test]
    fn test_damaged_enemy_changes_tint() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyKind::Advanced, 1.0, &mut rng);
        assert_eq!(enemy.color(), EnemyKind::Advanced.color());
        assert!(!enemy.hit());
        assert_eq!(enemy.color(), EnemyKind::Advanced.damaged_color());
        assert!(enemy.hit());
        assert!(!enemy.hit());
    }

    #[test]
    fn test_enemy_shot_respects_cooldown() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut enemy = Enemy::new(Vec2::new(100.0, 100.0), EnemyKind::Basic, 1.0, &mut rng);
        let bullet = enemy.shoot(&mut rng).expect("ready to fire");
        assert_eq!(bullet.rect.pos, Vec2::new(115.0, 125.0));
        assert!(enemy.shot_cooldown_ms >= 1000.0 && enemy.shot_cooldown_ms <= 3000.0);
        assert!(enemy.shoot(&mut rng).is_none());
    }

    #[test]
    fn test_accuracy_rounds() {
        let stats = RunStats {
            shots_fired: 3,
            enemies_killed: 2,
            play_time_ms: 0.0,
        };
        assert_eq!(stats.accuracy(), 67);
        assert_eq!(RunStats::default().accuracy(), 0);
    }
}
