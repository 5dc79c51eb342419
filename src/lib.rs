//! Oraksil Arcade - simulation core for two canvas arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, movement, collisions, game state)
//! - `game`: Command surface tying a simulation to persisted records
//! - `records`: Ranking and aggregate stats for finished shooter runs
//! - `persistence`: Key/value storage backends (LocalStorage, files, memory)
//! - `platform`: Frame clock, input folding and logger setup
//! - `settings`: Player preferences

pub mod game;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod settings;
pub mod sim;

pub use game::{BreakerGame, CommandError, Game, ShooterGame};
pub use records::GameRecords;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions shared by both games
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Longest frame the simulation will accept (tab resume guard)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Lives at the start of every session
    pub const START_LIVES: u32 = 3;

    /// Brick-breaker tuning
    pub mod breaker {
        /// HUD band at the top of the field; the ball bounces off its lower edge
        pub const TOP_WALL_Y: f32 = 50.0;

        pub const PADDLE_WIDTH: f32 = 100.0;
        pub const PADDLE_HEIGHT: f32 = 15.0;
        /// Distance from the bottom of the field to the paddle's top edge
        pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
        pub const PADDLE_SPEED: f32 = 500.0;
        pub const PADDLE_EXPAND_FACTOR: f32 = 1.5;
        pub const PADDLE_EXPAND_MS: f32 = 10_000.0;

        pub const BALL_RADIUS: f32 = 8.0;
        /// Distance from the bottom of the field to the ball spawn point
        pub const BALL_SPAWN_BOTTOM_OFFSET: f32 = 60.0;
        pub const BALL_START_VX: f32 = -300.0;
        pub const BALL_START_VY: f32 = -300.0;
        /// Horizontal share of base speed after a reset
        pub const BALL_RESET_X_FACTOR: f32 = 0.7;
        pub const BALL_SPEED_UP: f32 = 1.2;
        pub const BALL_MAX_MULTIPLIER: f32 = 2.0;
        /// Half-angle of the paddle launch cone (60 degrees)
        pub const PADDLE_LAUNCH_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
        pub const TRAIL_LENGTH: usize = 10;

        pub const BRICK_COLS: usize = 10;
        pub const BRICK_BASE_ROWS: u32 = 5;
        pub const BRICK_MAX_ROWS: u32 = 10;
        pub const BRICK_WIDTH: f32 = 70.0;
        pub const BRICK_HEIGHT: f32 = 25.0;
        pub const BRICK_PADDING: f32 = 5.0;
        pub const BRICK_TOP_OFFSET: f32 = 80.0;
        /// Row palette, cycled from the top row down
        pub const BRICK_COLORS: [u32; 6] = [0xff6b6b, 0xffd93d, 0x6bcf7f, 0x4d9de0, 0xff8e53, 0xb794f6];
        pub const BRICK_SCORE_PER_HEALTH: u64 = 100;

        pub const PADDLE_HIT_SCORE: u64 = 10;
        pub const POWERUP_SCORE: u64 = 50;
        pub const POWERUP_DROP_CHANCE: f64 = 0.1;
        pub const POWERUP_SIZE: f32 = 20.0;
        pub const POWERUP_FALL_SPEED: f32 = 100.0;

        pub const BRICK_PARTICLES: usize = 8;
        pub const PARTICLE_GRAVITY: f32 = 200.0;
    }

    /// Space-shooter tuning
    pub mod shooter {
        pub const PLAYER_WIDTH: f32 = 40.0;
        pub const PLAYER_HEIGHT: f32 = 30.0;
        pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;
        pub const PLAYER_SPEED: f32 = 300.0;
        pub const PLAYER_SHOT_COOLDOWN_MS: f32 = 200.0;
        pub const INVULNERABLE_MS: f32 = 2000.0;

        pub const BULLET_WIDTH: f32 = 4.0;
        pub const BULLET_HEIGHT: f32 = 8.0;
        pub const PLAYER_BULLET_SPEED: f32 = -400.0;
        pub const ENEMY_BULLET_SPEED: f32 = 300.0;
        pub const PLAYER_BULLET_COLOR: u32 = 0x00ffff;
        pub const ENEMY_BULLET_COLOR: u32 = 0xff4444;

        pub const ENEMY_BASE_WIDTH: f32 = 30.0;
        pub const ENEMY_BASE_HEIGHT: f32 = 25.0;
        pub const ENEMY_BASE_SPEED: f32 = 50.0;
        /// Extra speed per unit of size multiplier above 1
        pub const ENEMY_SPEED_PER_SIZE: f32 = 20.0;
        /// Size growth per stage above the first
        pub const SIZE_GROWTH_PER_STAGE: f32 = 0.15;
        /// Horizontal margin where zigzag enemies turn around
        pub const ZIGZAG_MARGIN: f32 = 50.0;
        pub const ENEMY_SHOT_MIN_COOLDOWN_MS: f32 = 1000.0;
        pub const ENEMY_SHOT_COOLDOWN_JITTER_MS: f32 = 2000.0;
        pub const MAX_SIMULTANEOUS_SHOOTERS: u32 = 3;

        pub const WAVE_TOP_OFFSET: f32 = 80.0;
        pub const WAVE_ROW_PITCH: f32 = 50.0;
        pub const WAVE_MAX_ROWS: u32 = 6;
        pub const WAVE_MAX_COLS: u32 = 10;

        /// Delay between the last kill and the stage banner
        pub const STAGE_CLEAR_DELAY_MS: f32 = 300.0;
        /// How long the stage banner holds the simulation
        pub const STAGE_PAUSE_MS: f32 = 2000.0;
        pub const SCREEN_FLASH_MS: f32 = 500.0;

        pub const EXPLOSION_PARTICLES: usize = 10;
        pub const WARNING_PARTICLES: usize = 20;
    }
}
