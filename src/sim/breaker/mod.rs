//! Brick-breaker: paddle, single ball, brick wall, falling power-ups

pub mod state;
pub mod tick;

pub use state::{Ball, BreakerState, Brick, Paddle, PowerUp, PowerUpKind, create_bricks};
pub use tick::tick;
