//! Session phases, per-tick input and the events a tick reports
//!
//! Timed transitions are countdown fields owned by the game state and
//! decremented inside `tick`. Resetting a session replaces them, so a
//! transition scheduled for an old session can never fire into a new one.

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    Start,
    /// Active gameplay
    Playing,
    /// Player paused (simulation frozen)
    Paused,
    /// Stage banner is showing; the next wave spawns when it ends
    StagePause,
    /// Run ended
    GameOver,
    /// All bricks cleared, waiting for the next level
    LevelComplete,
}

impl GamePhase {
    /// Whether the simulation step runs in this phase
    pub fn is_simulating(self) -> bool {
        self == GamePhase::Playing
    }
}

/// Commands from the UI (buttons and keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
    Pause,
    Resume,
    /// Continue from LevelComplete to the next level (breaker)
    NextLevel,
    /// Save the finished run under a name (shooter)
    SubmitScore(String),
    /// Wipe all persisted records (shooter)
    ClearRecords,
}

/// A countdown in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining_ms: f32,
}

impl Countdown {
    pub fn new(ms: f32) -> Self {
        Self { remaining_ms: ms }
    }

    /// Subtract elapsed time, returns true once the countdown has run out
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.remaining_ms -= dt_ms;
        self.remaining_ms <= 0.0
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms.max(0.0)
    }
}

/// Input state sampled once per frame; the simulation only reads it
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire held (shooter)
    pub fire: bool,
    /// Pointer x in field coordinates (breaker paddle follows it)
    pub pointer_x: Option<f32>,
}

/// Things that happened during a tick, drained by the host for audio/haptics
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PaddleHit,
    WallBounce,
    BrickHit { destroyed: bool },
    PowerUpCollected(super::breaker::PowerUpKind),
    ShotFired,
    EnemyHit { destroyed: bool },
    EnemyKilled { kind: super::movement::EnemyKind, score: u64 },
    EnemyEscaped,
    PlayerHit,
    LifeLost { remaining: u32 },
    StageCleared { next_stage: u32 },
    WaveSpawned { stage: u32, enemies: usize },
    LevelComplete { level: u32 },
    GameOver { score: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_runs_out() {
        let mut c = Countdown::new(300.0);
        assert!(!c.tick(100.0));
        assert_eq!(c.remaining_ms(), 200.0);
        assert!(c.tick(250.0));
        assert_eq!(c.remaining_ms(), 0.0);
    }

    #[test]
    fn test_only_playing_simulates() {
        assert!(GamePhase::Playing.is_simulating());
        for phase in [
            GamePhase::Start,
            GamePhase::Paused,
            GamePhase::StagePause,
            GamePhase::GameOver,
            GamePhase::LevelComplete,
        ] {
            assert!(!phase.is_simulating());
        }
    }
}
