//! Command surface shared by both games
//!
//! A host drives either game the same way: feed it commands from buttons
//! and keys, call `tick` once per frame, draw the snapshot and drain the
//! events for sound. The shooter also owns its records and their storage.

use thiserror::Error;

use crate::persistence::Storage;
use crate::records::{self, GameRecords, RankingEntry};
use crate::settings::Settings;
use crate::sim::snapshot::{self, RenderSnapshot, SpriteKind};
use crate::sim::{BreakerState, Command, GameEvent, GamePhase, ShooterState, TickInput, breaker, shooter};

/// A command that could not be carried out; state is left untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("player name is empty")]
    EmptyName,
    #[error("no finished run is waiting to be saved")]
    NoPendingResult,
    #[error("{0} is not supported by this game")]
    Unsupported(&'static str),
}

/// One playable game
pub trait Game {
    fn phase(&self) -> GamePhase;

    fn command(&mut self, command: Command) -> Result<(), CommandError>;

    /// Advance by one frame
    fn tick(&mut self, input: &TickInput, dt_ms: f32);

    fn snapshot(&self) -> RenderSnapshot;

    /// Events since the last drain, oldest first
    fn drain_events(&mut self) -> Vec<GameEvent>;
}

/// The brick-breaker
#[derive(Debug, Clone)]
pub struct BreakerGame {
    state: BreakerState,
    settings: Settings,
}

impl BreakerGame {
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut state = BreakerState::new(seed);
        state.max_particles = settings.max_particles();
        Self { state, settings }
    }

    pub fn state(&self) -> &BreakerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BreakerState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.state.max_particles = settings.max_particles();
        self.settings = settings;
    }
}

impl Game for BreakerGame {
    fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn command(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Start => self.state.start(),
            Command::Restart => self.state.restart(),
            Command::Pause => self.state.pause(),
            Command::Resume => self.state.resume(),
            Command::NextLevel => self.state.next_level(),
            Command::SubmitScore(_) => return Err(CommandError::Unsupported("submit_score")),
            Command::ClearRecords => return Err(CommandError::Unsupported("clear_records")),
        }
        Ok(())
    }

    fn tick(&mut self, input: &TickInput, dt_ms: f32) {
        breaker::tick(&mut self.state, input, dt_ms);
    }

    fn snapshot(&self) -> RenderSnapshot {
        let mut snap = snapshot::breaker(&self.state);
        if !self.settings.trails {
            snap.strip(SpriteKind::Trail);
        }
        snap
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}

/// The space-shooter, with persisted records
pub struct ShooterGame {
    state: ShooterState,
    settings: Settings,
    records: GameRecords,
    storage: Box<dyn Storage>,
}

impl ShooterGame {
    /// Settings and records are read from `storage`
    pub fn new(seed: u64, storage: Box<dyn Storage>) -> Self {
        let settings = Settings::load(&*storage);
        let records = GameRecords::load(&*storage);
        let mut state = ShooterState::new(seed);
        state.max_particles = settings.max_particles();
        Self {
            state,
            settings,
            records,
            storage,
        }
    }

    pub fn state(&self) -> &ShooterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ShooterState {
        &mut self.state
    }

    pub fn records(&self) -> &GameRecords {
        &self.records
    }

    pub fn storage(&self) -> &dyn Storage {
        &*self.storage
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply and persist new settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.state.max_particles = settings.max_particles();
        settings.save(&mut *self.storage);
        self.settings = settings;
    }

    /// Whether the finished run beats the stored high score
    pub fn is_new_record(&self) -> bool {
        self.state
            .pending_result
            .as_ref()
            .is_some_and(|r| self.records.is_new_record(r.score))
    }

    /// Save the finished run under `name` and return to the title screen.
    /// Returns the rank on the board, if it made it.
    pub fn submit_score(&mut self, name: &str) -> Result<Option<usize>, CommandError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::EmptyName);
        }
        let result = self
            .state
            .pending_result
            .clone()
            .ok_or(CommandError::NoPendingResult)?;

        let now = records::now_ms();
        self.records.record_game(&result, now);
        let rank = self.records.add_ranking(RankingEntry {
            name: name.to_string(),
            score: result.score,
            stage: result.stage,
            enemies_killed: result.enemies_killed,
            accuracy: result.accuracy,
            game_time: result.game_time_secs,
            date: now,
        });
        self.records.save(&mut *self.storage);
        log::info!("{} scored {} (rank {:?})", name, result.score, rank);

        self.state.finish_run();
        Ok(rank)
    }

    pub fn clear_records(&mut self) {
        self.records.clear();
        if let Err(e) = self.storage.remove_item(GameRecords::STORAGE_KEY) {
            log::warn!("Could not remove stored records: {}", e);
        }
        log::info!("Records cleared");
    }
}

impl Game for ShooterGame {
    fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn command(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Start => self.state.start(),
            Command::Restart => self.state.restart(),
            Command::Pause => self.state.pause(),
            Command::Resume => self.state.resume(),
            Command::NextLevel => return Err(CommandError::Unsupported("next_level")),
            Command::SubmitScore(name) => {
                self.submit_score(&name)?;
            }
            Command::ClearRecords => self.clear_records(),
        }
        Ok(())
    }

    fn tick(&mut self, input: &TickInput, dt_ms: f32) {
        shooter::tick(&mut self.state, input, dt_ms);
    }

    fn snapshot(&self) -> RenderSnapshot {
        let mut snap = snapshot::shooter(&self.state);
        if !self.settings.effective_screen_flash() {
            snap.screen_flash = 0.0;
        }
        snap
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::sim::RunResult;

    fn finished_shooter() -> ShooterGame {
        let mut game = ShooterGame::new(7, Box::new(MemoryStorage::new()));
        game.command(Command::Restart).unwrap();
        let state = game.state_mut();
        state.phase = GamePhase::GameOver;
        state.score = 4200;
        state.pending_result = Some(RunResult {
            score: 4200,
            stage: 5,
            enemies_killed: 30,
            accuracy: 60,
            game_time_secs: 180.0,
        });
        game
    }

    #[test]
    fn test_empty_name_is_rejected_without_side_effects() {
        let mut game = finished_shooter();
        let before = game.records().clone();

        assert_eq!(
            game.command(Command::SubmitScore("   ".into())),
            Err(CommandError::EmptyName)
        );
        assert_eq!(game.records(), &before);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(game.state().pending_result.is_some());
        assert_eq!(game.storage().get_item(GameRecords::STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_submit_score_saves_and_returns_to_title() {
        let mut game = finished_shooter();
        assert!(game.is_new_record());

        assert_eq!(game.submit_score("  ace "), Ok(Some(1)));
        assert_eq!(game.phase(), GamePhase::Start);
        assert!(game.state().pending_result.is_none());
        assert_eq!(game.records().rankings[0].name, "ace");
        assert_eq!(game.records().high_score, 4200);
        assert_eq!(game.records().total_games_played, 1);

        let stored = GameRecords::load(game.storage());
        assert_eq!(&stored, game.records());
    }

    #[test]
    fn test_submit_without_finished_run() {
        let mut game = ShooterGame::new(7, Box::new(MemoryStorage::new()));
        assert_eq!(game.submit_score("ace"), Err(CommandError::NoPendingResult));
    }

    #[test]
    fn test_records_survive_a_new_session() {
        let mut game = finished_shooter();
        game.submit_score("ace").unwrap();
        let json = game
            .storage()
            .get_item(GameRecords::STORAGE_KEY)
            .unwrap()
            .expect("records were written");

        let mut storage = MemoryStorage::new();
        storage.set_item(GameRecords::STORAGE_KEY, &json).unwrap();
        let reopened = ShooterGame::new(8, Box::new(storage));
        assert_eq!(reopened.records().rankings.len(), 1);
        assert_eq!(reopened.records().rankings[0].score, 4200);
    }

    #[test]
    fn test_clear_records_wipes_storage() {
        let mut game = finished_shooter();
        game.submit_score("ace").unwrap();
        game.command(Command::ClearRecords).unwrap();
        assert_eq!(game.records(), &GameRecords::default());
        assert_eq!(game.storage().get_item(GameRecords::STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_shooter_pause_and_resume() {
        let mut game = ShooterGame::new(7, Box::new(MemoryStorage::new()));
        game.command(Command::Restart).unwrap();
        game.command(Command::Pause).unwrap();
        assert_eq!(game.phase(), GamePhase::Paused);
        let before = game.snapshot();
        game.tick(&TickInput::default(), 100.0);
        assert_eq!(game.snapshot(), before);
        game.command(Command::Resume).unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_breaker_rejects_shooter_commands() {
        let mut game = BreakerGame::new(1, Settings::default());
        assert_eq!(
            game.command(Command::SubmitScore("ace".into())),
            Err(CommandError::Unsupported("submit_score"))
        );
        assert_eq!(game.phase(), GamePhase::Start);
    }

    #[test]
    fn test_breaker_trail_follows_settings() {
        let mut settings = Settings::default();
        settings.trails = false;
        let mut game = BreakerGame::new(1, settings);
        game.command(Command::Start).unwrap();
        for _ in 0..5 {
            game.tick(&TickInput::default(), 16.0);
        }
        assert_eq!(game.snapshot().count(SpriteKind::Trail), 0);
    }

    #[test]
    fn test_drain_empties_event_queue() {
        let mut game = BreakerGame::new(1, Settings::default());
        game.command(Command::Start).unwrap();
        game.state_mut().events.push(GameEvent::PaddleHit);
        assert_eq!(game.drain_events(), vec![GameEvent::PaddleHit]);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_particle_cap_comes_from_settings() {
        let mut settings = Settings::default();
        settings.particles = false;
        let game = BreakerGame::new(1, settings);
        assert_eq!(game.state().max_particles, 0);
    }
}
