//! Shooter records and name rankings
//!
//! Persisted as one flat JSON blob. Tracks lifetime aggregates, the ten most
//! recent runs and the top 50 named runs.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;
use crate::sim::RunResult;

/// Maximum number of ranking entries to keep
pub const MAX_RANKINGS: usize = 50;
/// Maximum number of recent runs to keep
pub const MAX_RECENT: usize = 10;

/// A named run on the ranking board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub name: String,
    pub score: u64,
    /// Stage reached
    pub stage: u32,
    pub enemies_killed: u32,
    /// Whole percent
    pub accuracy: u32,
    /// Seconds of play
    pub game_time: f64,
    /// Unix timestamp (ms) when submitted
    pub date: f64,
}

/// One of the most recent runs, newest first in `GameRecords::recent_scores`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentScore {
    pub score: u64,
    pub level: u32,
    pub enemies_killed: u32,
    pub accuracy: u32,
    pub date: f64,
}

/// Lifetime aggregates plus recent and ranked runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameRecords {
    pub high_score: u64,
    pub total_games_played: u32,
    /// Seconds across all recorded runs
    pub total_time_played: f64,
    pub best_accuracy: u32,
    pub most_enemies_killed: u32,
    pub recent_scores: Vec<RecentScore>,
    pub rankings: Vec<RankingEntry>,
}

impl GameRecords {
    /// Storage key for the records blob
    pub const STORAGE_KEY: &'static str = "arcade_shooter_records";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `score` would beat the best score on record
    pub fn is_new_record(&self, score: u64) -> bool {
        score > self.high_score
    }

    /// Fold a finished run into the aggregates and the recent list
    pub fn record_game(&mut self, result: &RunResult, timestamp: f64) {
        self.high_score = self.high_score.max(result.score);
        self.best_accuracy = self.best_accuracy.max(result.accuracy);
        self.most_enemies_killed = self.most_enemies_killed.max(result.enemies_killed);
        self.total_games_played += 1;
        self.total_time_played += result.game_time_secs;

        self.recent_scores.insert(
            0,
            RecentScore {
                score: result.score,
                level: result.stage,
                enemies_killed: result.enemies_killed,
                accuracy: result.accuracy,
                date: timestamp,
            },
        );
        self.recent_scores.truncate(MAX_RECENT);
    }

    /// Insert a named run, keeping the board sorted by score and capped.
    /// Returns the 1-indexed rank, or None if it fell off the board.
    pub fn add_ranking(&mut self, entry: RankingEntry) -> Option<usize> {
        // Ties go after existing entries with the same score
        let pos = self
            .rankings
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.rankings.len());
        self.rankings.insert(pos, entry);
        self.rankings.truncate(MAX_RANKINGS);
        (pos < MAX_RANKINGS).then_some(pos + 1)
    }

    /// Forget everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Load from storage, falling back to empty records on any problem
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<GameRecords>(&json) {
                Ok(records) => {
                    log::info!(
                        "Loaded records: {} rankings, {} games",
                        records.rankings.len(),
                        records.total_games_played
                    );
                    records
                }
                Err(e) => {
                    log::warn!("Discarding unreadable records: {}", e);
                    Self::new()
                }
            },
            Ok(None) => {
                log::info!("No records found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not read records: {}", e);
                Self::new()
            }
        }
    }

    /// Write to storage; failures are logged and the in-memory copy stays authoritative
    pub fn save(&self, storage: &mut dyn Storage) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode records: {}", e);
                return;
            }
        };
        match storage.set_item(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Records saved ({} rankings)", self.rankings.len()),
            Err(e) => log::warn!("Could not save records: {}", e),
        }
    }
}

/// Current time as a Unix timestamp in ms
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Format a timestamp relative to `now` ("Just now", "3 mins ago", "Yesterday", ...)
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        match diff_days.floor() as i64 {
            1 => "Yesterday".to_string(),
            days if days < 7 => format!("{} days ago", days),
            _ => format_calendar_date(timestamp),
        }
    } else if diff_hours >= 1.0 {
        match diff_hours.floor() as i64 {
            1 => "1 hour ago".to_string(),
            hours => format!("{} hours ago", hours),
        }
    } else if diff_mins >= 1.0 {
        match diff_mins.floor() as i64 {
            1 => "1 min ago".to_string(),
            mins => format!("{} mins ago", mins),
        }
    } else {
        "Just now".to_string()
    }
}

/// `M/D/YY` in the browser's local time zone
#[cfg(target_arch = "wasm32")]
fn format_calendar_date(timestamp: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
    format!(
        "{}/{}/{}",
        date.get_month() + 1,
        date.get_date(),
        date.get_full_year() % 100
    )
}

/// `M/D/YY` in UTC
#[cfg(not(target_arch = "wasm32"))]
fn format_calendar_date(timestamp: f64) -> String {
    let days = (timestamp / 86_400_000.0).floor() as i64;
    let (year, month, day) = civil_from_days(days);
    format!("{}/{}/{:02}", month, day, year.rem_euclid(100))
}

/// Days since 1970-01-01 to a (year, month, day) civil date
#[cfg(not(target_arch = "wasm32"))]
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
