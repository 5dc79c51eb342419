//! Player settings and preferences
//!
//! Persisted separately from the shooter records, under their own key.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 50,
            QualityPreset::Medium => 200,
            QualityPreset::High => 1000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Ball trail behind the breaker ball
    pub trails: bool,
    /// Debris, explosions and warning sparks
    pub particles: bool,
    /// Red flash when an enemy slips past
    pub screen_flash: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            trails: true,
            particles: true,
            screen_flash: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key for the settings blob
    pub const STORAGE_KEY: &'static str = "arcade_settings";

    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the trail for performance
        if preset == QualityPreset::Low {
            self.trails = false;
        }
    }

    /// Effective screen flash (respects reduced_motion)
    pub fn effective_screen_flash(&self) -> bool {
        self.screen_flash && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Load from storage, falling back to defaults on any problem
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Discarding unreadable settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}
