//! On-disk layout of scores and preferences.

use serde::{Deserialize, Serialize};
use typing_toucan_core::types::{Preference, ScoreKey};

fn default_level() -> u32 {
    ScoreKey::NormalLevel.default_value()
}

fn default_on() -> bool {
    true
}

/// Everything the store persists, serialized as one JSON object.
///
/// Missing fields take their defaults so older files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default = "default_level")]
    pub normal_level: u32,
    #[serde(default)]
    pub custom_streak: u32,
    #[serde(default)]
    pub text_streak: u32,
    #[serde(default)]
    pub arcade_streak: u32,
    #[serde(default)]
    pub capitals_enabled: bool,
    #[serde(default = "default_on")]
    pub sound_enabled: bool,
    #[serde(default = "default_on")]
    pub music_enabled: bool,
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self {
            normal_level: default_level(),
            custom_streak: 0,
            text_streak: 0,
            arcade_streak: 0,
            capitals_enabled: false,
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

impl ScoreRecord {
    pub fn score(&self, key: ScoreKey) -> u32 {
        match key {
            ScoreKey::NormalLevel => self.normal_level,
            ScoreKey::CustomStreak => self.custom_streak,
            ScoreKey::TextStreak => self.text_streak,
            ScoreKey::ArcadeStreak => self.arcade_streak,
        }
    }

    pub fn score_mut(&mut self, key: ScoreKey) -> &mut u32 {
        match key {
            ScoreKey::NormalLevel => &mut self.normal_level,
            ScoreKey::CustomStreak => &mut self.custom_streak,
            ScoreKey::TextStreak => &mut self.text_streak,
            ScoreKey::ArcadeStreak => &mut self.arcade_streak,
        }
    }

    pub fn preference(&self, pref: Preference) -> bool {
        match pref {
            Preference::CapitalsEnabled => self.capitals_enabled,
            Preference::SoundEnabled => self.sound_enabled,
            Preference::MusicEnabled => self.music_enabled,
        }
    }

    pub fn set_preference(&mut self, pref: Preference, value: bool) {
        match pref {
            Preference::CapitalsEnabled => self.capitals_enabled = value,
            Preference::SoundEnabled => self.sound_enabled = value,
            Preference::MusicEnabled => self.music_enabled = value,
        }
    }

    pub fn reset_scores(&mut self) {
        for key in ScoreKey::ALL {
            *self.score_mut(key) = key.default_value();
        }
    }
}
