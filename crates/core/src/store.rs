//! Persistence boundary for high scores and preferences.
//!
//! The session only talks to [`ScoreStore`]. Implementations decide where the
//! data lives; they must answer reads immediately and must never block the
//! caller on disk.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::{Preference, ScoreKey};

pub trait ScoreStore: Send + Sync {
    fn score(&self, key: ScoreKey) -> u32;

    /// Store `value` if it beats the stored one. Returns whether it did.
    fn save_score(&self, key: ScoreKey, value: u32) -> bool;

    fn preference(&self, pref: Preference) -> bool;

    fn set_preference(&self, pref: Preference, value: bool);

    /// Back to defaults: normal level 1, every streak 0. Preferences are kept.
    fn reset_scores(&self);
}

/// In-memory store. Used by tests and when persistence is disabled.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    scores: HashMap<ScoreKey, u32>,
    prefs: HashMap<Preference, bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn score(&self, key: ScoreKey) -> u32 {
        self.inner
            .lock()
            .scores
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    fn save_score(&self, key: ScoreKey, value: u32) -> bool {
        let mut inner = self.inner.lock();
        let current = inner
            .scores
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_value());
        if value > current {
            inner.scores.insert(key, value);
            true
        } else {
            false
        }
    }

    fn preference(&self, pref: Preference) -> bool {
        self.inner
            .lock()
            .prefs
            .get(&pref)
            .copied()
            .unwrap_or_else(|| pref.default_value())
    }

    fn set_preference(&self, pref: Preference, value: bool) {
        self.inner.lock().prefs.insert(pref, value);
    }

    fn reset_scores(&self) {
        self.inner.lock().scores.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_only_improvements() {
        let store = MemoryStore::new();
        assert_eq!(store.score(ScoreKey::NormalLevel), 1);
        assert!(!store.save_score(ScoreKey::NormalLevel, 1));
        assert!(store.save_score(ScoreKey::NormalLevel, 4));
        assert!(!store.save_score(ScoreKey::NormalLevel, 3));
        assert_eq!(store.score(ScoreKey::NormalLevel), 4);
    }

    #[test]
    fn reset_keeps_preferences() {
        let store = MemoryStore::new();
        store.save_score(ScoreKey::ArcadeStreak, 12);
        store.set_preference(Preference::CapitalsEnabled, true);
        store.reset_scores();
        assert_eq!(store.score(ScoreKey::ArcadeStreak), 0);
        assert_eq!(store.score(ScoreKey::NormalLevel), 1);
        assert!(store.preference(Preference::CapitalsEnabled));
    }

    #[test]
    fn preferences_overwrite() {
        let store = MemoryStore::new();
        assert!(store.preference(Preference::SoundEnabled));
        store.set_preference(Preference::SoundEnabled, false);
        assert!(!store.preference(Preference::SoundEnabled));
        store.set_preference(Preference::SoundEnabled, true);
        assert!(store.preference(Preference::SoundEnabled));
    }
}
