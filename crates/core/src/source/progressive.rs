//! Progressive unlock source with adaptive weighting.
//!
//! Characters unlock in keyboard-lesson order. Each unlocked character carries a
//! weight: typing it correctly lowers the weight toward a floor, crashing on it
//! resets the weight to the baseline. Picks are proportional to weight, so the
//! characters a player fumbles come up more often.
//!
//! # Weights
//!
//! | Event | Effect |
//! |-------|--------|
//! | unlock | weight = 10 |
//! | correct type | weight - 1, never below the floor (5 for vowels, 1 otherwise) |
//! | crash | weight = 10 |
//!
//! A weight below 1 still counts as 1 when sampling.

use std::collections::HashMap;

use tracing::debug;

use super::{CharacterSource, SourceKind, Unlocked};
use crate::error::SourceError;
use crate::rng::SimpleRng;
use crate::types::{BASE_WEIGHT, CONSONANT_FLOOR, VOWEL_FLOOR};

/// Unlock order: the home row outward, then digits, then symbols.
pub const STAGES: [&str; 2] = ["asdfjkl;ghqweruioptyzxcvm,./bn1234567890-", "!@#$%()"];

fn is_vowel(ch: char) -> bool {
    matches!(
        ch,
        'a' | 'e' | 'i' | 'o' | 'u' | 'A' | 'E' | 'I' | 'O' | 'U'
    )
}

/// Lowest weight correct typing can bring `ch` down to.
pub fn weight_floor(ch: char) -> u32 {
    if is_vowel(ch) {
        VOWEL_FLOOR
    } else {
        CONSONANT_FLOOR
    }
}

fn effective(weight: u32) -> u32 {
    weight.max(1)
}

/// Per-character weights plus the active pool and its cached total.
///
/// `total` always equals the sum of effective weights over `pool`. Incremental
/// updates keep it in sync on type/crash; [`WeightTable::rebuild`] recomputes it
/// when the pool itself changes.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    weights: HashMap<char, u32>,
    pool: Vec<char>,
    total: u32,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(&self, ch: char) -> u32 {
        self.weights.get(&ch).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Characters currently eligible for sampling.
    pub fn pool(&self) -> &[char] {
        &self.pool
    }

    /// Reset `ch` to the baseline weight without touching the pool.
    fn unlock(&mut self, ch: char) {
        self.weights.insert(ch, BASE_WEIGHT);
    }

    /// Rebuild the active pool from the unlocked base characters.
    ///
    /// Uppercase twins keep whatever weight they already earned; new entries start
    /// at the baseline.
    pub fn rebuild(&mut self, unlocked: &[char], capitals: bool) {
        self.pool.clear();
        for &ch in unlocked {
            self.pool.push(ch);
            self.weights.entry(ch).or_insert(BASE_WEIGHT);

            if capitals && ch.is_lowercase() && ch.is_alphabetic() {
                for upper in ch.to_uppercase() {
                    self.pool.push(upper);
                    self.weights.entry(upper).or_insert(BASE_WEIGHT);
                }
            }
        }
        self.total = self.summed_total();
        debug_assert!(self.is_consistent());
    }

    pub fn record_typed(&mut self, ch: char) {
        let current = self.weight(ch);
        if current > weight_floor(ch) {
            self.weights.insert(ch, current - 1);
            if self.pool.contains(&ch) {
                self.total -= 1;
            }
        }
        debug_assert!(self.is_consistent());
    }

    pub fn record_crash(&mut self, ch: char) {
        let old = effective(self.weight(ch));
        self.weights.insert(ch, BASE_WEIGHT);
        if self.pool.contains(&ch) {
            self.total = self.total + BASE_WEIGHT - old;
        }
        debug_assert!(self.is_consistent());
    }

    /// Weighted pick over the active pool.
    pub fn sample(&self, rng: &mut SimpleRng) -> Option<char> {
        let last = *self.pool.last()?;
        if self.total == 0 {
            return Some(last);
        }

        let mut r = rng.next_range(self.total);
        for &ch in &self.pool {
            let w = effective(self.weight(ch));
            if r < w {
                return Some(ch);
            }
            r -= w;
        }
        Some(last)
    }

    fn summed_total(&self) -> u32 {
        self.pool.iter().map(|&c| effective(self.weight(c))).sum()
    }

    /// Cached total matches a full recomputation.
    pub fn is_consistent(&self) -> bool {
        self.total == self.summed_total()
    }
}

/// Source that unlocks [`STAGES`] one character at a time.
#[derive(Debug, Clone)]
pub struct ProgressiveSource {
    stages: Vec<Vec<char>>,
    stage_index: usize,
    char_index: usize,
    unlocked: Vec<char>,
    capitals: bool,
    table: WeightTable,
    rng: SimpleRng,
}

impl ProgressiveSource {
    /// Start with only the first character of the first stage unlocked.
    pub fn new(seed: u32) -> Self {
        let stages: Vec<Vec<char>> = STAGES.iter().map(|s| s.chars().collect()).collect();

        let mut table = WeightTable::new();
        let mut unlocked = Vec::new();
        if let Some(&first) = stages.first().and_then(|s| s.first()) {
            table.unlock(first);
            unlocked.push(first);
        }
        table.rebuild(&unlocked, false);

        Self {
            stages,
            stage_index: 0,
            char_index: 1,
            unlocked,
            capitals: false,
            table,
            rng: SimpleRng::new(seed),
        }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.table
    }

    /// Base characters unlocked so far, in unlock order.
    pub fn unlocked(&self) -> &[char] {
        &self.unlocked
    }

    pub fn capitals_enabled(&self) -> bool {
        self.capitals
    }

    /// Number of base characters across every stage.
    pub fn total_chars(&self) -> usize {
        self.stages.iter().map(Vec::len).sum()
    }
}

impl CharacterSource for ProgressiveSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Progressive
    }

    fn next_char(&mut self) -> Result<char, SourceError> {
        self.table
            .sample(&mut self.rng)
            .ok_or(SourceError::EmptyPool)
    }

    fn on_char_typed(&mut self, ch: char) {
        self.table.record_typed(ch);
    }

    fn on_crash(&mut self, ch: char) {
        self.table.record_crash(ch);
    }

    fn expand_pool(&mut self) -> Unlocked {
        let mut added = Unlocked::new();
        let Some(stage) = self.stages.get(self.stage_index) else {
            return added;
        };
        let Some(&ch) = stage.get(self.char_index) else {
            return added;
        };
        let stage_len = stage.len();

        self.unlocked.push(ch);
        self.table.unlock(ch);
        self.table.rebuild(&self.unlocked, self.capitals);

        added.push(ch);
        if self.capitals && ch.is_lowercase() && ch.is_alphabetic() {
            if let Some(upper) = ch.to_uppercase().next() {
                added.push(upper);
            }
        }

        self.char_index += 1;
        if self.char_index >= stage_len {
            self.stage_index += 1;
            self.char_index = 0;
        }

        debug!(unlocked = %ch, count = self.unlocked.len(), "character unlocked");
        added
    }

    fn set_capitals_enabled(&mut self, enabled: bool) {
        if self.capitals != enabled {
            self.capitals = enabled;
            self.table.rebuild(&self.unlocked, enabled);
        }
    }

    fn is_complete(&self) -> bool {
        self.stage_index >= self.stages.len()
    }

    fn progress_label(&self) -> String {
        format!("{}/{}", self.unlocked.len(), self.total_chars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_exposes_only_first_char() {
        let src = ProgressiveSource::new(1);
        assert_eq!(src.weights().pool(), &['a']);
        assert_eq!(src.weights().weight('a'), BASE_WEIGHT);
        assert_eq!(src.weights().total(), BASE_WEIGHT);
        assert!(!src.is_complete());
    }

    #[test]
    fn draws_only_from_active_pool() {
        let mut src = ProgressiveSource::new(5);
        for _ in 0..20 {
            assert_eq!(src.next_char(), Ok('a'));
        }
    }

    #[test]
    fn typing_lowers_weight_to_floor() {
        let mut src = ProgressiveSource::new(1);
        src.on_char_typed('a');
        src.on_char_typed('a');
        assert_eq!(src.weights().weight('a'), 8);

        for _ in 0..20 {
            src.on_char_typed('a');
        }
        assert_eq!(src.weights().weight('a'), VOWEL_FLOOR);
        assert_eq!(src.weights().total(), VOWEL_FLOOR);

        src.expand_pool();
        for _ in 0..20 {
            src.on_char_typed('s');
        }
        assert_eq!(src.weights().weight('s'), CONSONANT_FLOOR);
        assert!(src.weights().is_consistent());
    }

    #[test]
    fn crash_restores_baseline() {
        let mut src = ProgressiveSource::new(1);
        for _ in 0..4 {
            src.on_char_typed('a');
        }
        src.on_crash('a');
        assert_eq!(src.weights().weight('a'), BASE_WEIGHT);
        assert_eq!(src.weights().total(), BASE_WEIGHT);
    }

    #[test]
    fn expanding_through_every_stage_completes() {
        let mut src = ProgressiveSource::new(1);
        let remaining = src.total_chars() - 1;
        for i in 0..remaining {
            let added = src.expand_pool();
            assert_eq!(added.len(), 1, "expansion {i} added nothing");
        }
        assert!(src.is_complete());
        assert!(src.expand_pool().is_empty());
        assert_eq!(src.unlocked().len(), src.total_chars());
        assert_eq!(src.progress_label(), "48/48");
    }

    #[test]
    fn capitals_add_uppercase_twins() {
        let mut src = ProgressiveSource::new(1);
        src.on_char_typed('a');
        src.set_capitals_enabled(true);
        assert_eq!(src.weights().pool(), &['a', 'A']);
        assert_eq!(src.weights().total(), 9 + BASE_WEIGHT);

        let added = src.expand_pool();
        assert_eq!(added.as_slice(), &['s', 'S']);

        // Twins keep their earned weight across toggles.
        src.on_char_typed('A');
        src.set_capitals_enabled(false);
        src.set_capitals_enabled(true);
        assert_eq!(src.weights().weight('A'), 9);
        assert!(src.weights().is_consistent());
    }

    #[test]
    fn symbols_have_no_uppercase_twin() {
        let mut src = ProgressiveSource::new(1);
        src.set_capitals_enabled(true);
        // Unlock up to ';' (index 7 of stage 0).
        let mut last = Unlocked::new();
        for _ in 0..7 {
            last = src.expand_pool();
        }
        assert_eq!(last.as_slice(), &[';']);
    }

    #[test]
    fn typing_a_char_outside_the_pool_leaves_total_alone() {
        let mut table = WeightTable::new();
        table.unlock('q');
        table.rebuild(&['a'], false);
        let before = table.total();
        table.record_typed('q');
        table.record_crash('q');
        assert_eq!(table.total(), before);
        assert!(table.is_consistent());
    }

    #[test]
    fn sampling_follows_weights() {
        let mut table = WeightTable::new();
        table.rebuild(&['a', 's'], false);
        for _ in 0..9 {
            table.record_typed('s');
        }
        assert_eq!(table.weight('s'), CONSONANT_FLOOR);

        let mut rng = SimpleRng::new(42);
        let mut a_count = 0;
        for _ in 0..1100 {
            if table.sample(&mut rng) == Some('a') {
                a_count += 1;
            }
        }
        // Expected 1000 of 1100.
        assert!(a_count > 900, "a drawn {a_count} times");
    }
}
