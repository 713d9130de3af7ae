//! Uniform picks from a hand-selected character set.

use super::{CharacterSource, SourceKind};
use crate::error::{ConfigError, SourceError};
use crate::rng::SimpleRng;

#[derive(Debug, Clone)]
pub struct FixedPoolSource {
    chars: Vec<char>,
    rng: SimpleRng,
}

impl FixedPoolSource {
    /// Build from an explicit list. Duplicates are kept and weigh in proportionally.
    pub fn new(chars: impl IntoIterator<Item = char>, seed: u32) -> Result<Self, ConfigError> {
        let chars: Vec<char> = chars.into_iter().collect();
        if chars.is_empty() {
            return Err(ConfigError::EmptyPool);
        }
        Ok(Self {
            chars,
            rng: SimpleRng::new(seed),
        })
    }

    /// Build from a selection of base characters, deduplicated in order.
    ///
    /// With `shift` held every letter also brings its uppercase form.
    pub fn from_selection(selection: &str, shift: bool, seed: u32) -> Result<Self, ConfigError> {
        let mut chars = Vec::new();
        for ch in selection.chars().filter(|c| !c.is_control()) {
            if chars.contains(&ch) {
                continue;
            }
            chars.push(ch);
            if shift && ch.is_alphabetic() {
                for upper in ch.to_uppercase() {
                    if upper != ch && !chars.contains(&upper) {
                        chars.push(upper);
                    }
                }
            }
        }
        Self::new(chars, seed)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl CharacterSource for FixedPoolSource {
    fn kind(&self) -> SourceKind {
        SourceKind::FixedPool
    }

    fn next_char(&mut self) -> Result<char, SourceError> {
        self.rng
            .pick(&self.chars)
            .copied()
            .ok_or(SourceError::EmptyPool)
    }

    fn on_char_typed(&mut self, _ch: char) {}

    fn on_crash(&mut self, _ch: char) {}

    fn progress_label(&self) -> String {
        "Practice".to_string()
    }
}
