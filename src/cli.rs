//! Command line.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::core::text::{parse_credits, parse_passages, DEFAULT_CREDITS, DEFAULT_PASSAGES};
use crate::core::source::STAGES;
use crate::core::{
    CharacterSource, FixedPoolSource, PassageOrder, PassageSource, ProgressiveSource,
    SessionConfig,
};
use crate::store::StoreConfig;
use crate::types::{Difficulty, GameMode, TOUCH_DEBOUNCE_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Unlock keys one at a time; the run ends on the ground
    Normal,
    /// Type from your own key set, no obstacles
    Practice,
    /// Type passages of text, no obstacles
    Text,
    /// Every key at once with obstacles, bounce off the ground
    Arcade,
    /// Watch the credits roll
    Credits,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s)
        .ok_or_else(|| format!("unknown difficulty `{s}` (easy, normal, hard, insane)"))
}

/// Keep the toucan in the air by typing
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, value_enum, default_value_t = ModeArg::Normal)]
    pub mode: ModeArg,

    /// easy, normal, hard or insane
    #[arg(short, long, default_value = "normal", value_parser = parse_difficulty)]
    pub difficulty: Difficulty,

    /// Level to start a normal run at; earlier keys come pre-unlocked
    #[arg(long, default_value_t = 1)]
    pub start_level: u32,

    /// Key set for practice mode
    #[arg(long, default_value = "asdfjkl;")]
    pub chars: String,

    /// Add the uppercase form of every letter in --chars
    #[arg(long)]
    pub shift: bool,

    /// Passage file for text mode, blocks separated by `~`
    #[arg(long)]
    pub passages: Option<PathBuf>,

    /// Read passages in file order instead of at random
    #[arg(long)]
    pub sequential: bool,

    /// Random seed; taken from the clock when omitted
    #[arg(long)]
    pub seed: Option<u32>,

    /// End the run with a victory screen on reaching this level
    #[arg(long)]
    pub victory_level: Option<u32>,

    /// Drop repeats of the same key within this many milliseconds
    #[arg(long, default_value_t = 0)]
    pub debounce_ms: u64,

    /// Use the touch-keyboard debounce window
    #[arg(long, conflicts_with = "debounce_ms")]
    pub touch: bool,

    /// Where scores, preferences and the log live
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Wipe stored high scores before starting; preferences are kept
    #[arg(long)]
    pub reset_scores: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn game_mode(&self) -> GameMode {
        match self.mode {
            ModeArg::Normal => GameMode::Normal {
                start_level: self.start_level,
            },
            ModeArg::Practice => GameMode::CustomPractice,
            ModeArg::Text => GameMode::TextPractice,
            ModeArg::Arcade => GameMode::Arcade,
            ModeArg::Credits => GameMode::Credits,
        }
    }

    /// The explicit seed, or one derived from the clock.
    pub fn seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }

    pub fn session_config(&self, seed: u32) -> SessionConfig {
        let debounce_ms = if self.touch {
            TOUCH_DEBOUNCE_MS
        } else {
            self.debounce_ms
        };
        let config = match self.mode {
            ModeArg::Credits => SessionConfig::credits(seed),
            _ => SessionConfig::new(self.game_mode(), self.difficulty).with_seed(seed),
        };
        config
            .with_debounce_ms(debounce_ms)
            .with_victory_level(self.victory_level)
    }

    /// The character source the chosen mode plays from.
    pub fn build_source(&self, seed: u32) -> Result<Box<dyn CharacterSource>> {
        let source: Box<dyn CharacterSource> = match self.mode {
            ModeArg::Normal => Box::new(ProgressiveSource::new(seed)),
            ModeArg::Practice => Box::new(
                FixedPoolSource::from_selection(&self.chars, self.shift, seed)
                    .context("invalid --chars selection")?,
            ),
            ModeArg::Arcade => Box::new(
                FixedPoolSource::new(STAGES.iter().flat_map(|stage| stage.chars()), seed)
                    .context("arcade key set is empty")?,
            ),
            ModeArg::Text => {
                let passages = match &self.passages {
                    Some(path) => {
                        let content = std::fs::read_to_string(path)
                            .with_context(|| format!("reading passages from {}", path.display()))?;
                        parse_passages(&content)
                    }
                    None => parse_passages(DEFAULT_PASSAGES),
                };
                let order = if self.sequential {
                    PassageOrder::Sequential
                } else {
                    PassageOrder::Random
                };
                Box::new(PassageSource::new(passages, order, seed).context("no usable passages")?)
            }
            ModeArg::Credits => Box::new(
                PassageSource::new(parse_credits(DEFAULT_CREDITS), PassageOrder::Sequential, seed)
                    .context("credits are empty")?,
            ),
        };
        Ok(source)
    }

    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::from_env();
        match &self.data_dir {
            Some(dir) => config.with_data_dir(dir),
            None => config,
        }
    }
}
