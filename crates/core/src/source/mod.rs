//! Character sources feeding the typing queue.
//!
//! A [`CharacterSource`] decides which character the player has to type next and
//! reacts to the player's performance. Three strategies exist:
//!
//! - [`ProgressiveSource`]: unlocks characters one at a time and favours the ones the
//!   player struggles with
//! - [`FixedPoolSource`]: uniform picks from a hand-selected set
//! - [`PassageSource`]: reads word-wrapped passages in order

pub mod fixed_pool;
pub mod passage;
pub mod progressive;

use arrayvec::ArrayVec;

use crate::error::SourceError;

pub use fixed_pool::FixedPoolSource;
pub use passage::{Passage, PassageDisplay, PassageOrder, PassageSource};
pub use progressive::{ProgressiveSource, WeightTable, STAGES};

/// Characters made visible by one `expand_pool` call: the base character and, with
/// capitals enabled, its uppercase twin.
pub type Unlocked = ArrayVec<char, 2>;

/// Which strategy a source implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Progressive,
    FixedPool,
    Passage,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Progressive => "progressive",
            SourceKind::FixedPool => "fixed-pool",
            SourceKind::Passage => "passage",
        }
    }
}

pub trait CharacterSource {
    fn kind(&self) -> SourceKind;

    /// Produce the next character for the queue.
    fn next_char(&mut self) -> Result<char, SourceError>;

    /// The player typed `ch` correctly.
    fn on_char_typed(&mut self, ch: char);

    /// The run crashed while `ch` was at the head of the queue.
    fn on_crash(&mut self, ch: char);

    /// Unlock the next character. Empty once nothing is left to unlock.
    fn expand_pool(&mut self) -> Unlocked {
        Unlocked::new()
    }

    fn set_capitals_enabled(&mut self, _enabled: bool) {}

    /// True once every unlockable character is available.
    fn is_complete(&self) -> bool {
        false
    }

    /// Short HUD label describing the source's progress.
    fn progress_label(&self) -> String;

    /// Line-oriented view of the passage being typed, for passage sources only.
    fn passage_display(&self) -> Option<PassageDisplay<'_>> {
        None
    }
}
