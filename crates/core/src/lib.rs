//! Core simulation for Typing Toucan: pure, deterministic, and testable.
//!
//! Nothing in here touches the terminal, the clock or the disk. The host feeds
//! frame deltas and key presses into a [`Session`], drains its events and renders
//! its [`SessionSnapshot`]. Persistence goes through the [`ScoreStore`] trait.
//!
//! # Module Structure
//!
//! - [`session`]: one run of one mode: physics, scoring, levels, streaks
//! - [`queue`]: the characters the player has to type next
//! - [`source`]: character sources (progressive unlocks, fixed pool, passages)
//! - [`bird`], [`obstacle`], [`spawner`]: the playfield
//! - [`store`]: the persistence boundary and an in-memory store
//! - [`text`]: bundled passages and credits
//!
//! # Rules
//!
//! - **Typing**: every correct key flaps the bird; a wrong key costs one point of
//!   level progression and flashes the hurt overlay
//! - **Levels**: five obstacles passed unlock the next character
//! - **Crashes**: normal mode ends the run on the ground, practice modes bounce
//! - **Streaks**: practice and arcade modes count consecutive correct keys
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use typing_toucan_core::{MemoryStore, Phase, ProgressiveSource, Session, SessionConfig};
//!
//! let mut session = Session::new(
//!     SessionConfig::default(),
//!     Box::new(ProgressiveSource::new(42)),
//!     Arc::new(MemoryStore::new()),
//! )
//! .unwrap();
//!
//! let head = session.queue().first().unwrap();
//! session.type_char(head);
//! assert_eq!(session.phase(), Phase::Playing);
//!
//! session.update(1.0 / 60.0);
//! for event in session.drain_events() {
//!     println!("{event:?}");
//! }
//! ```

pub mod bird;
pub mod debounce;
pub mod error;
pub mod obstacle;
pub mod queue;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod source;
pub mod spawner;
pub mod store;
pub mod text;

pub use typing_toucan_types as types;

pub use bird::{Bird, Rect};
pub use debounce::InputFilter;
pub use error::{ConfigError, SourceError};
pub use obstacle::{Obstacle, ObstacleId, ObstaclePool};
pub use queue::TypingQueue;
pub use rng::SimpleRng;
pub use session::{KeyOutcome, Session, SessionConfig};
pub use snapshot::{BirdSnapshot, PassageSnapshot, SessionSnapshot};
pub use source::{
    CharacterSource, FixedPoolSource, Passage, PassageOrder, PassageSource, ProgressiveSource,
    SourceKind,
};
pub use spawner::{ObstacleSpawner, SpawnPlan};
pub use store::{MemoryStore, ScoreStore};
pub use types::{Difficulty, GameMode, MusicCommand, Phase, SessionEvent, SoundCue};
