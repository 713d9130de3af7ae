//! File-backed persistence for Typing Toucan.
//!
//! [`FileStore`] keeps the current [`ScoreRecord`] in memory and answers every
//! read from there. Each change is handed to a writer task running on a small
//! tokio runtime owned by the store, which serializes the record to JSON and
//! swaps it into place. The game loop never waits on the disk; a write lost to
//! an abrupt exit only loses that change.
//!
//! # Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `TOUCAN_DATA_DIR` | Directory for `scores.json` and the log (default `~/.typing-toucan`) |
//! | `TOUCAN_STORE_DISABLED` | `1` or `true` keeps everything in memory |
//! | `TOUCAN_LOG_PATH` | Log file override |

pub mod config;
pub mod record;
pub mod worker;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use typing_toucan_core::types::{Preference, ScoreKey};
use typing_toucan_core::{MemoryStore, ScoreStore};

pub use config::{StoreConfig, SCORE_FILE};
pub use record::ScoreRecord;
pub use worker::StoreCommand;

/// Read the record at `path`. A missing file is a fresh install; a corrupt one
/// is logged and replaced by defaults.
pub fn load_record(path: &Path) -> ScoreRecord {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "score file unreadable, starting fresh");
            ScoreRecord::default()
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => ScoreRecord::default(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot open score file, starting fresh");
            ScoreRecord::default()
        }
    }
}

/// Running file store.
pub struct FileStore {
    record: Mutex<ScoreRecord>,
    path: PathBuf,
    tx: mpsc::UnboundedSender<StoreCommand>,
    writer: Mutex<Option<JoinHandle<()>>>,
    rt: Runtime,
}

impl FileStore {
    /// Load `scores.json` from the configured directory and start the writer.
    pub fn open(config: &StoreConfig) -> anyhow::Result<Self> {
        let path = config.score_path();
        let record = load_record(&path);

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("toucan-store")
            .enable_all()
            .build()
            .context("failed to create store runtime")?;
        let (tx, rx) = mpsc::unbounded_channel::<StoreCommand>();
        let writer = rt.spawn(worker::run_writer(path.clone(), rx));

        info!(path = %path.display(), "score store opened");
        Ok(Self {
            record: Mutex::new(record),
            path,
            tx,
            writer: Mutex::new(Some(writer)),
            rt,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the in-memory record.
    pub fn record(&self) -> ScoreRecord {
        self.record.lock().clone()
    }

    fn persist(&self, record: ScoreRecord) {
        if self.tx.send(StoreCommand::Write(record)).is_err() {
            warn!("store writer is gone, change not saved");
        }
    }

    /// Flush pending writes and stop the writer. Later changes stay in memory.
    pub fn shutdown(&self) {
        let Some(handle) = self.writer.lock().take() else {
            return;
        };
        let _ = self.tx.send(StoreCommand::Shutdown);
        if let Err(err) = self.rt.block_on(handle) {
            warn!(error = %err, "store writer panicked");
        }
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl ScoreStore for FileStore {
    fn score(&self, key: ScoreKey) -> u32 {
        self.record.lock().score(key)
    }

    fn save_score(&self, key: ScoreKey, value: u32) -> bool {
        let snapshot = {
            let mut record = self.record.lock();
            let slot = record.score_mut(key);
            if value <= *slot {
                return false;
            }
            *slot = value;
            record.clone()
        };
        self.persist(snapshot);
        true
    }

    fn preference(&self, pref: Preference) -> bool {
        self.record.lock().preference(pref)
    }

    fn set_preference(&self, pref: Preference, value: bool) {
        let snapshot = {
            let mut record = self.record.lock();
            record.set_preference(pref, value);
            record.clone()
        };
        self.persist(snapshot);
    }

    fn reset_scores(&self) {
        let snapshot = {
            let mut record = self.record.lock();
            record.reset_scores();
            record.clone()
        };
        info!("high scores reset");
        self.persist(snapshot);
    }
}

/// Open the store described by `config`: in memory when disabled, else on disk.
pub fn open_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn ScoreStore>> {
    if config.disabled {
        info!("persistence disabled, using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(FileStore::open(config)?))
}
