//! Background writer.
//!
//! Bridges the synchronous game loop with async file I/O: the store hands every
//! new record to a task on its own tokio runtime and never waits for the write.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::record::ScoreRecord;

/// Command delivered to the writer task.
#[derive(Debug, Clone)]
pub enum StoreCommand {
    Write(ScoreRecord),
    Shutdown,
}

/// Write `record` as JSON next to `path`, then rename it into place.
pub async fn write_record(path: &Path, record: &ScoreRecord) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(record).context("encoding score record")?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Drain commands until shutdown or until every sender is gone.
///
/// Writes queued back to back collapse into the newest one; they carry full
/// records, so only the last matters.
pub async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<StoreCommand>) {
    while let Some(cmd) = rx.recv().await {
        let StoreCommand::Write(mut latest) = cmd else {
            break;
        };
        let mut shutdown = false;
        while let Ok(next) = rx.try_recv() {
            match next {
                StoreCommand::Write(record) => latest = record,
                StoreCommand::Shutdown => {
                    shutdown = true;
                    break;
                }
            }
        }

        match write_record(&path, &latest).await {
            Ok(()) => debug!(path = %path.display(), "scores saved"),
            Err(err) => warn!(error = %format!("{err:#}"), "failed to save scores"),
        }
        if shutdown {
            break;
        }
    }
    debug!("store writer stopped");
}
