//! Polling change detection over the watched source directories.
//!
//! A snapshot records the last-modified timestamp of every file directly
//! inside the watched directories. The poll loop re-stats that same file
//! list each cycle; the first divergence ends the cycle early. Files created
//! after the snapshot are invisible until the next snapshot is taken; a
//! snapshotted file that can no longer be statted counts as changed.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use std::{fs, io};

use tokio::time;

/// Default poll cadence, balancing responsiveness against the cost of
/// re-statting every watched file each cycle.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Why a watch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Some watched file's modification timestamp drifted from the snapshot.
    ChangeDetected,
    /// The shutdown signal fired before any change was observed.
    Cancelled,
}

/// Errors that can occur while capturing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to scan {path}: {source}")]
    Scan { path: PathBuf, source: io::Error },
}

/// Point-in-time record of every watched file's modification timestamp.
///
/// Immutable once captured; the develop loop captures a fresh snapshot each
/// time it re-enters the watch phase.
#[derive(Debug, Clone)]
pub struct WatchSnapshot {
    entries: Vec<(PathBuf, SystemTime)>,
}

impl WatchSnapshot {
    /// Record the mtime of every file directly inside each directory, in
    /// file-name order per directory.
    pub fn capture(dirs: &[&Path]) -> Result<Self, WatchError> {
        let mut entries = Vec::new();

        for dir in dirs {
            let scan = |source| WatchError::Scan {
                path: dir.to_path_buf(),
                source,
            };

            let mut files = Vec::new();
            for entry in fs::read_dir(dir).map_err(scan)? {
                let entry = entry.map_err(scan)?;
                let metadata = entry.metadata().map_err(scan)?;
                if !metadata.is_file() {
                    continue;
                }
                let modified = metadata.modified().map_err(scan)?;
                files.push((entry.path(), modified));
            }
            files.sort_by(|a, b| a.0.cmp(&b.0));
            entries.extend(files);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first file whose current mtime differs from the snapshot, if
    /// any. Remaining files are not checked once one diverges.
    pub fn first_drift(&self) -> Option<&Path> {
        self.entries.iter().find_map(|(path, recorded)| {
            match fs::metadata(path).and_then(|m| m.modified()) {
                Ok(current) if current == *recorded => None,
                // Drifted, or no longer statable: deletion counts as a
                // change too.
                _ => Some(path.as_path()),
            }
        })
    }
}

/// Poll the snapshot until a change is observed or `shutdown` completes.
pub async fn watch(
    snapshot: &WatchSnapshot,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
) -> WatchOutcome {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => return WatchOutcome::Cancelled,
            _ = time::sleep(interval) => {
                if let Some(path) = snapshot.first_drift() {
                    tracing::info!("change detected in {}", path.display());
                    return WatchOutcome::ChangeDetected;
                }
            }
        }
    }
}
