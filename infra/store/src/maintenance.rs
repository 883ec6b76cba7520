//! Startup cleanup of leftovers from interrupted writes.
//!
//! A crash between temp-file creation and the final rename leaves a
//! `*.hearthtmp.*` file behind. Those are garbage by definition: the rename
//! never happened, so no record points at them. Recent temp files are left
//! alone since another process may still be mid-write.

use crate::engine::TMP_MARKER;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::WalkDir;

const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();

    match tokio::task::spawn_blocking(move || sweep(&root)).await {
        Ok(stats) if stats.removed > 0 || stats.failed > 0 => {
            info!(removed = stats.removed, failed = stats.failed, "Purged stale temp files");
        },
        Ok(_) => {},
        Err(e) => {
            error!(error = %e, "Temp file cleanup task panicked");
        },
    }
}

#[derive(Debug, Default)]
struct SweepStats {
    removed: usize,
    failed: usize,
}

fn sweep(root: &Path) -> SweepStats {
    let mut stats = SweepStats::default();
    let cutoff = SystemTime::now();

    // contents_first so emptied shard directories can be dropped on the way up.
    for entry in WalkDir::new(root).contents_first(true).into_iter().flatten() {
        let path = entry.path();
        if path == root {
            continue;
        }

        if entry.file_type().is_dir() {
            // Only succeeds when the directory is empty.
            let _ = std::fs::remove_dir(path);
            continue;
        }

        if entry.file_type().is_file() && is_stale_tmp(path, cutoff) {
            match std::fs::remove_file(path) {
                Ok(()) => stats.removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove temp file");
                    stats.failed += 1;
                },
            }
        }
    }

    stats
}

fn is_stale_tmp(path: &Path, cutoff: SystemTime) -> bool {
    let is_tmp = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(TMP_MARKER));
    if !is_tmp {
        return false;
    }

    // Unreadable metadata counts as stale; better to drop an orphan twice
    // than to keep it forever.
    age_of(path, cutoff).is_none_or(|age| age > STALE_AFTER)
}

fn age_of(path: &Path, cutoff: SystemTime) -> Option<Duration> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    cutoff.duration_since(modified).ok()
}
