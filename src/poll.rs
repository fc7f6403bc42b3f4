//! One-shot file polls: path derivation, the metadata lookup, and the
//! change-detection decision.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use url::Url;

use crate::target::Baseline;

/// File metadata captured by a single poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub size: u64,
    pub modified: SystemTime,
}

impl From<Snapshot> for Baseline {
    fn from(snapshot: Snapshot) -> Self {
        Baseline::Polled {
            size: snapshot.size,
            modified: snapshot.modified,
        }
    }
}

/// What a completed poll means for its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollAction {
    /// First successful poll: record the baseline, don't reload.
    RecordBaseline,

    /// The file changed: reload the tab and update the baseline.
    Reload,

    /// Nothing changed.
    Unchanged,
}

/// Derives the filesystem path a `file://` URL points at.
///
/// Returns `None` for other schemes and for file URLs that don't map to
/// a path on this platform. `to_file_path` covers the drive-letter and
/// backslash conventions on Windows.
pub fn file_path(url: &Url) -> Option<PathBuf> {
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

/// Reads the current size and modification time of `path`.
pub async fn stat(path: &Path) -> io::Result<Snapshot> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(Snapshot {
        size: metadata.len(),
        modified: metadata.modified()?,
    })
}

/// Decides what a fresh snapshot means, given the recorded baseline.
///
/// The size comparison runs first so a size change always triggers a
/// reload, even on filesystems whose modification times are too coarse
/// to have moved yet. The time comparison is strict: an equal
/// modification time is not a change.
pub fn compare(baseline: Baseline, snapshot: Snapshot) -> PollAction {
    match baseline {
        Baseline::Unpolled => PollAction::RecordBaseline,
        Baseline::Polled { size, modified } => {
            if snapshot.size != size {
                PollAction::Reload
            } else if snapshot.modified > modified {
                PollAction::Reload
            } else {
                PollAction::Unchanged
            }
        }
    }
}
