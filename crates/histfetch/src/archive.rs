//! Archiving of the previous snapshot
//!
//! Before a new history is written, the current file is moved (not copied)
//! into the archive directory under a name stamped with the local time of
//! the move: `history.csv` becomes `history_2610171230.csv`.
//!
//! Archive entries accumulate; nothing here ever overwrites or deletes one.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `YYMMDDHHmm`
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%y%m%d%H%M";

/// What happened to the previous snapshot during one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArchiveStep {
    /// Archiving is turned off in the configuration
    Disabled,
    /// There was no current file to move
    NothingToArchive,
    Archived { path: PathBuf },
    /// The move failed; the current file is still in place
    Failed { error: String },
}

impl ArchiveStep {
    pub fn archived_path(&self) -> Option<&Path> {
        match self {
            ArchiveStep::Archived { path } => Some(path),
            _ => None,
        }
    }
}

/// Build the timestamped archive name for `filename`
pub fn archive_name(filename: &str, at: &NaiveDateTime) -> String {
    archive_name_with_suffix(filename, at, None)
}

fn archive_name_with_suffix(filename: &str, at: &NaiveDateTime, suffix: Option<u32>) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    let stamp = at.format(ARCHIVE_TIMESTAMP_FORMAT);

    let base = match suffix {
        Some(n) => format!("{}_{}_{}", stem, stamp, n),
        None => format!("{}_{}", stem, stamp),
    };

    match path.extension() {
        Some(ext) => format!("{}.{}", base, ext.to_string_lossy()),
        None => base,
    }
}

/// Pick a free archive path, appending `_1`, `_2`, ... when a snapshot was
/// already archived in the same minute
pub fn archive_path(archive_dir: &Path, filename: &str, at: &NaiveDateTime) -> PathBuf {
    let candidate = archive_dir.join(archive_name(filename, at));
    if !candidate.exists() {
        return candidate;
    }

    (1..)
        .map(|n| archive_dir.join(archive_name_with_suffix(filename, at, Some(n))))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Move `current` into `archive_dir` if it exists.
///
/// Failure is reported, never raised: the caller goes on to fetch anyway.
pub fn archive_current(
    current: &Path,
    archive_dir: &Path,
    filename: &str,
    at: &NaiveDateTime,
) -> ArchiveStep {
    if !current.exists() {
        tracing::debug!("No current snapshot at {}", current.display());
        return ArchiveStep::NothingToArchive;
    }

    let target = archive_path(archive_dir, filename, at);

    match move_file(current, &target) {
        Ok(()) => {
            tracing::info!("Archived {} to {}", current.display(), target.display());
            ArchiveStep::Archived { path: target }
        }
        Err(e) => {
            tracing::warn!(
                "Failed to archive {} to {}: {}",
                current.display(),
                target.display(),
                e
            );
            ArchiveStep::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Rename, falling back to copy + remove when the archive lives on another
/// filesystem. On failure the source is left where it was.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    let rename_err = match fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    if fs::copy(from, to).is_err() {
        return Err(rename_err);
    }

    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(e);
    }

    Ok(())
}
