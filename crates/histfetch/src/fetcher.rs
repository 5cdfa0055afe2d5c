//! Fetch-and-archive of the device history
//!
//! One invocation is a linear sequence:
//!
//! 1. create the output (and archive) directories
//! 2. move the current snapshot into the archive, if archiving is on
//! 3. GET `<endpoint>/api/history`
//! 4. write the body verbatim, unless the device failed or said `no_data`
//!
//! Only steps 1 and 4 can fail the invocation. Everything else ends up in
//! the returned [`FetchReport`].
//!
//! When archiving is on and the device answers `no_data`, the snapshot
//! moved in step 2 is not put back: the output path stays empty until the
//! next successful fetch.

use crate::archive::{archive_current, ArchiveStep};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::{HistorySource, HttpSource};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Body the device sends when it has nothing recorded
pub const NO_DATA_SENTINEL: &[u8] = b"no_data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// New history written to `path`
    Stored { path: PathBuf, bytes: u64 },
    NoData,
    /// Device answered with something other than 200
    RemoteError { status: u16 },
    /// Connection refused, timed out, or dropped
    Unavailable { reason: String },
}

impl FetchOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, FetchOutcome::Stored { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchReport {
    pub url: String,
    pub started_at: DateTime<Local>,
    pub archive: ArchiveStep,
    #[serde(flatten)]
    pub outcome: FetchOutcome,
}

pub struct HistoryFetcher<S = HttpSource> {
    config: Config,
    source: S,
}

impl HistoryFetcher<HttpSource> {
    pub fn new(config: Config) -> Self {
        let source = HttpSource::new(config.timeout);
        Self { config, source }
    }
}

impl<S: HistorySource> HistoryFetcher<S> {
    pub fn with_source(config: Config, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetch_and_store(&self) -> Result<FetchReport> {
        let started_at = Local::now();

        self.ensure_dirs()?;

        let current = self.config.history_file();
        let archive = if self.config.enable_archiving {
            archive_current(
                &current,
                &self.config.archive_dir,
                &self.config.output_filename,
                &Local::now().naive_local(),
            )
        } else {
            ArchiveStep::Disabled
        };

        let url = self.config.history_url();
        tracing::info!("Fetching history from {}", url);

        let outcome = match self.source.get(&url) {
            Err(e) => {
                tracing::warn!("Device unavailable (probably offline): {}", e);
                FetchOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
            Ok(response) if response.status != 200 => {
                tracing::warn!(status = response.status, "Device returned HTTP {}", response.status);
                FetchOutcome::RemoteError {
                    status: response.status,
                }
            }
            Ok(response) if response.body == NO_DATA_SENTINEL => {
                tracing::info!("Device reports no data available");
                FetchOutcome::NoData
            }
            Ok(response) => store(&current, &response.body)?,
        };

        Ok(FetchReport {
            url,
            started_at,
            archive,
            outcome,
        })
    }

    fn ensure_dirs(&self) -> Result<()> {
        create_dir(&self.config.output_dir)?;
        if self.config.enable_archiving {
            create_dir(&self.config.archive_dir)?;
        }
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn store(path: &Path, body: &[u8]) -> Result<FetchOutcome> {
    fs::write(path, body).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let bytes = body.len() as u64;
    tracing::info!("Stored new history in {} ({} bytes)", path.display(), bytes);

    Ok(FetchOutcome::Stored {
        path: path.to_path_buf(),
        bytes,
    })
}
