//! # histfetch
//!
//! Pull the CSV history log off an ESP32 and keep the previous copies.
//!
//! The device serves its log at `<endpoint>/api/history`: a CSV body, or the
//! literal `no_data` when it has nothing recorded. Each invocation moves the
//! current `data/history.csv` to `backups/history_<YYMMDDHHmm>.csv` and
//! writes the fresh download in its place.
//!
//! ```no_run
//! use histfetch::{Config, HistoryFetcher, Result};
//!
//! fn main() -> Result<()> {
//!     let fetcher = HistoryFetcher::new(Config::default());
//!     let report = fetcher.fetch_and_store()?;
//!     println!("{:?}", report.outcome);
//!     Ok(())
//! }
//! ```
//!
//! Network trouble, HTTP errors and `no_data` are reported, not raised. Only
//! failing to create a directory or to write the file returns an error.

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod hook;
pub mod source;

pub use archive::ArchiveStep;
pub use config::Config;
pub use error::{Error, Result};
pub use fetcher::{FetchOutcome, FetchReport, HistoryFetcher};
pub use source::{HistorySource, HttpSource, RemoteResponse, SourceError};
