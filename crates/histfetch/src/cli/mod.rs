pub mod output;

use crate::config::{
    Config, DEFAULT_ARCHIVE_DIR, DEFAULT_ENDPOINT, DEFAULT_FILENAME, DEFAULT_OUTPUT_DIR,
    DEFAULT_TIMEOUT_SECS,
};
use crate::error::Result;
use crate::hook::DEFAULT_HOOK_TARGET;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub use output::{OutputFormat, OutputWriter};

const AFTER_HELP: &str = r#"EXAMPLES:
  histfetch                                  Fetch once with the defaults
  histfetch -e http://10.0.0.7 --no-archive  Other device, overwrite in place
  histfetch watch --interval 600             Fetch every ten minutes
  histfetch hook -- pio run -t uploadfs      Fetch right before uploadfs

Every option can also be set through its HISTFETCH_* environment variable."#;

#[derive(Parser, Debug)]
#[command(name = "histfetch")]
#[command(version)]
#[command(about = "Download the CSV history log from an ESP32 and archive the previous copy")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Base URL of the device
    #[arg(short, long, env = "HISTFETCH_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Directory holding the current history file
    #[arg(short, long, env = "HISTFETCH_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR, global = true)]
    pub output_dir: PathBuf,

    /// Directory previous copies are moved to
    #[arg(short, long, env = "HISTFETCH_ARCHIVE_DIR", default_value = DEFAULT_ARCHIVE_DIR, global = true)]
    pub archive_dir: PathBuf,

    /// Name of the history file
    #[arg(long, env = "HISTFETCH_FILENAME", default_value = DEFAULT_FILENAME, global = true)]
    pub filename: String,

    /// Overwrite the current file instead of archiving it first
    #[arg(long, env = "HISTFETCH_NO_ARCHIVE", value_parser = clap::builder::FalseyValueParser::new(), global = true)]
    pub no_archive: bool,

    /// HTTP timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", env = "HISTFETCH_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    /// Output format: text, json
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch now (same as running without a subcommand)
    Run,

    /// Fetch repeatedly on a fixed interval
    Watch {
        /// Seconds between fetches
        #[arg(short, long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },

    /// Fetch as a pre-action of a build target, then run the build
    Hook {
        /// Build target the fetch is attached to
        #[arg(short, long, default_value = DEFAULT_HOOK_TARGET)]
        target: String,

        /// Build command to wrap, after `--`
        #[arg(last = true, value_name = "BUILD_COMMAND")]
        command: Vec<String>,
    },
}

impl Cli {
    pub fn config(&self) -> Result<Config> {
        Config::new(
            self.endpoint.clone(),
            self.output_dir.clone(),
            self.filename.clone(),
            self.archive_dir.clone(),
            !self.no_archive,
            Duration::from_secs(self.timeout_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_means_run_now() {
        let cli = Cli::try_parse_from(["histfetch"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_flags_build_config() {
        let cli = Cli::try_parse_from([
            "histfetch",
            "--endpoint",
            "http://10.0.0.7",
            "--output-dir",
            "out",
            "--no-archive",
            "--timeout",
            "15",
        ])
        .unwrap();
        let config = cli.config().unwrap();

        assert_eq!(config.history_url(), "http://10.0.0.7/api/history");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.enable_archiving);
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_hook_takes_trailing_command() {
        let cli = Cli::try_parse_from(["histfetch", "hook", "--", "pio", "run", "-t", "uploadfs"])
            .unwrap();
        match cli.command {
            Some(Commands::Hook { target, command }) => {
                assert_eq!(target, "uploadfs");
                assert_eq!(command, vec!["pio", "run", "-t", "uploadfs"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_watch_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["histfetch", "watch", "--interval", "0"]).is_err());
    }
}
