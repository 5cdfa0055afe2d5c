use crate::archive::ArchiveStep;
use crate::error::Result;
use crate::fetcher::{FetchOutcome, FetchReport};
use colored::Colorize;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn write_report(&mut self, report: &FetchReport) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string(report)?;
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::Text => {
                if let Some(line) = archive_line(&report.archive) {
                    writeln!(self.writer, "{}", line)?;
                }
                writeln!(self.writer, "{}", outcome_line(&report.outcome))?;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn archive_line(step: &ArchiveStep) -> Option<String> {
    match step {
        ArchiveStep::Archived { path } => {
            Some(format!("{} archived to {}", "→".cyan(), path.display()))
        }
        ArchiveStep::Failed { error } => Some(format!("{} archive failed: {}", "!".yellow(), error)),
        ArchiveStep::Disabled | ArchiveStep::NothingToArchive => None,
    }
}

fn outcome_line(outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Stored { path, bytes } => {
            format!("{} saved {} ({} bytes)", "✓".green(), path.display(), bytes)
        }
        FetchOutcome::NoData => format!("{} device has no data", "-".yellow()),
        FetchOutcome::RemoteError { status } => {
            format!("{} device returned HTTP {}", "✗".red(), status)
        }
        FetchOutcome::Unavailable { reason } => {
            format!("{} device unavailable: {}", "✗".red(), reason)
        }
    }
}
