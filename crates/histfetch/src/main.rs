//! histfetch CLI - fetch the ESP32 history log now, on a schedule, or from a build hook

use clap::Parser;
use histfetch::cli::{Cli, Commands, OutputFormat, OutputWriter};
use histfetch::{hook, HistoryFetcher, HistorySource};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = cli.config()?;
    let fetcher = HistoryFetcher::new(config);

    match cli.command {
        None | Some(Commands::Run) => {
            run_once(&fetcher, cli.format)?;
        }
        Some(Commands::Watch { interval }) => {
            watch(&fetcher, cli.format, Duration::from_secs(interval));
        }
        Some(Commands::Hook { target, command }) => {
            let code = hook::dispatch(&command, &target, || run_once(&fetcher, cli.format))?;
            if code != 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "histfetch=debug"
    } else {
        "histfetch=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_once<S: HistorySource>(
    fetcher: &HistoryFetcher<S>,
    format: OutputFormat,
) -> histfetch::Result<()> {
    let report = fetcher.fetch_and_store()?;
    let mut out = OutputWriter::new(std::io::stdout().lock(), format);
    out.write_report(&report)
}

fn watch<S: HistorySource>(fetcher: &HistoryFetcher<S>, format: OutputFormat, interval: Duration) {
    tracing::info!(
        "Fetching from {} every {}s",
        fetcher.config().history_url(),
        interval.as_secs()
    );

    loop {
        if let Err(e) = run_once(fetcher, format) {
            tracing::error!("Fetch failed: {}", e);
        }
        thread::sleep(interval);
    }
}
