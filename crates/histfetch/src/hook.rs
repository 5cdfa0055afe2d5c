//! Build-tool pre-action adapter
//!
//! `histfetch hook -- pio run -t uploadfs` probes for the build tool, registers
//! the fetch as a pre-action of the `uploadfs` target and then hands over to
//! the build. When the tool is not installed (or no command was given) the
//! fetch runs directly instead.

use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DEFAULT_HOOK_TARGET: &str = "uploadfs";

pub type Action<'a> = Box<dyn FnMut() -> Result<()> + 'a>;

/// A build environment that can run callbacks before one of its targets
pub trait BuildHost<'a> {
    fn name(&self) -> String;

    fn add_pre_action(&mut self, target: &str, action: Action<'a>);

    /// Run the build, returning its exit code
    fn run(&mut self) -> Result<i32>;
}

/// A build tool driven through its command line
pub struct CommandHost<'a> {
    program: PathBuf,
    args: Vec<String>,
    pre_actions: Vec<(String, Action<'a>)>,
}

impl<'a> CommandHost<'a> {
    /// Returns `None` when the command is empty or its program can't be found
    pub fn probe(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        let program = resolve_program(program)?;
        Some(Self {
            program,
            args: args.to_vec(),
            pre_actions: Vec::new(),
        })
    }

    /// Targets named on the command line (`-t X`, `--target X`, `--target=X`)
    pub fn requested_targets(&self) -> Vec<&str> {
        requested_targets(&self.args)
    }
}

impl<'a> BuildHost<'a> for CommandHost<'a> {
    fn name(&self) -> String {
        self.program.display().to_string()
    }

    fn add_pre_action(&mut self, target: &str, action: Action<'a>) {
        self.pre_actions.push((target.to_string(), action));
    }

    fn run(&mut self) -> Result<i32> {
        let requested: Vec<String> = self
            .requested_targets()
            .into_iter()
            .map(str::to_string)
            .collect();

        for (target, action) in self.pre_actions.iter_mut() {
            if requested.iter().any(|r| r == target) {
                tracing::info!("Running pre-action for target '{}'", target);
                action()?;
            } else {
                tracing::debug!("Target '{}' not requested, skipping pre-action", target);
            }
        }

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| Error::Hook(format!("Failed to run {}: {}", self.program.display(), e)))?;

        // Killed by a signal: no code to forward
        Ok(status.code().unwrap_or(1))
    }
}

/// Wire `fetch` in front of the build command's `target`, or run it directly
/// when there is no build tool to hook into. Returns the exit code to use.
pub fn dispatch<'a, F>(command: &[String], target: &str, mut fetch: F) -> Result<i32>
where
    F: FnMut() -> Result<()> + 'a,
{
    match CommandHost::probe(command) {
        Some(mut host) => {
            tracing::info!("Registered pre-action for '{}' on {}", target, host.name());
            host.add_pre_action(target, Box::new(fetch));
            host.run()
        }
        None => {
            if let Some(program) = command.first() {
                tracing::warn!("Build tool '{}' not found, running directly", program);
            }
            fetch()?;
            Ok(0)
        }
    }
}

fn requested_targets(args: &[String]) -> Vec<&str> {
    let mut targets = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "-t" || arg == "--target" {
            if let Some(value) = iter.next() {
                targets.push(value.as_str());
            }
        } else if let Some(value) = arg.strip_prefix("--target=") {
            targets.push(value);
        }
    }

    targets
}

fn resolve_program(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }

    let search = env::var_os("PATH")?;
    env::split_paths(&search).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}
