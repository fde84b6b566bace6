//! CLI for rtry: run a command under a retry strategy, or preview a schedule.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rtry_core::config::{self, RtryConfig, StrategyKind};
use rtry_core::retry::{Skip, Strategy, NEVER};
use std::time::Duration;

use commands::{run_exec, run_schedule};

/// Top-level CLI for rtry.
#[derive(Debug, Parser)]
#[command(name = "rtry")]
#[command(about = "rtry: retry commands with backoff", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a command, retrying it according to the chosen strategy.
    Exec {
        #[command(flatten)]
        strategy: StrategyArgs,

        /// Give up after this many seconds in total.
        #[arg(long, value_name = "N")]
        deadline_secs: Option<u64>,

        /// Exit code that counts as retryable (repeatable). Without any, every non-zero exit is retried.
        #[arg(long = "retry-on", value_name = "CODE", allow_negative_numbers = true)]
        retry_on: Vec<i32>,

        /// Command and arguments to run.
        #[arg(last = true, required = true, value_name = "CMD")]
        command: Vec<String>,
    },

    /// Print the waits the chosen strategy would issue, without running anything.
    Schedule {
        #[command(flatten)]
        strategy: StrategyArgs,

        /// Number of retries to show.
        #[arg(long, default_value = "10", value_name = "N")]
        count: u64,
    },
}

/// Backoff shape accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Fixed,
    Linear,
    Exponential,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Fixed => StrategyKind::Fixed,
            StrategyArg::Linear => StrategyKind::Linear,
            StrategyArg::Exponential => StrategyKind::Exponential,
        }
    }
}

/// Strategy options shared by `exec` and `schedule`. Unset options fall back
/// to config.toml.
#[derive(Debug, Clone, Default, Args)]
pub struct StrategyArgs {
    /// Backoff shape.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Wait before the first retry, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub wait_ms: Option<u64>,

    /// Growth factor for linear/exponential backoff.
    #[arg(long, value_name = "FACTOR")]
    pub growth: Option<f64>,

    /// Retryable failures tolerated before giving up.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u64>,

    /// Cap on any single wait, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub max_wait_ms: Option<u64>,

    /// Invoke once and never retry.
    #[arg(long, conflicts_with_all = ["skip", "strategy", "wait_ms", "growth", "max_attempts", "max_wait_ms"])]
    pub never: bool,

    /// Do not invoke at all; report success.
    #[arg(long, conflicts_with_all = ["strategy", "wait_ms", "growth", "max_attempts", "max_wait_ms"])]
    pub skip: bool,
}

impl StrategyArgs {
    /// Config with the command-line overrides applied.
    pub fn merged(&self, cfg: &RtryConfig) -> RtryConfig {
        let mut cfg = cfg.clone();
        if let Some(kind) = self.strategy {
            cfg.strategy = kind.into();
        }
        if let Some(ms) = self.wait_ms {
            cfg.initial_wait_ms = ms;
        }
        if let Some(g) = self.growth {
            cfg.growth_factor = g;
        }
        if self.max_attempts.is_some() {
            cfg.max_attempts = self.max_attempts;
        }
        if self.max_wait_ms.is_some() {
            cfg.max_wait_ms = self.max_wait_ms;
        }
        cfg
    }

    pub fn resolve(&self, cfg: &RtryConfig) -> Result<Box<dyn Strategy>> {
        if self.skip {
            return Ok(Box::new(Skip));
        }
        if self.never {
            return Ok(Box::new(NEVER));
        }
        let merged = self.merged(cfg);
        tracing::debug!("effective retry config: {:?}", merged);
        Ok(Box::new(merged.policy()?))
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Exec {
                strategy,
                deadline_secs,
                retry_on,
                command,
            } => {
                let deadline = deadline_secs.map(Duration::from_secs).or_else(|| cfg.deadline());
                run_exec(strategy.resolve(&cfg)?, deadline, &retry_on, &command).await?;
            }
            CliCommand::Schedule { strategy, count } => {
                run_schedule(strategy.resolve(&cfg)?.as_ref(), count);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
