use crate::greeter;
use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use ripple_robot::{Batch, BatchOutcome, FailurePolicy, Robot, RobotConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Batch file (snapshot plus events) as JSON
    pub input: PathBuf,

    /// Pretty-print the operations
    #[arg(short, long)]
    pub pretty: bool,

    /// Keep dispatching after a handler fails, overriding the config
    #[arg(long)]
    pub keep_going: bool,
}

pub fn replay(args: ReplayArgs, cwd: &Path) -> Result<()> {
    let config = RobotConfig::load(cwd)?;
    let policy = if args.keep_going {
        FailurePolicy::Continue
    } else {
        config.on_handler_error
    };

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let outcome = run(&source, &config, policy)?;

    for failure in &outcome.failures {
        eprintln!(
            "{} event #{} ({}): {}",
            "✗".red(),
            failure.index,
            failure.kind,
            failure.error
        );
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&outcome.operations)?
    } else {
        serde_json::to_string(&outcome.operations)?
    };
    println!("{}", output);

    Ok(())
}

/// Decode a batch and run the greeter over it
pub fn run(source: &str, config: &RobotConfig, policy: FailurePolicy) -> Result<BatchOutcome> {
    let batch: Batch = serde_json::from_str(source).context("Invalid batch")?;
    let robot = Robot::from_config(config, greeter::capabilities(&config.robot.id))?;
    Ok(robot.process_batch(batch, policy))
}
