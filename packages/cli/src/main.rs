mod commands;
mod greeter;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{events, init, replay, EventsArgs, InitArgs, ReplayArgs};

/// Ripple CLI - run wave robots against recorded batches
#[derive(Parser, Debug)]
#[command(name = "ripple")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default robot config
    Init(InitArgs),

    /// Run the greeter robot over a batch file and print the operations
    Replay(ReplayArgs),

    /// List event kinds and their conventional handler names
    Events(EventsArgs),
}

fn main() {
    // Logs go to stderr so replay output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Replay(args) => replay(args, &cwd),
            Command::Events(args) => events(args),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
