use crate::greeter;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use ripple_robot::EventKind;

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// Only list kinds the greeter handles
    #[arg(long)]
    pub handled: bool,
}

pub fn events(args: EventsArgs) -> Result<()> {
    let capabilities = greeter::capabilities("");

    for kind in EventKind::ALL {
        let handler = kind.handler_name();
        let handled = capabilities.contains(&handler);
        if args.handled && !handled {
            continue;
        }

        let marker = if handled { "✓".green() } else { "·".dimmed() };
        println!("  {} {:<30} {}", marker, kind.as_str(), handler.bright_white());
    }

    Ok(())
}
