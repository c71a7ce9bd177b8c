use anyhow::Result;
use clap::Args;
use colored::Colorize;
use ripple_robot::{RobotConfig, RobotProfile, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Robot participant id
    #[arg(long, default_value = "ripple@appspot.com")]
    pub id: String,

    /// Robot display name
    #[arg(long, default_value = "Ripple")]
    pub name: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), DEFAULT_CONFIG_NAME.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = RobotConfig {
        robot: RobotProfile::new(args.id, args.name),
        ..RobotConfig::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Handlers are registered by convention until you add a \"handlers\" table.");
    println!("Next: ripple replay <batch.json>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_robot::FailurePolicy;

    fn args(force: bool) -> InitArgs {
        InitArgs {
            id: "greeter@appspot.com".to_string(),
            name: "Greeter".to_string(),
            force,
        }
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        init(args(false), dir.path()).unwrap();

        let config = RobotConfig::load(dir.path()).unwrap();
        assert_eq!(config.robot.id, "greeter@appspot.com");
        assert!(config.handlers.is_empty());
        assert_eq!(config.on_handler_error, FailurePolicy::Abort);
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&path, "{}").unwrap();

        init(args(false), dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");

        init(args(true), dir.path()).unwrap();
        assert_eq!(RobotConfig::load(dir.path()).unwrap().robot.name, "Greeter");
    }
}
