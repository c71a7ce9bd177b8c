use crate::batch::FailurePolicy;
use crate::capability::Capabilities;
use crate::errors::ConfigurationError;
use crate::robot::{CronJob, Robot, RobotProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "ripple.config.json";

/// Robot configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotConfig {
    /// Identity presented to the server
    #[serde(default)]
    pub robot: RobotProfile,

    /// Event kind to capability names. Empty means conventional registration.
    #[serde(default)]
    pub handlers: BTreeMap<String, Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cron_jobs: Vec<CronJob>,

    /// What a batch does when a handler fails
    #[serde(default)]
    pub on_handler_error: FailurePolicy,
}

impl RobotConfig {
    /// Load config from a directory, falling back to defaults when the file
    /// is missing
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::from_path(&config_path)
        } else {
            debug!(path = %config_path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            robot: RobotProfile::default(),
            handlers: BTreeMap::new(),
            cron_jobs: vec![],
            on_handler_error: FailurePolicy::default(),
        }
    }
}

impl Robot {
    /// Build a robot from config. Every handler entry must name a known event
    /// kind and a declared capability.
    pub fn from_config(config: &RobotConfig, capabilities: Capabilities) -> Result<Self, ConfigurationError> {
        let mut robot = Robot::new(config.robot.clone(), capabilities);

        if config.handlers.is_empty() {
            let count = robot.register_conventional_handlers();
            debug!(count, "Registered conventional handlers");
        } else {
            for (kind, names) in &config.handlers {
                for name in names {
                    robot.register_handler(kind, name)?;
                }
            }
        }

        for job in &config.cron_jobs {
            robot.register_cron_job(job.path.clone(), Duration::from_secs(job.seconds))?;
        }

        Ok(robot)
    }
}
