//! # Robot
//!
//! Event dispatcher. Each event kind maps to an ordered list of capability
//! names; handling an event runs those capabilities one after another against
//! the batch context.
//!
//! ## Dispatch rules
//!
//! - Kinds with no registered handlers are ignored.
//! - Handlers run synchronously, in first-registration order.
//! - The first failing handler stops the rest for that event and its error
//!   is returned unchanged. Operations queued before the failure stay queued.

use crate::capability::{Capabilities, Handler};
use crate::errors::{ConfigurationError, RobotError};
use crate::event::{Event, EventKind};
use ripple_model::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Identity the robot presents to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotProfile {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl RobotProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: None,
            profile_url: None,
        }
    }
}

impl Default for RobotProfile {
    fn default() -> Self {
        Self::new("ripple@appspot.com", "Ripple")
    }
}

/// Scheduled callback descriptor. Execution belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronJob {
    pub path: String,
    pub seconds: u64,
}

impl CronJob {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

pub struct Robot {
    profile: RobotProfile,
    capabilities: Capabilities,
    handlers: HashMap<EventKind, Vec<String>>,
    cron_jobs: Vec<CronJob>,
}

impl Robot {
    pub fn new(profile: RobotProfile, capabilities: Capabilities) -> Self {
        Self {
            profile,
            capabilities,
            handlers: HashMap::new(),
            cron_jobs: Vec::new(),
        }
    }

    pub fn builder(profile: RobotProfile) -> RobotBuilder {
        RobotBuilder {
            profile,
            capabilities: Capabilities::new(),
        }
    }

    pub fn profile(&self) -> &RobotProfile {
        &self.profile
    }

    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Register a capability for an event kind named at runtime
    pub fn register_handler(&mut self, event_kind: &str, handler: &str) -> Result<(), ConfigurationError> {
        let kind: EventKind = event_kind.parse()?;
        self.register(kind, handler)
    }

    /// Register a capability for an event kind. Registering the same pair
    /// twice is a no-op.
    pub fn register(&mut self, kind: EventKind, handler: &str) -> Result<(), ConfigurationError> {
        if !self.capabilities.contains(handler) {
            return Err(ConfigurationError::InvalidHandler(handler.to_string()));
        }

        let registered = self.handlers.entry(kind).or_default();
        if !registered.iter().any(|name| name == handler) {
            registered.push(handler.to_string());
            debug!(event = %kind, handler, "Registered handler");
        }
        Ok(())
    }

    /// Register every capability named after an event kind (`blip_submitted`
    /// for `BLIP_SUBMITTED`). Returns how many kinds were wired up.
    pub fn register_conventional_handlers(&mut self) -> usize {
        let mut count = 0;
        for kind in EventKind::ALL {
            let name = kind.handler_name();
            if self.capabilities.contains(&name) && self.register(kind, &name).is_ok() {
                count += 1;
            }
        }
        count
    }

    /// Capability names registered for `kind`, in dispatch order
    pub fn handlers_for(&self, kind: EventKind) -> &[String] {
        self.handlers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn handled_kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.handlers
            .iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(kind, _)| *kind)
    }

    /// Run every handler registered for the event's kind
    pub fn handle_event(&self, event: &Event, ctx: &mut Context) -> Result<(), RobotError> {
        let names = self.handlers_for(event.kind);
        if names.is_empty() {
            debug!(event = %event.kind, "No handlers registered, ignoring event");
            return Ok(());
        }

        for name in names {
            let handler: &Handler = match self.capabilities.get(name) {
                Some(handler) => handler,
                None => continue,
            };

            debug!(event = %event.kind, handler = %name, modified_by = %event.modified_by, "Dispatching");
            if let Err(err) = handler(event, ctx) {
                warn!(event = %event.kind, handler = %name, error = %err, "Handler failed");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Record a scheduled callback. Nothing here runs it.
    ///
    /// Intervals are whole seconds; anything shorter than a second or with a
    /// fractional part is rejected rather than rounded.
    pub fn register_cron_job(&mut self, path: impl Into<String>, interval: Duration) -> Result<(), ConfigurationError> {
        let path = path.into();
        if interval.as_secs() == 0 || interval.subsec_nanos() != 0 {
            return Err(ConfigurationError::InvalidCronInterval { path, interval });
        }

        self.cron_jobs.push(CronJob {
            path,
            seconds: interval.as_secs(),
        });
        Ok(())
    }

    pub fn cron_jobs(&self) -> &[CronJob] {
        &self.cron_jobs
    }
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("profile", &self.profile)
            .field("capabilities", &self.capabilities)
            .field("handlers", &self.handlers)
            .field("cron_jobs", &self.cron_jobs)
            .finish()
    }
}

/// Declares a robot's capabilities before any handler is registered
pub struct RobotBuilder {
    profile: RobotProfile,
    capabilities: Capabilities,
}

impl RobotBuilder {
    pub fn capability<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Event, &mut Context) -> Result<(), RobotError> + Send + Sync + 'static,
    {
        self.capabilities.insert(name, handler);
        self
    }

    pub fn build(self) -> Robot {
        Robot::new(self.profile, self.capabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot() -> Robot {
        Robot::builder(RobotProfile::default())
            .capability("blip_submitted", |_, _| Ok(()))
            .capability("greet", |_, _| Ok(()))
            .build()
    }

    #[test]
    fn test_register_validates_kind_and_handler() {
        let mut robot = robot();

        assert!(matches!(
            robot.register_handler("NOT_AN_EVENT", "greet"),
            Err(ConfigurationError::InvalidEventKind(_))
        ));
        assert!(matches!(
            robot.register_handler("BLIP_SUBMITTED", "missing"),
            Err(ConfigurationError::InvalidHandler(_))
        ));
        assert!(robot.handlers_for(EventKind::BlipSubmitted).is_empty());
    }

    #[test]
    fn test_duplicate_registration_is_noop() {
        let mut robot = robot();

        robot.register_handler("BLIP_SUBMITTED", "greet").unwrap();
        robot.register_handler("BLIP_SUBMITTED", "blip_submitted").unwrap();
        robot.register_handler("BLIP_SUBMITTED", "greet").unwrap();

        assert_eq!(
            robot.handlers_for(EventKind::BlipSubmitted),
            ["greet".to_string(), "blip_submitted".to_string()]
        );
    }

    #[test]
    fn test_conventional_registration() {
        let mut robot = robot();

        assert_eq!(robot.register_conventional_handlers(), 1);
        assert_eq!(robot.handlers_for(EventKind::BlipSubmitted), ["blip_submitted".to_string()]);
        assert_eq!(robot.handled_kinds().collect::<Vec<_>>(), vec![EventKind::BlipSubmitted]);
    }

    #[test]
    fn test_cron_jobs_are_recorded() {
        let mut robot = robot();
        robot.register_cron_job("/_robot/tick", Duration::from_secs(60)).unwrap();

        assert_eq!(robot.cron_jobs().len(), 1);
        assert_eq!(robot.cron_jobs()[0].path, "/_robot/tick");
        assert_eq!(robot.cron_jobs()[0].interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_cron_jobs_reject_partial_seconds() {
        let mut robot = robot();

        for interval in [Duration::from_millis(500), Duration::from_millis(1500), Duration::ZERO] {
            assert!(matches!(
                robot.register_cron_job("/_robot/tick", interval),
                Err(ConfigurationError::InvalidCronInterval { .. })
            ));
        }
        assert!(robot.cron_jobs().is_empty());
    }
}
