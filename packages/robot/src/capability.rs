//! Named handler callbacks a robot exposes.
//!
//! The set is fixed when the robot is built. Registration can only point an
//! event kind at a name declared here.

use crate::errors::RobotError;
use crate::event::Event;
use ripple_model::Context;
use std::fmt;

/// Event handler callback
pub type Handler = Box<dyn Fn(&Event, &mut Context) -> Result<(), RobotError> + Send + Sync>;

#[derive(Default)]
pub struct Capabilities {
    slots: Vec<(String, Handler)>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a capability, replacing any earlier one with the same name
    pub fn with<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Event, &mut Context) -> Result<(), RobotError> + Send + Sync + 'static,
    {
        self.insert(name, handler);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&Event, &mut Context) -> Result<(), RobotError> + Send + Sync + 'static,
    {
        let name = name.into();
        let handler: Handler = Box::new(handler);
        match self.slots.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = handler,
            None => self.slots.push((name, handler)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.slots
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, handler)| handler)
    }

    /// Declared names, in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeclaring_replaces() {
        let caps = Capabilities::new()
            .with("greet", |_, _| Ok(()))
            .with("wave", |_, _| Ok(()))
            .with("greet", |_, _| Err(RobotError::handler("replaced")));

        assert_eq!(caps.len(), 2);
        assert_eq!(caps.names().collect::<Vec<_>>(), vec!["greet", "wave"]);

        let mut ctx = Context::new();
        let event = Event::new(crate::EventKind::DocumentChanged, "fred@example.com");
        let handler = caps.get("greet").unwrap();
        assert!(handler(&event, &mut ctx).is_err());
    }

    #[test]
    fn test_unknown_capability() {
        let caps = Capabilities::new().with("greet", |_, _| Ok(()));
        assert!(caps.contains("greet"));
        assert!(!caps.contains("farewell"));
    }
}
