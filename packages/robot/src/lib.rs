//! # Ripple Robot
//!
//! Event dispatch for wave robots.
//!
//! A robot declares a fixed set of named capabilities, maps event kinds to
//! them, and turns each inbound batch into a list of outbound operations.
//!
//! ```text
//! Batch (snapshot + events)
//!          ↓
//! Context::from_snapshot
//!          ↓
//! for each event: handlers in registration order
//!          ↓
//! drain_operations() → BatchOutcome
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ripple_robot::{FailurePolicy, Robot, RobotProfile};
//!
//! let mut robot = Robot::builder(RobotProfile::new("bot@appspot.com", "Bot"))
//!     .capability("blip_submitted", |event, ctx| { /* ... */ Ok(()) })
//!     .build();
//! robot.register_conventional_handlers();
//!
//! let outcome = robot.process_batch(batch, FailurePolicy::Abort);
//! ```

mod batch;
mod capability;
mod config;
mod errors;
mod event;
mod robot;

pub use batch::{Batch, BatchOutcome, EventFailure, FailurePolicy};
pub use capability::{Capabilities, Handler};
pub use config::{RobotConfig, DEFAULT_CONFIG_NAME};
pub use errors::{ConfigurationError, RobotError};
pub use event::{Event, EventKind, EventProperties};
pub use robot::{CronJob, Robot, RobotBuilder, RobotProfile};
