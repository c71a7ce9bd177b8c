//! # Batch processing
//!
//! One inbound batch is a snapshot plus an ordered list of events. The robot
//! builds a fresh context from the snapshot, dispatches each event in turn,
//! and drains the queue at the end. The drained operations are the response.

use crate::event::{Event, EventKind};
use crate::robot::Robot;
use ripple_model::{Context, Operation, Snapshot};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

/// What happens to the rest of a batch after an event's handler fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop dispatching; later events are skipped
    #[default]
    Abort,
    /// Record the failure and move on to the next event
    Continue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[serde(flatten)]
    pub snapshot: Snapshot,

    /// Events of a kind this robot does not know are dropped while decoding
    #[serde(default, deserialize_with = "known_events")]
    pub events: Vec<Event>,
}

fn known_events<'de, D>(deserializer: D) -> Result<Vec<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    let mut events = Vec::with_capacity(raw.len());

    for value in raw {
        let kind = value.get("type").and_then(serde_json::Value::as_str).unwrap_or_default();
        if kind.parse::<EventKind>().is_err() {
            debug!(kind, "Skipping event of unknown kind");
            continue;
        }
        events.push(serde_json::from_value(value).map_err(D::Error::custom)?);
    }
    Ok(events)
}

/// An event whose handlers did not finish
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFailure {
    /// Position among the batch's decoded events
    pub index: usize,
    pub kind: EventKind,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub operations: Vec<Operation>,
    pub failures: Vec<EventFailure>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Robot {
    /// Dispatch every event in the batch and collect the queued operations.
    ///
    /// Operations accepted before a failure are always returned.
    pub fn process_batch(&self, batch: Batch, policy: FailurePolicy) -> BatchOutcome {
        let Batch { snapshot, events } = batch;
        let mut ctx = Context::from_snapshot(snapshot);
        let mut failures = Vec::new();

        for (index, event) in events.iter().enumerate() {
            if let Err(err) = self.handle_event(event, &mut ctx) {
                failures.push(EventFailure {
                    index,
                    kind: event.kind,
                    error: err.to_string(),
                });

                if policy == FailurePolicy::Abort {
                    warn!(index, skipped = events.len() - index - 1, "Aborting batch");
                    break;
                }
            }
        }

        let operations = ctx.drain_operations();
        info!(
            robot = %self.id(),
            events = events.len(),
            operations = operations.len(),
            failures = failures.len(),
            "Processed batch"
        );

        BatchOutcome { operations, failures }
    }
}
