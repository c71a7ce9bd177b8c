//! # Operation Queue
//!
//! Append-only log of the operations produced while handling one batch.
//! The server replays the queue in order, so nothing here ever reorders,
//! merges or drops an entry.

use crate::operation::Operation;
use tracing::debug;

#[derive(Debug, Default)]
pub struct OperationQueue {
    operations: Vec<Operation>,
}

impl OperationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation to the end of the queue
    pub fn push(&mut self, operation: Operation) {
        debug!(
            kind = %operation.kind,
            blip_id = ?operation.blip_id.as_ref().map(|id| id.to_string()),
            index = ?operation.index,
            position = self.operations.len(),
            "Queued operation"
        );
        self.operations.push(operation);
    }

    /// Take every queued operation, in order, leaving the queue empty
    pub fn drain(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.operations)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }
}
