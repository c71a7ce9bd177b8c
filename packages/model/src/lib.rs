//! # Ripple Model
//!
//! Per-batch object model for a wave robot.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ transport: decoded batch → Snapshot         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: Context                              │
//! │  - id-indexed users/waves/wavelets/blips    │
//! │  - placeholder ids for local creations      │
//! │  - ordered operation queue                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ transport: drained operations → server      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Entities never hold references to each other. A blip names its parent,
//! its children and its wavelet by id, and the [`Context`] resolves them.

mod blip;
mod context;
mod identity;
mod operation;
mod queue;
mod user;
mod wave;
mod wavelet;

pub use blip::{Annotation, Blip, TextRange};
pub use context::{Context, Snapshot};
pub use identity::{BlipId, EntityKind, IdAllocator, PendingId, PENDING_MARKER};
pub use operation::{Operation, OperationKind, Payload};
pub use queue::OperationQueue;
pub use user::{User, NOBODY_ID};
pub use wave::Wave;
pub use wavelet::{Wavelet, ROOT_WAVELET_SUFFIX};
