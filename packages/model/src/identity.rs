//! # Entity Identity
//!
//! Entities created during a batch have no server identity yet. They get a
//! placeholder id from the context's [`IdAllocator`] and keep it until the
//! next batch reports the confirmed id.
//!
//! Placeholders are rendered on the wire as `TBD_<kind>_<serial>`, a form the
//! server never hands out, so [`BlipId::from_wire`] can classify any string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved marker carried by every placeholder id
pub const PENDING_MARKER: &str = "TBD";

/// Kinds of entity that can be created locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Blip,
    Wavelet,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Blip => "blip",
            EntityKind::Wavelet => "wavelet",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "blip" => Some(EntityKind::Blip),
            "wavelet" => Some(EntityKind::Wavelet),
            _ => None,
        }
    }
}

/// Locally allocated identity awaiting server confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PendingId {
    pub kind: EntityKind,
    pub serial: u64,
}

impl PendingId {
    /// Parse the wire form `TBD_<kind>_<serial>`
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix(PENDING_MARKER)?.strip_prefix('_')?;
        let (kind, serial) = rest.split_once('_')?;

        Some(Self {
            kind: EntityKind::from_str(kind)?,
            serial: serial.parse().ok()?,
        })
    }
}

impl fmt::Display for PendingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", PENDING_MARKER, self.kind.as_str(), self.serial)
    }
}

/// Blip identity: either confirmed by the server or a local placeholder
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlipId {
    Confirmed(String),
    Pending(PendingId),
}

impl BlipId {
    pub fn confirmed(id: impl Into<String>) -> Self {
        BlipId::Confirmed(id.into())
    }

    /// Classify a wire id. Total: every string maps to exactly one variant.
    pub fn from_wire(s: &str) -> Self {
        match PendingId::parse(s) {
            Some(pending) => BlipId::Pending(pending),
            None => BlipId::Confirmed(s.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, BlipId::Pending(_))
    }
}

impl fmt::Display for BlipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlipId::Confirmed(id) => f.write_str(id),
            BlipId::Pending(pending) => pending.fmt(f),
        }
    }
}

impl From<String> for BlipId {
    fn from(s: String) -> Self {
        BlipId::from_wire(&s)
    }
}

impl From<&str> for BlipId {
    fn from(s: &str) -> Self {
        BlipId::from_wire(s)
    }
}

impl From<BlipId> for String {
    fn from(id: BlipId) -> Self {
        id.to_string()
    }
}

/// Sequential placeholder generator, one per context
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    count: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next placeholder id
    pub fn allocate(&mut self, kind: EntityKind) -> PendingId {
        self.count += 1;
        PendingId {
            kind,
            serial: self.count,
        }
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u64 {
        self.count
    }
}
