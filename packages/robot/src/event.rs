//! # Events
//!
//! Notifications delivered by the server with each batch. The set of kinds
//! is closed; anything outside it is rejected when handlers are registered.
//!
//! Some kinds (`WAVELET_SELF_REMOVED`, `WAVELET_BLIP_REMOVED`,
//! `WAVELET_TITLE_CHANGED`) are not delivered by the server in practice.
//! They stay in the enumeration so handlers for them can still be wired up.

use crate::errors::ConfigurationError;
use chrono::{DateTime, Utc};
use ripple_model::{BlipId, NOBODY_ID};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    WaveletBlipCreated,
    WaveletBlipRemoved,
    WaveletParticipantsChanged,
    WaveletSelfAdded,
    WaveletSelfRemoved,
    WaveletTimestampChanged,
    WaveletTitleChanged,
    WaveletVersionChanged,
    BlipContributorsChanged,
    BlipDeleted,
    BlipSubmitted,
    BlipTimestampChanged,
    BlipVersionChanged,
    DocumentChanged,
    FormButtonClicked,
}

impl EventKind {
    pub const ALL: [EventKind; 15] = [
        EventKind::WaveletBlipCreated,
        EventKind::WaveletBlipRemoved,
        EventKind::WaveletParticipantsChanged,
        EventKind::WaveletSelfAdded,
        EventKind::WaveletSelfRemoved,
        EventKind::WaveletTimestampChanged,
        EventKind::WaveletTitleChanged,
        EventKind::WaveletVersionChanged,
        EventKind::BlipContributorsChanged,
        EventKind::BlipDeleted,
        EventKind::BlipSubmitted,
        EventKind::BlipTimestampChanged,
        EventKind::BlipVersionChanged,
        EventKind::DocumentChanged,
        EventKind::FormButtonClicked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::WaveletBlipCreated => "WAVELET_BLIP_CREATED",
            EventKind::WaveletBlipRemoved => "WAVELET_BLIP_REMOVED",
            EventKind::WaveletParticipantsChanged => "WAVELET_PARTICIPANTS_CHANGED",
            EventKind::WaveletSelfAdded => "WAVELET_SELF_ADDED",
            EventKind::WaveletSelfRemoved => "WAVELET_SELF_REMOVED",
            EventKind::WaveletTimestampChanged => "WAVELET_TIMESTAMP_CHANGED",
            EventKind::WaveletTitleChanged => "WAVELET_TITLE_CHANGED",
            EventKind::WaveletVersionChanged => "WAVELET_VERSION_CHANGED",
            EventKind::BlipContributorsChanged => "BLIP_CONTRIBUTORS_CHANGED",
            EventKind::BlipDeleted => "BLIP_DELETED",
            EventKind::BlipSubmitted => "BLIP_SUBMITTED",
            EventKind::BlipTimestampChanged => "BLIP_TIMESTAMP_CHANGED",
            EventKind::BlipVersionChanged => "BLIP_VERSION_CHANGED",
            EventKind::DocumentChanged => "DOCUMENT_CHANGED",
            EventKind::FormButtonClicked => "FORM_BUTTON_CLICKED",
        }
    }

    /// Conventional capability name for this kind, e.g. `blip_submitted`
    pub fn handler_name(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigurationError::InvalidEventKind(s.to_string()))
    }
}

/// Kind-specific event data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blip_id: Option<BlipId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants_added: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants_removed: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,
}

fn nobody() -> String {
    NOBODY_ID.to_string()
}

/// One state-change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// User whose action caused the event
    #[serde(default = "nobody")]
    pub modified_by: String,

    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub wave_id: String,

    #[serde(default)]
    pub wavelet_id: String,

    #[serde(default)]
    pub properties: EventProperties,
}

impl Event {
    pub fn new(kind: EventKind, modified_by: impl Into<String>) -> Self {
        Self {
            kind,
            modified_by: modified_by.into(),
            timestamp: Utc::now(),
            wave_id: String::new(),
            wavelet_id: String::new(),
            properties: EventProperties::default(),
        }
    }

    pub fn in_wavelet(mut self, wave_id: impl Into<String>, wavelet_id: impl Into<String>) -> Self {
        self.wave_id = wave_id.into();
        self.wavelet_id = wavelet_id.into();
        self
    }

    pub fn on_blip(mut self, blip_id: BlipId) -> Self {
        self.properties.blip_id = Some(blip_id);
        self
    }

    pub fn with_participants_added<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.participants_added = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_participants_removed<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.participants_removed = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.properties.title = Some(title.into());
        self
    }

    pub fn blip_id(&self) -> Option<&BlipId> {
        self.properties.blip_id.as_ref()
    }
}
