use crate::identity::BlipId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Half-open character range `[start, end)` as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<RangeInclusive<usize>> for TextRange {
    fn from(range: RangeInclusive<usize>) -> Self {
        Self {
            start: *range.start(),
            end: range.end() + 1,
        }
    }
}

/// Named markup over a range of blip content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,

    #[serde(default)]
    pub value: String,

    pub range: TextRange,
}

/// A document unit: text content plus child blips forming a tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blip {
    #[serde(rename = "blipId")]
    pub id: BlipId,
    pub wave_id: String,
    pub wavelet_id: String,

    /// `None` for the root blip of a wavelet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_blip_id: Option<BlipId>,

    /// Ordered by creation
    #[serde(default)]
    pub child_blip_ids: Vec<BlipId>,

    #[serde(default)]
    pub contributor_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,

    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub last_modified_time: DateTime<Utc>,

    #[serde(default)]
    pub version: u64,

    /// Plain-text cache of the document
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Blip {
    pub fn new(id: BlipId, wave_id: impl Into<String>, wavelet_id: impl Into<String>) -> Self {
        Self {
            id,
            wave_id: wave_id.into(),
            wavelet_id: wavelet_id.into(),
            parent_blip_id: None,
            child_blip_ids: Vec::new(),
            contributor_ids: Vec::new(),
            creator_id: None,
            last_modified_time: Utc::now(),
            version: 0,
            content: String::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: BlipId) -> Self {
        self.parent_blip_id = Some(parent);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_blip_id.is_none()
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }

    /// Content length in characters
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
