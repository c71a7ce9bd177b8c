use crate::identity::BlipId;
use crate::user::NOBODY_ID;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix carried by the conversation root wavelet of every wave
pub const ROOT_WAVELET_SUFFIX: &str = "conv+root";

fn nobody() -> String {
    NOBODY_ID.to_string()
}

/// A thread of blips with its own participants and root blip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wavelet {
    pub id: String,
    pub wave_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_blip_id: Option<BlipId>,

    /// Insertion order is significant
    #[serde(default)]
    pub participant_ids: Vec<String>,

    #[serde(default = "nobody")]
    pub creator_id: String,

    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub creation_time: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub last_modified_time: DateTime<Utc>,

    #[serde(default)]
    pub title: String,

    /// Server-side monotonic counter
    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    pub data_documents: BTreeMap<String, String>,
}

impl Wavelet {
    pub fn new(id: impl Into<String>, wave_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            wave_id: wave_id.into(),
            root_blip_id: None,
            participant_ids: Vec::new(),
            creator_id: nobody(),
            creation_time: now,
            last_modified_time: now,
            title: String::new(),
            version: 0,
            data_documents: BTreeMap::new(),
        }
    }

    pub fn with_root_blip(mut self, blip_id: BlipId) -> Self {
        self.root_blip_id = Some(blip_id);
        self
    }

    pub fn with_participants<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participant_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_ids.iter().any(|id| id == user_id)
    }

    pub fn is_root_wavelet(&self) -> bool {
        self.id.ends_with(ROOT_WAVELET_SUFFIX)
    }
}
