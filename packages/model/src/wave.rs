use serde::{Deserialize, Serialize};

/// Top-level container of wavelets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wave {
    pub id: String,

    #[serde(default)]
    pub wavelet_ids: Vec<String>,
}

impl Wave {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            wavelet_ids: Vec::new(),
        }
    }

    /// Record a wavelet id, keeping the set free of duplicates
    pub fn add_wavelet_id(&mut self, wavelet_id: &str) {
        if !self.wavelet_ids.iter().any(|id| id == wavelet_id) {
            self.wavelet_ids.push(wavelet_id.to_string());
        }
    }
}
