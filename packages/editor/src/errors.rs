//! Error types for the editor

use ripple_model::{BlipId, OperationKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Range error: {0}")]
    Range(String),

    #[error("Invalid format: {0} (expected plain, html or markup)")]
    InvalidFormat(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Blip not found: {0}")]
    BlipNotFound(BlipId),

    #[error("Wavelet not found: {0}")]
    WaveletNotFound(String),

    #[error("Wavelet {0} has no root blip in this batch")]
    NoRootBlip(String),

    #[error("Malformed {0} operation: {1}")]
    MalformedOperation(OperationKind, &'static str),
}
