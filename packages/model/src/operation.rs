//! # Wire Operations
//!
//! An [`Operation`] is one atomic mutation the server replays against its
//! copy of the wave. Composite edits decompose into several operations and
//! the order they are queued in is part of their meaning.

use crate::blip::{Blip, TextRange};
use crate::identity::BlipId;
use crate::user::User;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of operation kinds understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    WaveletAppendBlip,
    WaveletAddParticipant,
    WaveletCreate,
    WaveletRemoveSelf,
    WaveletDatadocSet,
    WaveletSetTitle,
    BlipCreateChild,
    BlipDelete,
    DocumentAnnotationDelete,
    DocumentAnnotationSet,
    DocumentAnnotationSetNorange,
    DocumentAppend,
    DocumentAppendMarkup,
    DocumentAppendStyledText,
    DocumentInsert,
    DocumentDelete,
    DocumentReplace,
    DocumentElementAppend,
    DocumentElementDelete,
    DocumentElementInsert,
    DocumentElementInsertAfter,
    DocumentElementInsertBefore,
    DocumentElementReplace,
    DocumentInlineBlipAppend,
    DocumentInlineBlipDelete,
    DocumentInlineBlipInsert,
    DocumentInlineBlipInsertAfterElement,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        use OperationKind::*;
        match self {
            WaveletAppendBlip => "WAVELET_APPEND_BLIP",
            WaveletAddParticipant => "WAVELET_ADD_PARTICIPANT",
            WaveletCreate => "WAVELET_CREATE",
            WaveletRemoveSelf => "WAVELET_REMOVE_SELF",
            WaveletDatadocSet => "WAVELET_DATADOC_SET",
            WaveletSetTitle => "WAVELET_SET_TITLE",
            BlipCreateChild => "BLIP_CREATE_CHILD",
            BlipDelete => "BLIP_DELETE",
            DocumentAnnotationDelete => "DOCUMENT_ANNOTATION_DELETE",
            DocumentAnnotationSet => "DOCUMENT_ANNOTATION_SET",
            DocumentAnnotationSetNorange => "DOCUMENT_ANNOTATION_SET_NORANGE",
            DocumentAppend => "DOCUMENT_APPEND",
            DocumentAppendMarkup => "DOCUMENT_APPEND_MARKUP",
            DocumentAppendStyledText => "DOCUMENT_APPEND_STYLED_TEXT",
            DocumentInsert => "DOCUMENT_INSERT",
            DocumentDelete => "DOCUMENT_DELETE",
            DocumentReplace => "DOCUMENT_REPLACE",
            DocumentElementAppend => "DOCUMENT_ELEMENT_APPEND",
            DocumentElementDelete => "DOCUMENT_ELEMENT_DELETE",
            DocumentElementInsert => "DOCUMENT_ELEMENT_INSERT",
            DocumentElementInsertAfter => "DOCUMENT_ELEMENT_INSERT_AFTER",
            DocumentElementInsertBefore => "DOCUMENT_ELEMENT_INSERT_BEFORE",
            DocumentElementReplace => "DOCUMENT_ELEMENT_REPLACE",
            DocumentInlineBlipAppend => "DOCUMENT_INLINE_BLIP_APPEND",
            DocumentInlineBlipDelete => "DOCUMENT_INLINE_BLIP_DELETE",
            DocumentInlineBlipInsert => "DOCUMENT_INLINE_BLIP_INSERT",
            DocumentInlineBlipInsertAfterElement => "DOCUMENT_INLINE_BLIP_INSERT_AFTER_ELEMENT",
        }
    }

    /// Operations that edit a blip's content
    pub fn is_document(&self) -> bool {
        self.as_str().starts_with("DOCUMENT_")
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific argument of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Range(TextRange),
    Blip(Box<Blip>),
    Participant(User),
    Text(String),
    None,
}

/// One wire-level mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub wave_id: String,
    pub wavelet_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blip_id: Option<BlipId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(default = "no_payload")]
    pub property: Payload,
}

fn no_payload() -> Payload {
    Payload::None
}

impl Operation {
    pub fn new(kind: OperationKind, wave_id: impl Into<String>, wavelet_id: impl Into<String>) -> Self {
        Self {
            kind,
            wave_id: wave_id.into(),
            wavelet_id: wavelet_id.into(),
            blip_id: None,
            index: None,
            property: Payload::None,
        }
    }

    pub fn on_blip(mut self, blip_id: BlipId) -> Self {
        self.blip_id = Some(blip_id);
        self
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with(mut self, property: Payload) -> Self {
        self.property = property;
        self
    }

    pub fn text(&self) -> Option<&str> {
        match &self.property {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn range(&self) -> Option<TextRange> {
        match &self.property {
            Payload::Range(range) => Some(*range),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_serialization() {
        let op = Operation::new(OperationKind::DocumentInsert, "wave", "wavelet")
            .on_blip(BlipId::confirmed("b+1"))
            .at(5)
            .with(Payload::Text(" google".to_string()));

        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "DOCUMENT_INSERT");
        assert_eq!(json["waveletId"], "wavelet");
        assert_eq!(json["blipId"], "b+1");
        assert_eq!(json["index"], 5);
        assert_eq!(json["property"], " google");

        let back: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn test_range_payload_decodes_as_range() {
        let json = r#"{
            "type": "DOCUMENT_DELETE",
            "waveId": "wave",
            "waveletId": "wavelet",
            "blipId": "b+1",
            "index": 5,
            "property": {"start": 5, "end": 12}
        }"#;
        let op: Operation = serde_json::from_str(json).unwrap();

        assert_eq!(op.range(), Some(TextRange::new(5, 12)));
        assert!(op.kind.is_document());
    }

    #[test]
    fn test_kind_names_match_serde() {
        let kind = OperationKind::DocumentInlineBlipInsertAfterElement;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.as_str()));
    }
}
