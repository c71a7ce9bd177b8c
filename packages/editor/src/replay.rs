//! # Replay
//!
//! Re-executes queued document operations against plain text the way the
//! server applies them. Replaying a blip's operations over its content at the
//! start of the batch must give back the content the editor cached.

use crate::format::strip_tags;
use crate::text::{remove, splice};
use crate::EditorError;
use ripple_model::{BlipId, Operation, OperationKind};

/// Apply one document operation to `content`
pub fn apply_to_content(content: &mut String, op: &Operation) -> Result<(), EditorError> {
    match op.kind {
        OperationKind::DocumentAppend => {
            let text = op
                .text()
                .ok_or(EditorError::MalformedOperation(op.kind, "missing text"))?;
            content.push_str(text);
            Ok(())
        }
        OperationKind::DocumentAppendMarkup => {
            let markup = op
                .text()
                .ok_or(EditorError::MalformedOperation(op.kind, "missing markup"))?;
            content.push_str(&strip_tags(markup));
            Ok(())
        }
        OperationKind::DocumentInsert => {
            let index = op
                .index
                .ok_or(EditorError::MalformedOperation(op.kind, "missing index"))?;
            let text = op
                .text()
                .ok_or(EditorError::MalformedOperation(op.kind, "missing text"))?;
            splice(content, index, text)
        }
        OperationKind::DocumentDelete => {
            let range = op
                .range()
                .ok_or(EditorError::MalformedOperation(op.kind, "missing range"))?;
            remove(content, range)
        }
        kind if kind.is_document() => Err(EditorError::NotImplemented(kind.as_str())),
        _ => Ok(()),
    }
}

/// Replay every document operation addressed to `blip_id` over `initial`
pub fn replay(initial: &str, operations: &[Operation], blip_id: &BlipId) -> Result<String, EditorError> {
    let mut content = initial.to_string();
    for op in operations
        .iter()
        .filter(|op| op.kind.is_document() && op.blip_id.as_ref() == Some(blip_id))
    {
        apply_to_content(&mut content, op)?;
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_model::{Payload, TextRange};

    fn op(kind: OperationKind) -> Operation {
        Operation::new(kind, "w+wave", "w+wavelet").on_blip(BlipId::confirmed("b+1"))
    }

    #[test]
    fn test_replay_skips_other_blips_and_kinds() {
        let ops = vec![
            op(OperationKind::DocumentAppend).with(Payload::Text(" there".into())),
            Operation::new(OperationKind::DocumentAppend, "w+wave", "w+wavelet")
                .on_blip(BlipId::confirmed("b+2"))
                .with(Payload::Text("elsewhere".into())),
            op(OperationKind::BlipCreateChild),
        ];

        let result = replay("hi", &ops, &BlipId::confirmed("b+1")).unwrap();
        assert_eq!(result, "hi there");
    }

    #[test]
    fn test_malformed_operations() {
        let mut content = String::from("abc");

        let missing_index = op(OperationKind::DocumentInsert).with(Payload::Text("x".into()));
        assert!(matches!(
            apply_to_content(&mut content, &missing_index),
            Err(EditorError::MalformedOperation(OperationKind::DocumentInsert, _))
        ));

        let past_end = op(OperationKind::DocumentDelete).with(Payload::Range(TextRange::new(1, 9)));
        assert!(matches!(
            apply_to_content(&mut content, &past_end),
            Err(EditorError::Range(_))
        ));
        assert_eq!(content, "abc");
    }

    #[test]
    fn test_unsupported_document_kind() {
        let mut content = String::new();
        let result = apply_to_content(&mut content, &op(OperationKind::DocumentElementAppend));
        assert_eq!(result, Err(EditorError::NotImplemented("DOCUMENT_ELEMENT_APPEND")));
    }
}
