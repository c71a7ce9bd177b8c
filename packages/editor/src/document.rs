//! # Document Editing
//!
//! [`DocumentEditor`] is the mutation engine for one blip. Every call does
//! two things: it updates the blip's cached plain-text content, and it
//! queues the wire operations that make the server reach the same content.
//!
//! ## Ordering
//!
//! Composite edits decompose into several operations, and the order is part
//! of the contract:
//!
//! ```text
//! set_text(t)              → DOCUMENT_DELETE, DOCUMENT_APPEND
//! set_text_in_range(r, t)  → DOCUMENT_INSERT at r.min,
//!                            DOCUMENT_DELETE of r shifted by len(t)
//! ```
//!
//! Inserting first keeps the insertion point fixed; the stale slice is then
//! deleted at its shifted position.
//!
//! Indices count characters. Ranges are inclusive on both ends and go on the
//! wire as half-open `{start, end}`.

use crate::format::{markup_to_html, strip_tags, TextFormat};
use crate::text::{char_len, remove, splice};
use crate::EditorError;
use ripple_model::{Blip, BlipId, Context, EntityKind, Operation, OperationKind, Payload, TextRange};
use std::ops::RangeInclusive;
use tracing::debug;

/// Editing handle for one blip in a batch context
#[derive(Debug)]
pub struct DocumentEditor<'ctx> {
    ctx: &'ctx mut Context,
    blip_id: BlipId,
    wave_id: String,
    wavelet_id: String,
}

impl<'ctx> DocumentEditor<'ctx> {
    pub fn open(ctx: &'ctx mut Context, blip_id: &BlipId) -> Result<Self, EditorError> {
        let blip = ctx
            .blip(blip_id)
            .ok_or_else(|| EditorError::BlipNotFound(blip_id.clone()))?;
        let wave_id = blip.wave_id.clone();
        let wavelet_id = blip.wavelet_id.clone();

        Ok(Self {
            ctx,
            blip_id: blip_id.clone(),
            wave_id,
            wavelet_id,
        })
    }

    pub fn blip_id(&self) -> &BlipId {
        &self.blip_id
    }

    pub fn blip(&self) -> Option<&Blip> {
        self.ctx.blip(&self.blip_id)
    }

    pub fn content(&self) -> &str {
        self.blip().map_or("", |b| b.content.as_str())
    }

    /// Content length in characters
    pub fn len(&self) -> usize {
        char_len(self.content())
    }

    pub fn is_empty(&self) -> bool {
        self.content().is_empty()
    }

    pub fn context(&self) -> &Context {
        self.ctx
    }

    fn content_mut(&mut self) -> Result<&mut String, EditorError> {
        self.ctx
            .blip_mut(&self.blip_id)
            .map(|b| &mut b.content)
            .ok_or_else(|| EditorError::BlipNotFound(self.blip_id.clone()))
    }

    fn operation(&self, kind: OperationKind) -> Operation {
        Operation::new(kind, self.wave_id.as_str(), self.wavelet_id.as_str()).on_blip(self.blip_id.clone())
    }

    fn check_range(&self, range: &RangeInclusive<usize>) -> Result<(), EditorError> {
        let len = self.len();
        if range.start() > range.end() || *range.end() >= len {
            return Err(EditorError::Range(format!(
                "{}..={} outside content of length {}",
                range.start(),
                range.end(),
                len
            )));
        }
        Ok(())
    }

    /// Append text to the end of the content
    pub fn append_text(&mut self, text: &str, format: TextFormat) -> Result<(), EditorError> {
        let (kind, markup, plain) = match format {
            TextFormat::Plain => (OperationKind::DocumentAppend, text.to_string(), text.to_string()),
            TextFormat::Html => (OperationKind::DocumentAppendMarkup, text.to_string(), strip_tags(text)),
            TextFormat::Markup => {
                let html = markup_to_html(text);
                let plain = strip_tags(&html);
                (OperationKind::DocumentAppendMarkup, html, plain)
            }
        };

        self.content_mut()?.push_str(&plain);
        let op = self.operation(kind).with(Payload::Text(markup));
        self.ctx.add_operation(op);
        Ok(())
    }

    /// Append text whose format is named at runtime
    pub fn append_text_as(&mut self, text: &str, format: &str) -> Result<(), EditorError> {
        self.append_text(text, format.parse()?)
    }

    /// Insert text before the character at `index`
    pub fn insert_text(&mut self, index: usize, text: &str) -> Result<(), EditorError> {
        splice(self.content_mut()?, index, text)?;
        let op = self
            .operation(OperationKind::DocumentInsert)
            .at(index)
            .with(Payload::Text(text.to_string()));
        self.ctx.add_operation(op);
        Ok(())
    }

    /// Delete all content
    pub fn clear(&mut self) -> Result<(), EditorError> {
        let len = self.len();
        self.content_mut()?.clear();
        let op = self
            .operation(OperationKind::DocumentDelete)
            .at(0)
            .with(Payload::Range(TextRange::new(0, len)));
        self.ctx.add_operation(op);
        Ok(())
    }

    /// Replace all content with plain text
    pub fn set_text(&mut self, text: &str) -> Result<(), EditorError> {
        self.clear()?;
        self.append_text(text, TextFormat::Plain)
    }

    /// Delete the characters in `range` (inclusive).
    ///
    /// Both ends must index existing characters: `start <= end < len`. An
    /// inclusive range always covers at least one character, so there is no
    /// empty deletion.
    pub fn delete_range(&mut self, range: RangeInclusive<usize>) -> Result<(), EditorError> {
        self.check_range(&range)?;
        let wire = TextRange::from(range);

        remove(self.content_mut()?, wire)?;
        let op = self
            .operation(OperationKind::DocumentDelete)
            .at(wire.start)
            .with(Payload::Range(wire));
        self.ctx.add_operation(op);
        Ok(())
    }

    /// Replace the characters in `range` (inclusive) with `text`. Same bound
    /// as [`Self::delete_range`].
    pub fn set_text_in_range(&mut self, range: RangeInclusive<usize>, text: &str) -> Result<(), EditorError> {
        self.check_range(&range)?;
        let shift = char_len(text);
        let (start, end) = range.into_inner();

        self.insert_text(start, text)?;
        self.delete_range((start + shift)..=(end + shift))
    }

    /// Create an empty child blip under this one
    pub fn create_child_blip(&mut self) -> Result<BlipId, EditorError> {
        let id = BlipId::Pending(self.ctx.allocate_id(EntityKind::Blip));
        let child = Blip::new(id.clone(), self.wave_id.as_str(), self.wavelet_id.as_str());

        self.ctx
            .add_child_blip(&self.blip_id, child)
            .ok_or_else(|| EditorError::BlipNotFound(self.blip_id.clone()))?;
        let created = self
            .ctx
            .blip(&id)
            .cloned()
            .ok_or_else(|| EditorError::BlipNotFound(id.clone()))?;

        debug!(parent = %self.blip_id, child = %id, "Created child blip");

        let op = self
            .operation(OperationKind::BlipCreateChild)
            .with(Payload::Blip(Box::new(created)));
        self.ctx.add_operation(op);
        Ok(id)
    }

    /// Delete this blip. Callers must refuse to delete a root blip themselves.
    pub fn delete(self) -> Result<Blip, EditorError> {
        let removed = self
            .ctx
            .remove_blip(&self.blip_id)
            .ok_or_else(|| EditorError::BlipNotFound(self.blip_id.clone()))?;

        let op = self.operation(OperationKind::BlipDelete);
        self.ctx.add_operation(op);
        Ok(removed)
    }

    pub fn annotate_document(&mut self, _name: &str, _value: &str) -> Result<(), EditorError> {
        Err(EditorError::NotImplemented("annotate_document"))
    }

    pub fn delete_annotation_by_name(&mut self, _name: &str) -> Result<(), EditorError> {
        Err(EditorError::NotImplemented("delete_annotation_by_name"))
    }

    pub fn delete_annotation_in_range(
        &mut self,
        _range: RangeInclusive<usize>,
        _name: &str,
    ) -> Result<(), EditorError> {
        Err(EditorError::NotImplemented("delete_annotation_in_range"))
    }

    pub fn append_inline_blip(&mut self) -> Result<BlipId, EditorError> {
        Err(EditorError::NotImplemented("append_inline_blip"))
    }

    pub fn delete_inline_blip(&mut self, _blip_id: &BlipId) -> Result<(), EditorError> {
        Err(EditorError::NotImplemented("delete_inline_blip"))
    }

    pub fn insert_inline_blip(&mut self, _position: usize) -> Result<BlipId, EditorError> {
        Err(EditorError::NotImplemented("insert_inline_blip"))
    }
}
