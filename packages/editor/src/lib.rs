//! # Ripple Editor
//!
//! Mutation engine for wave content.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ robot handler: "reply to this blip"         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: DocumentEditor / WaveletEditor      │
//! │  - update cached blip content               │
//! │  - create/delete blips with placeholder ids │
//! │  - queue wire operations in replay order    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: Context + OperationQueue             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ripple_editor::{DocumentEditor, TextFormat};
//!
//! let mut doc = DocumentEditor::open(&mut ctx, &blip_id)?;
//! doc.set_text_in_range(6..=16, "world")?;
//! let reply = doc.create_child_blip()?;
//!
//! DocumentEditor::open(&mut ctx, &reply)?.append_text("Thanks!", TextFormat::Plain)?;
//! let operations = ctx.drain_operations();
//! ```

mod document;
mod errors;
mod format;
mod replay;
mod text;
mod wavelet;

pub use document::DocumentEditor;
pub use errors::EditorError;
pub use format::{markup_to_html, strip_tags, TextFormat};
pub use replay::{apply_to_content, replay};
pub use wavelet::WaveletEditor;
