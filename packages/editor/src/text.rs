//! Character-indexed string editing. Document indices count characters,
//! never bytes.

use crate::EditorError;
use ripple_model::TextRange;

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(offset, _)| offset)
}

/// Insert `text` before the character at `index`; `index == len` appends
pub(crate) fn splice(content: &mut String, index: usize, text: &str) -> Result<(), EditorError> {
    let len = char_len(content);
    if index > len {
        return Err(EditorError::Range(format!(
            "insert index {} outside 0..={}",
            index, len
        )));
    }
    content.insert_str(byte_offset(content, index), text);
    Ok(())
}

/// Remove the characters in `range`
pub(crate) fn remove(content: &mut String, range: TextRange) -> Result<(), EditorError> {
    let len = char_len(content);
    if range.start > range.end || range.end > len {
        return Err(EditorError::Range(format!(
            "delete range {}..{} outside 0..{}",
            range.start, range.end, len
        )));
    }
    let start = byte_offset(content, range.start);
    let end = byte_offset(content, range.end);
    content.replace_range(start..end, "");
    Ok(())
}
