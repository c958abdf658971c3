//! Selection offset recovery.
//!
//! Rendering the essay as a sequence of inline fragments (to show colors)
//! means the browser's selection range is reported relative to fragments,
//! not the logical string. The caller instead sends the selected substring
//! plus the concatenated text content preceding the selection anchor, and
//! offsets are recomputed against the original source text here.

use super::types::Selection;

/// Recover `(start, end)` character offsets for a user text selection.
///
/// Primary strategy: the character length of `preceding_text` is the
/// candidate start, validated by exact substring comparison against
/// `source_text`. Fallback: first literal occurrence of `selected_text` in
/// the source. When the selection text is repeated in the source and the
/// structural computation fails, the fallback may pick the wrong
/// occurrence; that is a known limitation, not silently corrected.
///
/// Returns `None` for an empty selection or when neither strategy locates
/// an exact match. `None` is a normal outcome that aborts the create flow,
/// not an error.
pub fn map_selection_to_offsets(
    selected_text: &str,
    preceding_text: &str,
    source_text: &str,
) -> Option<Selection> {
    if selected_text.is_empty() {
        return None;
    }

    let source: Vec<char> = source_text.chars().collect();
    let selected: Vec<char> = selected_text.chars().collect();

    let candidate_start = preceding_text.chars().count();
    if let Some(selection) = validate(&source, &selected, candidate_start, selected_text) {
        return Some(selection);
    }

    // Structural computation disagreed with the literal content; fall back
    // to the first occurrence of the selected text.
    find_chars(&source, &selected)
        .and_then(|start| validate(&source, &selected, start, selected_text))
}

/// Check that `source[start..start + selected.len())` equals the selection.
fn validate(
    source: &[char],
    selected: &[char],
    start: usize,
    selected_text: &str,
) -> Option<Selection> {
    let end = start.checked_add(selected.len())?;
    if end > source.len() {
        return None;
    }
    if &source[start..end] == selected {
        Some(Selection {
            text: selected_text.to_string(),
            start,
            end,
        })
    } else {
        None
    }
}

/// First occurrence of `needle` in `haystack`, by character position.
fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
