//! Section reordering — relocates a named section and its navigation entry.

use crate::html::blocks;

/// Result of a reorder attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    Moved,
    /// The moving section is absent — legitimately nothing to reorder.
    NothingToReorder,
    /// The moving section exists but the anchor does not; without a safe
    /// insertion point the edit is skipped rather than dropping content.
    AnchorNotFound,
}

const SECTION_TAG: &str = "div";

/// Moves the section identified by `moving_id` — and the nav entry linking
/// to `#moving_id` — to immediately after the section / nav entry of
/// `anchor_id`. Total section and nav-entry counts are unchanged; only
/// positions move.
pub fn move_section_after(
    html: &str,
    moving_id: &str,
    anchor_id: &str,
) -> (String, ReorderOutcome) {
    let Some(moving) = blocks::element_with_id(html, SECTION_TAG, moving_id) else {
        return (html.to_string(), ReorderOutcome::NothingToReorder);
    };
    if blocks::element_with_id(html, SECTION_TAG, anchor_id).is_none() {
        return (html.to_string(), ReorderOutcome::AnchorNotFound);
    }

    let section = html[moving.clone()].to_string();
    let mut patched = String::with_capacity(html.len());
    patched.push_str(&html[..moving.start]);
    patched.push_str(&html[moving.end..]);

    // Re-locate the anchor: extracting the moving block shifted offsets.
    let Some(anchor) = blocks::element_with_id(&patched, SECTION_TAG, anchor_id) else {
        // The anchor was nested inside the moving section; reinserting would
        // lose content, so keep the original untouched.
        return (html.to_string(), ReorderOutcome::AnchorNotFound);
    };
    patched.insert_str(anchor.end, &section);

    let patched = move_nav_entry(&patched, moving_id, anchor_id);
    (patched, ReorderOutcome::Moved)
}

/// Moves the `<li><a href="#moving_id">` entry after the anchor's entry.
/// Navigation edits are best-effort: a missing entry on either side leaves
/// the navigation list as it was.
fn move_nav_entry(html: &str, moving_id: &str, anchor_id: &str) -> String {
    let Some(moving) = blocks::nav_entry(html, moving_id) else {
        return html.to_string();
    };
    let entry = html[moving.clone()].to_string();
    let mut out = String::with_capacity(html.len());
    out.push_str(&html[..moving.start]);
    out.push_str(&html[moving.end..]);

    match blocks::nav_entry(&out, anchor_id) {
        Some(anchor) => {
            out.insert_str(anchor.end, &entry);
            out
        }
        None => html.to_string(),
    }
}
