//! HTML post-processing — idempotent structural edits on the theme's output.
//!
//! The rendered HTML is semi-structured text we do not own. Instead of
//! pattern-rewriting it, edits locate an element's full byte range with a
//! balanced-block scanner and splice by range, which keeps every transform
//! total: anything unlocatable is reported as a skip, never guessed at.

pub mod blocks;
pub mod download_links;
pub mod reorder;
