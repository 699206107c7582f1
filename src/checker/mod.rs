// src/checker/mod.rs
// =============================================================================
// Per-page link logic.
//
// Submodules:
// - html: Extracts hrefs and anchor ids from the <main> region of a page
// - classify: Resolves an href into a self, other-file or external Link
// - suggest: Ranks near-miss ids and pages for "did you mean" hints
//
// Nothing in here knows about more than one page at a time; the graph
// module stitches pages together.
// =============================================================================

mod classify;
mod html;
mod suggest;

pub use classify::{classify_link, normalize_base_path, normalize_path, Link};
pub use html::{extract_page, AnchorSet};
pub use suggest::{suggest, Suggestion};
