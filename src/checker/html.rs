// src/checker/html.rs
// =============================================================================
// This module extracts links and anchors from one rendered HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Only the page's <main> element is scanned. Navigation bars, headers and
// sidebars are generated from one template and repeat on every page, so
// checking them once per page would only multiply the same report.
//
// The extractor is strict: a page whose markup it does not recognize is an
// error, never an empty result. An empty result would read as "no broken
// links" and hide the problem.
// =============================================================================

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

// Longest element snippet quoted in an error message
const SNIPPET_LEN: usize = 120;

/// The anchor ids one page defines.
///
/// Deduplicated, but remembers the order ids were first seen in so that
/// suggestions and reports come out the same on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorSet {
    order: Vec<String>,
    index: HashSet<String>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id, returning false if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.index.contains(&id) {
            return false;
        }
        self.index.insert(id.clone());
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Ids in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

impl<S: Into<String>> FromIterator<S> for AnchorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = AnchorSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Raw extraction result for one page, before any href is classified.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    /// href values of <a> elements inside <main>, in document order
    pub hrefs: Vec<String>,
    /// id values of elements inside <main>
    pub anchors: AnchorSet,
}

// Extracts outbound hrefs and anchor ids from the <main> region of a page
//
// Parameters:
//   html: the full text of the page
//
// Returns: the hrefs and ids found, or an ExtractError when the page does not
// have exactly one <main> or contains an <a>/id element of unexpected shape
pub fn extract_page(html: &str) -> Result<ExtractedPage, ExtractError> {
    let document = Html::parse_document(html);

    // These selectors are constants and known to be valid
    let main_selector = Selector::parse("main").expect("`main` is a valid selector");
    let anchor_selector = Selector::parse("a").expect("`a` is a valid selector");
    let id_selector = Selector::parse("[id]").expect("`[id]` is a valid selector");

    let mains: Vec<ElementRef> = document.select(&main_selector).collect();
    let main = match mains.as_slice() {
        [] => return Err(ExtractError::MissingMain),
        [main] => *main,
        _ => return Err(ExtractError::MultipleMain { count: mains.len() }),
    };

    let mut page = ExtractedPage::default();

    for element in main.select(&anchor_selector) {
        let value = element.value();
        match value.attr("href") {
            Some(href) => {
                let href = href.trim();
                if href.is_empty() {
                    return Err(ExtractError::EmptyHref {
                        html: snippet(&element),
                    });
                }
                page.hrefs.push(href.to_string());
            }
            // A bare <a id="..."> or <a name="..."> is accepted but is not a link;
            // only its id (if any) is registered as an anchor
            None if value.attr("id").is_some() || value.attr("name").is_some() => {}
            None => {
                return Err(ExtractError::AnchorWithoutHref {
                    html: snippet(&element),
                })
            }
        }
    }

    for element in main.select(&id_selector) {
        let id = element.value().attr("id").unwrap_or_default().trim();
        if id.is_empty() {
            return Err(ExtractError::EmptyId {
                html: snippet(&element),
            });
        }
        page.anchors.insert(id);
    }

    Ok(page)
}

// Outer HTML of an element, shortened for error messages
fn snippet(element: &ElementRef) -> String {
    let html = element.html();
    match html.char_indices().nth(SNIPPET_LEN) {
        Some((cut, _)) => format!("{}...", &html[..cut]),
        None => html,
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is `ElementRef::select` enough to scope the scan?
//    - It walks the descendants of <main> only, so anything in <header>,
//      <nav> or <aside> outside of it is never visited
//
// 2. Why does AnchorSet keep both a Vec and a HashSet?
//    - The HashSet answers "does this page define #x" in O(1)
//    - The Vec keeps discovery order, which breaks ties between equally
//      close suggestions
// -----------------------------------------------------------------------------
