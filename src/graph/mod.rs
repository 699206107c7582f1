// src/graph/mod.rs
// =============================================================================
// The reference graph: every page of the site with its anchors and its
// classified outbound links.
//
// Submodules:
// - scan: Walks the output directory and builds the graph concurrently
// - validate: Walks the finished graph and collects broken references
//
// The graph is built once, then only read. Validation never sees a graph
// that is still being filled in.
// =============================================================================

mod scan;
mod validate;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::checker::{normalize_path, AnchorSet, Link};

pub use scan::build_graph;
pub use validate::{validate, FileIssues, Issue};

/// A link as written in the page, next to what it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLink {
    pub href: String,
    pub link: Link,
}

/// One rendered HTML page.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub anchors: AnchorSet,
    /// Outbound links in the order they appear in the page
    pub links: Vec<ClassifiedLink>,
}

impl Document {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            anchors: AnchorSet::new(),
            links: Vec::new(),
        }
    }
}

/// All pages of a site, keyed by normalized absolute path.
///
/// Non-HTML files (images, stylesheets, downloads) are tracked separately
/// as assets: links may point at them, but they define no anchors.
#[derive(Debug, Clone)]
pub struct ReferenceGraph {
    root: PathBuf,
    documents: BTreeMap<PathBuf, Document>,
    assets: BTreeSet<PathBuf>,
}

impl ReferenceGraph {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: normalize_path(root.as_ref()),
            documents: BTreeMap::new(),
            assets: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn insert_document(&mut self, document: Document) {
        self.documents.insert(document.path.clone(), document);
    }

    pub fn insert_asset(&mut self, path: impl AsRef<Path>) {
        self.assets.insert(normalize_path(path.as_ref()));
    }

    pub fn document(&self, path: &Path) -> Option<&Document> {
        self.documents.get(&normalize_path(path))
    }

    pub fn has_asset(&self, path: &Path) -> bool {
        self.assets.contains(&normalize_path(path))
    }

    /// Documents sorted by path.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// `path` relative to the root with '/' separators, for display and for
    /// comparing page names.
    pub fn relative(&self, path: &Path) -> String {
        relative_path(&self.root, path)
    }
}

/// `path` relative to `root`, joined with '/' on every platform.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
