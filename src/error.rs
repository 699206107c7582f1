// src/error.rs
// =============================================================================
// Fatal errors of a link check run.
//
// Broken links are NOT errors: they are collected as `Issue`s and reported.
// Everything in this file aborts the run before any report is produced,
// because it means the scanner could not understand the site it was given.
//
// Messages name only their own layer; the cause is chained with #[source]
// and printed by anyhow's alternate formatting in main.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// The HTML of a single page has a shape the extractor does not understand.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("page has no <main> element")]
    MissingMain,

    #[error("page has {count} <main> elements, expected exactly one")]
    MultipleMain { count: usize },

    #[error("<a> element without an href attribute: {html}")]
    AnchorWithoutHref { html: String },

    #[error("<a> element with an empty href attribute: {html}")]
    EmptyHref { html: String },

    #[error("element with an empty id attribute: {html}")]
    EmptyId { html: String },
}

/// An href could not be turned into a `Link`.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("link `{href}` points at its own page but names no anchor")]
    SelfLinkWithoutAnchor { href: String },

    #[error("link `{href}` cannot be resolved")]
    UnresolvableHref {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors raised while building the reference graph.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("root directory does not exist: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("root is not a directory: {}", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("no .html files found under {}", path.display())]
    NoHtmlFiles { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error("invalid link in {}", path.display())]
    Classify {
        path: PathBuf,
        #[source]
        source: ClassifyError,
    },

    #[error("failed to walk the output directory")]
    Walk(#[from] walkdir::Error),

    #[error("a parse task failed")]
    TaskFailed(#[from] tokio::task::JoinError),
}
