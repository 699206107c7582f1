// src/graph/scan.rs
// =============================================================================
// This module builds the ReferenceGraph from a build output directory.
//
// How it works:
// 1. Check the root exists and is a directory
// 2. Walk it with `walkdir`, splitting files into HTML pages and assets
// 3. Parse every page on its own blocking task: read, extract, classify
// 4. Wait for ALL tasks, then assemble the graph
//
// Pages do not depend on each other while being parsed, so they can all run
// at once. The graph is only put together after the last task is done, so
// validation can never observe half a site.
//
// Rust concepts:
// - spawn_blocking: scraper's Html is not Send and parsing is CPU work,
//   so it runs on tokio's blocking pool instead of an async worker
// - buffer_unordered: bounded concurrency over a stream of tasks
// =============================================================================

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::checker::{classify_link, extract_page, normalize_path};
use crate::error::ScanError;

use super::{ClassifiedLink, Document, ReferenceGraph};

// How many pages are parsed at the same time
const MAX_CONCURRENT_PARSES: usize = 64;

/// Builds the reference graph for the site under `root`.
///
/// `base` is the site's public base path, already normalized.
///
/// # Errors
///
/// Fails if the root is missing, is not a directory or holds no `.html`
/// file, and on the first page that cannot be read, parsed or classified.
pub async fn build_graph(root: &Path, base: &str) -> Result<ReferenceGraph, ScanError> {
    let root = check_root(root).await?;

    let walk_root = root.clone();
    let (pages, assets) = tokio::task::spawn_blocking(move || discover_files(&walk_root)).await??;

    if pages.is_empty() {
        return Err(ScanError::NoHtmlFiles { path: root });
    }

    info!(
        pages = pages.len(),
        assets = assets.len(),
        root = %root.display(),
        "discovered site files"
    );

    // One task per page, at most MAX_CONCURRENT_PARSES in flight.
    // The first failing page aborts the whole build.
    let documents: Vec<Document> = stream::iter(pages)
        .map(|path| {
            let root = root.clone();
            let base = base.to_string();
            tokio::task::spawn_blocking(move || scan_document(&root, &path, &base))
        })
        .buffer_unordered(MAX_CONCURRENT_PARSES)
        .map(|joined| joined.map_err(ScanError::from).and_then(|scanned| scanned))
        .try_collect()
        .await?;

    let mut graph = ReferenceGraph::new(&root);
    for document in documents {
        graph.insert_document(document);
    }
    for asset in assets {
        graph.insert_asset(asset);
    }

    info!(documents = graph.document_count(), "reference graph built");
    Ok(graph)
}

// Resolves the root to an absolute, canonical directory path
async fn check_root(root: &Path) -> Result<PathBuf, ScanError> {
    let metadata = match tokio::fs::metadata(root).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScanError::RootNotFound {
                path: root.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(ScanError::Read {
                path: root.to_path_buf(),
                source,
            })
        }
    };

    if !metadata.is_dir() {
        return Err(ScanError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }

    tokio::fs::canonicalize(root)
        .await
        .map_err(|source| ScanError::Read {
            path: root.to_path_buf(),
            source,
        })
}

// Lists every file under root, split into (html pages, other files).
// Both lists are sorted so the scan order never depends on the filesystem.
fn discover_files(root: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), ScanError> {
    let mut pages = Vec::new();
    let mut assets = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = normalize_path(entry.path());
        if path.extension().is_some_and(|ext| ext == "html") {
            pages.push(path);
        } else {
            assets.push(path);
        }
    }

    Ok((pages, assets))
}

// Reads, extracts and classifies one page
fn scan_document(root: &Path, path: &Path, base: &str) -> Result<Document, ScanError> {
    let html = std::fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let extracted = extract_page(&html).map_err(|source| ScanError::Extract {
        path: path.to_path_buf(),
        source,
    })?;

    let mut document = Document::new(path);
    document.anchors = extracted.anchors;

    for href in extracted.hrefs {
        let link = classify_link(root, &document.path, &href, base).map_err(|source| {
            ScanError::Classify {
                path: path.to_path_buf(),
                source,
            }
        })?;
        document.links.push(ClassifiedLink { href, link });
    }

    debug!(
        page = %path.display(),
        links = document.links.len(),
        anchors = document.anchors.len(),
        "scanned page"
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Link;
    use crate::error::{ClassifyError, ExtractError};
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, relative: &str, contents: &str) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn html(main: &str) -> String {
        format!("<!doctype html><html><body><nav><a href=\"/\">Home</a></nav><main>{main}</main></body></html>")
    }

    #[tokio::test]
    async fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("dist");
        let result = build_graph(&missing, "/").await;
        assert!(matches!(result, Err(ScanError::RootNotFound { .. })));
    }

    #[tokio::test]
    async fn test_root_is_a_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", &html(""));
        let result = build_graph(&dir.path().join("index.html"), "/").await;
        assert!(matches!(result, Err(ScanError::RootNotDirectory { .. })));
    }

    #[tokio::test]
    async fn test_no_html_files() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            build_graph(dir.path(), "/").await,
            Err(ScanError::NoHtmlFiles { .. })
        ));

        write(&dir, "assets/style.css", "body {}");
        assert!(matches!(
            build_graph(dir.path(), "/").await,
            Err(ScanError::NoHtmlFiles { .. })
        ));
    }

    #[tokio::test]
    async fn test_builds_documents_and_assets() {
        let dir = TempDir::new().unwrap();
        write(&dir, "index.html", &html(r##"<h1 id="top">Home</h1><a href="guide/intro#setup">Intro</a>"##));
        write(&dir, "guide/intro.html", &html(r##"<h2 id="setup">Setup</h2><a href="#setup">#</a>"##));
        write(&dir, "assets/logo.svg", "<svg/>");

        let graph = build_graph(dir.path(), "/").await.unwrap();
        let root = graph.root().to_path_buf();

        assert_eq!(graph.document_count(), 2);
        assert!(graph.has_asset(&root.join("assets/logo.svg")));

        let index = graph.document(&root.join("index.html")).unwrap();
        assert!(index.anchors.contains("top"));
        assert_eq!(
            index.links,
            vec![ClassifiedLink {
                href: "guide/intro#setup".to_string(),
                link: Link::Other {
                    target: root.join("guide/intro.html"),
                    fallbacks: vec![root.join("guide/intro/index.html")],
                    anchor: Some("setup".to_string()),
                },
            }]
        );

        let intro = graph.document(&root.join("guide/intro.html")).unwrap();
        assert_eq!(
            intro.links[0].link,
            Link::SelfRef {
                anchor: "setup".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_page_aborts_the_build() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.html", &html("<p>fine</p>"));
        write(&dir, "bad.html", "<html><body><p>no main here</p></body></html>");

        match build_graph(dir.path(), "/").await {
            Err(ScanError::Extract { path, source }) => {
                assert!(path.ends_with("bad.html"));
                assert!(matches!(source, ExtractError::MissingMain));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_self_link_without_anchor_aborts_the_build() {
        let dir = TempDir::new().unwrap();
        write(&dir, "page.html", &html(r#"<a href="page">Me</a>"#));

        match build_graph(dir.path(), "/").await {
            Err(ScanError::Classify { source, .. }) => {
                assert!(matches!(source, ClassifyError::SelfLinkWithoutAnchor { .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
