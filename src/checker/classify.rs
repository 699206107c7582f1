// src/checker/classify.rs
// =============================================================================
// This module turns a raw href into a classified `Link`.
//
// How it works:
// 1. Build the page's own URL on a synthetic, never-resolved origin:
//    https://site-link-check.invalid/<base path>/<page path relative to root>
// 2. Resolve the href against it with `Url::join`, exactly like a browser
//    would. Relative, root-relative and protocol-relative hrefs all come out
//    as one absolute URL and no network access is ever needed.
// 3. A different origin means the link leaves the site: External.
// 4. Otherwise map the URL path back to a file under the root directory,
//    the same way the static site generator laid the files out.
//
// The same href can classify differently on two pages. "overview" on
// /guide/intro.html is /guide/overview.html, on /index.html it is
// /overview.html.
// =============================================================================

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::error::ClassifyError;

/// Origin every page is placed on while resolving hrefs.
///
/// `.invalid` is reserved and never resolves, so nothing here can reach the
/// network by accident.
pub const SITE_ORIGIN: &str = "https://site-link-check.invalid";

/// A reference found on a page, after resolution.
///
/// Every consumer matches on all three variants, so adding a kind of link
/// forces every consumer to decide what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// Jump to an id on the page the link appears on
    SelfRef { anchor: String },
    /// Another file of the site, optionally with an id on it
    Other {
        target: PathBuf,
        /// Other files the generator may have written for the same URL,
        /// tried in order when `target` does not exist
        fallbacks: Vec<PathBuf>,
        anchor: Option<String>,
    },
    /// Leaves the site; never checked
    External { url: String },
}

// Normalizes a public base path so it always starts and ends with '/'
//
// Examples:
//   ""       -> "/"
//   "docs"   -> "/docs/"
//   "/v2"    -> "/v2/"
//   "/v2/"   -> "/v2/"
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

// Lexically normalizes a path: drops "." components and folds ".." into its
// parent. Used so that every path the graph compares is spelled one way.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Classifies `href` as it appears on the page at `source`.
///
/// `root` is the site's output directory and `base` its public base path
/// (already normalized with [`normalize_base_path`]). `source` must live
/// under `root`.
///
/// # Errors
///
/// - [`ClassifyError::SelfLinkWithoutAnchor`] when the href points back at
///   `source` itself without naming an id
/// - [`ClassifyError::UnresolvableHref`] when the href is not a valid URL
///   reference at all
pub fn classify_link(
    root: &Path,
    source: &Path,
    href: &str,
    base: &str,
) -> Result<Link, ClassifyError> {
    let unresolvable = |err| ClassifyError::UnresolvableHref {
        href: href.to_string(),
        source: err,
    };

    let page = page_url(root, source, base).map_err(unresolvable)?;
    let resolved = page.join(href).map_err(unresolvable)?;

    if resolved.origin() != page.origin() {
        return Ok(Link::External {
            url: resolved.to_string(),
        });
    }

    let anchor = resolved
        .fragment()
        .filter(|fragment| !fragment.is_empty())
        .map(percent_decode);

    let (target, fallbacks) = target_paths(root, resolved.path(), base);

    // "/guide#x" on guide/index.html still points at the page itself
    let source = normalize_path(source);
    if target == source || fallbacks.contains(&source) {
        return match anchor {
            Some(anchor) => Ok(Link::SelfRef { anchor }),
            None => Err(ClassifyError::SelfLinkWithoutAnchor {
                href: href.to_string(),
            }),
        };
    }

    Ok(Link::Other {
        target,
        fallbacks,
        anchor,
    })
}

// Builds the URL a page is served at on the synthetic origin
fn page_url(root: &Path, source: &Path, base: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(SITE_ORIGIN)?;

    let relative = source.strip_prefix(root).unwrap_or(source);
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    // set_path percent-encodes anything that is not valid in a URL path
    url.set_path(&format!("{base}{}", segments.join("/")));
    Ok(url)
}

// Maps a URL path back to the file the generator wrote for it, plus the
// other spellings the same URL could have been generated as
//
// Examples with base "/" and root "/site":
//   "/"                     -> /site/index.html
//   "/guide/"               -> /site/guide/index.html, else /site/guide.html
//   "/guide"                -> /site/guide.html, else /site/guide/index.html
//   "/assets/logo.svg"      -> /site/assets/logo.svg, else logo.svg.html, ...
//   "/blog/bon-v2.3-release" -> as above; the ".3-release" suffix is only a
//                              guess at an extension
//
// The path is still percent-encoded: it is split into segments first and
// each segment decoded on its own, so "%2F" never becomes a separator.
fn target_paths(root: &Path, url_path: &str, base: &str) -> (PathBuf, Vec<PathBuf>) {
    let relative = match url_path.strip_prefix(base) {
        Some(rest) => rest,
        // "/v2" is the base "/v2/" without its trailing slash
        None if format!("{url_path}/") == base => "",
        None => url_path.trim_start_matches('/'),
    };

    let mut target = normalize_path(root);
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                target.pop();
            }
            segment => target.push(decode_segment(segment)),
        }
    }

    if relative.is_empty() {
        target.push("index.html");
        return (target, Vec::new());
    }

    if relative.ends_with('/') {
        let flat = with_html_suffix(&target);
        target.push("index.html");
        return (target, vec![flat]);
    }

    let index = target.join("index.html");
    match target.extension() {
        Some(ext) if ext == "html" => (target, Vec::new()),
        // A real asset, or a slug with a dot in it
        Some(_) => {
            let page = with_html_suffix(&target);
            (target, vec![page, index])
        }
        // Clean URLs: /guide/overview is served from guide/overview.html
        None => (with_html_suffix(&target), vec![index]),
    }
}

// "guide/overview" -> "guide/overview.html", keeping any dots in the name
fn with_html_suffix(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(".html");
    path.with_file_name(file_name)
}

// A segment that decodes to something containing a separator keeps its
// encoded form: no file name on disk can contain one
fn decode_segment(raw: &str) -> String {
    let decoded = percent_decode(raw);
    if decoded.contains(|c| c == '/' || c == '\\') {
        raw.to_string()
    } else {
        decoded
    }
}

fn percent_decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        // Not UTF-8 once decoded; compare the raw form instead
        Err(_) => raw.to_string(),
    }
}
