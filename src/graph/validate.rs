// src/graph/validate.rs
// =============================================================================
// Walks a finished ReferenceGraph and collects every broken reference.
//
// Three things can be wrong with a link:
// - it points at a page that does not exist       (MissingOtherFile)
// - the page exists but has no such id           (MissingIdInOther)
// - it points at an id missing on its own page   (MissingIdInSelf)
//
// "The page moved" and "the heading was renamed" need different fixes, so
// they are different issue kinds.
//
// This module is pure: no I/O, no logging. Same graph in, same issues out.
// =============================================================================

use std::path::{Path, PathBuf};

use crate::checker::{suggest, Link, Suggestion};

use super::{Document, ReferenceGraph};

/// One broken reference found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingOtherFile {
        href: String,
        target: PathBuf,
        /// Existing pages with a similar path
        suggestions: Vec<Suggestion>,
    },
    MissingIdInOther {
        href: String,
        target: PathBuf,
        id: String,
        /// Ids of `target` that are close to `id`
        suggestions: Vec<Suggestion>,
    },
    MissingIdInSelf {
        href: String,
        id: String,
        /// Ids of the page itself that are close to `id`
        suggestions: Vec<Suggestion>,
    },
}

impl Issue {
    /// Stable machine-readable name of the issue kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Issue::MissingOtherFile { .. } => "missing-other-file",
            Issue::MissingIdInOther { .. } => "missing-id-in-other",
            Issue::MissingIdInSelf { .. } => "missing-id-in-self",
        }
    }

    pub fn href(&self) -> &str {
        match self {
            Issue::MissingOtherFile { href, .. }
            | Issue::MissingIdInOther { href, .. }
            | Issue::MissingIdInSelf { href, .. } => href,
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            Issue::MissingOtherFile { suggestions, .. }
            | Issue::MissingIdInOther { suggestions, .. }
            | Issue::MissingIdInSelf { suggestions, .. } => suggestions,
        }
    }
}

/// All issues of one page, in the order its links appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIssues {
    pub file: PathBuf,
    pub issues: Vec<Issue>,
}

/// Checks every link of every page in `graph`.
///
/// Pages without issues are left out. Pages come back sorted by path, and
/// issues within a page in link order.
pub fn validate(graph: &ReferenceGraph) -> Vec<FileIssues> {
    graph
        .documents()
        .filter_map(|document| {
            let issues = validate_document(graph, document);
            (!issues.is_empty()).then(|| FileIssues {
                file: document.path.clone(),
                issues,
            })
        })
        .collect()
}

fn validate_document(graph: &ReferenceGraph, document: &Document) -> Vec<Issue> {
    let mut issues = Vec::new();

    for classified in &document.links {
        let href = &classified.href;
        match &classified.link {
            Link::External { .. } => {}

            Link::SelfRef { anchor } => {
                if !document.anchors.contains(anchor) {
                    issues.push(Issue::MissingIdInSelf {
                        href: href.clone(),
                        id: anchor.clone(),
                        suggestions: suggest(document.anchors.iter(), anchor),
                    });
                }
            }

            Link::Other {
                target,
                fallbacks,
                anchor,
            } => match resolve(graph, target, fallbacks) {
                Target::Page(target_document) => {
                    let Some(anchor) = anchor else { continue };
                    if !target_document.anchors.contains(anchor) {
                        issues.push(Issue::MissingIdInOther {
                            href: href.clone(),
                            target: target_document.path.clone(),
                            id: anchor.clone(),
                            suggestions: suggest(target_document.anchors.iter(), anchor),
                        });
                    }
                }
                // Assets exist but carry no ids, so an anchor on one is not checked
                Target::Asset => {}
                Target::Missing => issues.push(Issue::MissingOtherFile {
                    href: href.clone(),
                    target: target.clone(),
                    suggestions: suggest_pages(graph, target),
                }),
            },
        }
    }

    issues
}

// What an other-file link landed on
enum Target<'g> {
    Page(&'g Document),
    Asset,
    Missing,
}

// Tries the primary target first, then each fallback spelling of the URL
fn resolve<'g>(graph: &'g ReferenceGraph, target: &Path, fallbacks: &[PathBuf]) -> Target<'g> {
    let candidates = std::iter::once(target).chain(fallbacks.iter().map(PathBuf::as_path));
    for candidate in candidates {
        if let Some(document) = graph.document(candidate) {
            return Target::Page(document);
        }
        if graph.has_asset(candidate) {
            return Target::Asset;
        }
    }
    Target::Missing
}

// Pages whose root-relative path is a near miss of the missing target
fn suggest_pages(graph: &ReferenceGraph, target: &Path) -> Vec<Suggestion> {
    let pages: Vec<String> = graph
        .documents()
        .map(|document| graph.relative(&document.path))
        .collect();
    suggest(pages.iter().map(String::as_str), &graph.relative(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::AnchorSet;
    use crate::graph::ClassifiedLink;

    const ROOT: &str = "/site";

    fn path(relative: &str) -> PathBuf {
        Path::new(ROOT).join(relative)
    }

    fn page(relative: &str, anchors: &[&str], links: Vec<(&str, Link)>) -> Document {
        let mut document = Document::new(path(relative));
        document.anchors = anchors.iter().copied().collect::<AnchorSet>();
        document.links = links
            .into_iter()
            .map(|(href, link)| ClassifiedLink {
                href: href.to_string(),
                link,
            })
            .collect();
        document
    }

    fn self_ref(anchor: &str) -> Link {
        Link::SelfRef {
            anchor: anchor.to_string(),
        }
    }

    fn other(target: &str, anchor: Option<&str>) -> Link {
        other_or(target, &[], anchor)
    }

    fn other_or(target: &str, fallbacks: &[&str], anchor: Option<&str>) -> Link {
        Link::Other {
            target: path(target),
            fallbacks: fallbacks.iter().map(|f| path(f)).collect(),
            anchor: anchor.map(str::to_string),
        }
    }

    fn graph(documents: Vec<Document>) -> ReferenceGraph {
        let mut graph = ReferenceGraph::new(ROOT);
        for document in documents {
            graph.insert_document(document);
        }
        graph
    }

    #[test]
    fn test_existing_self_anchor_is_fine() {
        let graph = graph(vec![page("f.html", &["x"], vec![("#x", self_ref("x"))])]);
        assert!(validate(&graph).is_empty());
    }

    #[test]
    fn test_missing_self_anchor() {
        let graph = graph(vec![page(
            "f.html",
            &["usage", "setup"],
            vec![("#usagee", self_ref("usagee"))],
        )]);
        let report = validate(&graph);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].file, path("f.html"));
        match &report[0].issues[..] {
            [Issue::MissingIdInSelf { id, suggestions, .. }] => {
                assert_eq!(id, "usagee");
                assert_eq!(suggestions[0].candidate, "usage");
            }
            other => panic!("unexpected issues: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_one_issue_with_or_without_anchor() {
        for anchor in [None, Some("intro")] {
            let graph = graph(vec![page("a.html", &[], vec![("c.html", other("c.html", anchor))])]);
            let report = validate(&graph);

            assert_eq!(report.len(), 1);
            assert_eq!(report[0].issues.len(), 1);
            assert_eq!(report[0].issues[0].kind(), "missing-other-file");
        }
    }

    #[test]
    fn test_missing_anchor_in_existing_file() {
        let graph = graph(vec![
            page("a.html", &["top"], vec![("b.html#missing", other("b.html", Some("missing")))]),
            page("b.html", &["intro"], vec![]),
        ]);
        let report = validate(&graph);

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].file, path("a.html"));
        match &report[0].issues[..] {
            [Issue::MissingIdInOther { target, id, suggestions, .. }] => {
                assert_eq!(target, &path("b.html"));
                assert_eq!(id, "missing");
                // "intro" is 6 edits away from "missing"
                assert!(suggestions.is_empty());
            }
            other => panic!("unexpected issues: {other:?}"),
        }
    }

    #[test]
    fn test_existing_file_without_anchor_is_fine() {
        let graph = graph(vec![
            page("a.html", &[], vec![("b", other("b.html", None)), ("b#intro", other("b.html", Some("intro")))]),
            page("b.html", &["intro"], vec![]),
        ]);
        assert!(validate(&graph).is_empty());
    }

    #[test]
    fn test_external_links_are_never_checked() {
        let external = Link::External {
            url: "https://example.com/".to_string(),
        };
        let graph = graph(vec![page("a.html", &[], vec![("https://example.com", external)])]);
        assert!(validate(&graph).is_empty());
    }

    #[test]
    fn test_links_to_assets() {
        let mut graph = graph(vec![page(
            "a.html",
            &[],
            vec![
                ("logo.svg", other("logo.svg", None)),
                ("logo.svg#frag", other("logo.svg", Some("frag"))),
                ("missing.png", other("missing.png", None)),
            ],
        )]);
        graph.insert_asset(path("logo.svg"));

        let report = validate(&graph);
        assert_eq!(report[0].issues.len(), 1);
        assert_eq!(report[0].issues[0].href(), "missing.png");
    }

    #[test]
    fn test_missing_page_gets_path_suggestions() {
        let graph = graph(vec![
            page("a.html", &[], vec![("guide/overveiw", other("guide/overveiw.html", None))]),
            page("guide/overview.html", &[], vec![]),
        ]);
        let report = validate(&graph);
        let suggestions = report[0].issues[0].suggestions();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].candidate, "guide/overview.html");
    }

    #[test]
    fn test_clean_url_found_as_directory_index() {
        let graph = graph(vec![
            page("index.html", &[], vec![("/guide#setup", other_or("guide.html", &["guide/index.html"], Some("setup")))]),
            page("guide/index.html", &["setup"], vec![]),
        ]);
        assert!(validate(&graph).is_empty());
    }

    #[test]
    fn test_directory_url_found_as_flat_page() {
        let graph = graph(vec![
            page("index.html", &[], vec![("/guide/", other_or("guide/index.html", &["guide.html"], None))]),
            page("guide.html", &[], vec![]),
        ]);
        assert!(validate(&graph).is_empty());
    }

    #[test]
    fn test_dotted_slug_found_as_html_page() {
        let link = other_or(
            "blog/bon-v2.3-release",
            &["blog/bon-v2.3-release.html", "blog/bon-v2.3-release/index.html"],
            None,
        );
        let graph = graph(vec![
            page("index.html", &[], vec![("/blog/bon-v2.3-release", link)]),
            page("blog/bon-v2.3-release.html", &[], vec![]),
        ]);
        assert!(validate(&graph).is_empty());
    }

    #[test]
    fn test_anchor_checked_on_the_fallback_page() {
        let graph = graph(vec![
            page("index.html", &[], vec![("/guide#setpu", other_or("guide.html", &["guide/index.html"], Some("setpu")))]),
            page("guide/index.html", &["setup"], vec![]),
        ]);
        let report = validate(&graph);
        match &report[0].issues[..] {
            [Issue::MissingIdInOther { target, .. }] => assert_eq!(target, &path("guide/index.html")),
            other => panic!("unexpected issues: {other:?}"),
        }
    }

    #[test]
    fn test_missing_when_no_spelling_exists() {
        let graph = graph(vec![page(
            "index.html",
            &[],
            vec![("/guide", other_or("guide.html", &["guide/index.html"], None))],
        )]);
        let report = validate(&graph);
        match &report[0].issues[..] {
            [Issue::MissingOtherFile { target, .. }] => assert_eq!(target, &path("guide.html")),
            other => panic!("unexpected issues: {other:?}"),
        }
    }

    #[test]
    fn test_files_sorted_and_issues_in_link_order() {
        let graph = graph(vec![
            page("z.html", &[], vec![("#b", self_ref("b")), ("#a", self_ref("a"))]),
            page("clean.html", &[], vec![]),
            page("m.html", &[], vec![("gone", other("gone.html", None))]),
        ]);
        let report = validate(&graph);

        let files: Vec<&PathBuf> = report.iter().map(|f| &f.file).collect();
        assert_eq!(files, vec![&path("m.html"), &path("z.html")]);

        let hrefs: Vec<&str> = report[1].issues.iter().map(Issue::href).collect();
        assert_eq!(hrefs, vec!["#b", "#a"]);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let build = || {
            graph(vec![
                page("a.html", &["one", "two"], vec![("#on", self_ref("on")), ("x", other("x.html", None))]),
                page("b.html", &[], vec![("a#tw", other("a.html", Some("tw")))]),
            ])
        };
        assert_eq!(validate(&build()), validate(&build()));
    }
}
