// src/report.rs
// =============================================================================
// Turns validation results into something a human (or a CI job) can read.
//
// Two output formats:
// - text: one block per page, one line per broken link, with "did you mean"
//   hints and a character diff between the missing id and each suggestion
// - json: the same data as a serde_json document, for tooling
//
// This is the only place that decides the process exit code:
//   0 = no broken links, 1 = at least one broken link.
// (Fatal scan errors never reach the reporter; main maps them to 2.)
// =============================================================================

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::checker::Suggestion;
use crate::graph::{relative_path, FileIssues, Issue, ReferenceGraph};

/// Everything a finished run found.
#[derive(Debug, Clone)]
pub struct Report {
    root: PathBuf,
    files_scanned: usize,
    files: Vec<FileIssues>,
}

impl Report {
    pub fn new(graph: &ReferenceGraph, files: Vec<FileIssues>) -> Self {
        Self {
            root: graph.root().to_path_buf(),
            files_scanned: graph.document_count(),
            files,
        }
    }

    pub fn issue_count(&self) -> usize {
        self.files.iter().map(|file| file.issues.len()).sum()
    }

    pub fn has_issues(&self) -> bool {
        self.issue_count() > 0
    }

    /// 1 if anything is broken, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.has_issues() {
            1
        } else {
            0
        }
    }

    /// Renders the human-readable report.
    ///
    /// With `color` off, suggestion diffs use `[-removed-]{+added+}` markers
    /// instead of red and green.
    pub fn render_text(&self, color: bool) -> String {
        let mut out = String::new();

        for file in &self.files {
            let name = self.relative(&file.file);
            let _ = writeln!(out, "{}", paint(&name, color, |s| s.bold().to_string()));

            for issue in &file.issues {
                let kind = paint(issue.kind(), color, |s| s.red().to_string());
                let _ = writeln!(out, "  {kind}  `{}`: {}", issue.href(), self.describe(issue));

                for suggestion in issue.suggestions() {
                    let wanted = match issue {
                        Issue::MissingOtherFile { target, .. } => self.relative(target),
                        Issue::MissingIdInOther { id, .. } | Issue::MissingIdInSelf { id, .. } => {
                            id.clone()
                        }
                    };
                    let _ = writeln!(
                        out,
                        "      did you mean `{}`?  {}",
                        suggestion.candidate,
                        diff(&wanted, &suggestion.candidate, color)
                    );
                }
            }
            out.push('\n');
        }

        let summary = if self.has_issues() {
            format!(
                "❌ Found {} broken link(s) in {} of {} page(s)",
                self.issue_count(),
                self.files.len(),
                self.files_scanned
            )
        } else {
            format!("✅ No broken links found in {} page(s)", self.files_scanned)
        };
        out.push_str(&summary);
        out.push('\n');
        out
    }

    /// Renders the report as pretty-printed JSON.
    pub fn render_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            files_scanned: self.files_scanned,
            issue_count: self.issue_count(),
            files: self
                .files
                .iter()
                .map(|file| JsonFile {
                    file: self.relative(&file.file),
                    issues: file.issues.iter().map(|issue| self.json_issue(issue)).collect(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&report)
    }

    fn describe(&self, issue: &Issue) -> String {
        match issue {
            Issue::MissingOtherFile { target, .. } => {
                format!("{} does not exist", self.relative(target))
            }
            Issue::MissingIdInOther { target, id, .. } => {
                format!("no id `{id}` in {}", self.relative(target))
            }
            Issue::MissingIdInSelf { id, .. } => format!("no id `{id}` on this page"),
        }
    }

    fn json_issue<'a>(&self, issue: &'a Issue) -> JsonIssue<'a> {
        match issue {
            Issue::MissingOtherFile {
                href,
                target,
                suggestions,
            } => JsonIssue::MissingOtherFile {
                href,
                target: self.relative(target),
                suggestions,
            },
            Issue::MissingIdInOther {
                href,
                target,
                id,
                suggestions,
            } => JsonIssue::MissingIdInOther {
                href,
                target: self.relative(target),
                id,
                suggestions,
            },
            Issue::MissingIdInSelf {
                href,
                id,
                suggestions,
            } => JsonIssue::MissingIdInSelf {
                href,
                id,
                suggestions,
            },
        }
    }

    fn relative(&self, path: &Path) -> String {
        relative_path(&self.root, path)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files_scanned: usize,
    issue_count: usize,
    files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    file: String,
    issues: Vec<JsonIssue<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum JsonIssue<'a> {
    MissingOtherFile {
        href: &'a str,
        target: String,
        suggestions: &'a [Suggestion],
    },
    MissingIdInOther {
        href: &'a str,
        target: String,
        id: &'a str,
        suggestions: &'a [Suggestion],
    },
    MissingIdInSelf {
        href: &'a str,
        id: &'a str,
        suggestions: &'a [Suggestion],
    },
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

// Character diff from what the link asked for to what actually exists.
// Runs of the same change are grouped: "set{+up+}", not "set{+u+}{+p+}".
fn diff(wanted: &str, existing: &str, color: bool) -> String {
    let mut out = String::new();
    let mut run = String::new();
    let mut run_tag = ChangeTag::Equal;

    for change in TextDiff::from_chars(wanted, existing).iter_all_changes() {
        if change.tag() != run_tag {
            push_run(&mut out, run_tag, &run, color);
            run.clear();
            run_tag = change.tag();
        }
        run.push_str(change.value());
    }
    push_run(&mut out, run_tag, &run, color);

    out
}

fn push_run(out: &mut String, tag: ChangeTag, run: &str, color: bool) {
    if run.is_empty() {
        return;
    }
    match (tag, color) {
        (ChangeTag::Equal, _) => out.push_str(run),
        (ChangeTag::Delete, true) => out.push_str(&run.red().strikethrough().to_string()),
        (ChangeTag::Insert, true) => out.push_str(&run.green().to_string()),
        (ChangeTag::Delete, false) => {
            let _ = write!(out, "[-{run}-]");
        }
        (ChangeTag::Insert, false) => {
            let _ = write!(out, "{{+{run}+}}");
        }
    }
}
