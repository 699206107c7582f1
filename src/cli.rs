// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   site-link-check <ROOT> [--base <PATH>] [--json] [--no-color] [-v...]
//
// ROOT is the build output directory of the documentation site. BASE is
// the public path the site is served under (for example "/v2/" when every
// page lives at https://example.com/v2/...).
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::checker::normalize_base_path;

#[derive(Parser, Debug)]
#[command(
    name = "site-link-check",
    version,
    about = "Checks a rendered static site for broken internal links and anchors",
    long_about = "site-link-check scans every HTML page of a built documentation site, \
                  resolves each link inside the <main> element and reports links to \
                  pages or ids that do not exist. External links are never fetched."
)]
pub struct Cli {
    /// Build output directory to scan (e.g. ./dist)
    pub root: PathBuf,

    /// Public base path the site is served under
    ///
    /// Links starting with this path are resolved relative to ROOT.
    #[arg(long, env = "SITE_LINK_CHECK_BASE", default_value = "/")]
    pub base: String,

    /// Output the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Disable colored output (also honored: NO_COLOR)
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Settings one check run needs, derived from the command line once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub root: PathBuf,
    /// Always starts and ends with '/'
    pub base: String,
}

impl Cli {
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            root: self.root.clone(),
            base: normalize_base_path(&self.base),
        }
    }

    /// Whether the text report should use ANSI colors.
    pub fn use_color(&self) -> bool {
        !(self.no_color || self.json || std::env::var_os("NO_COLOR").is_some())
    }
}
