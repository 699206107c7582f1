// src/main.rs
// =============================================================================
// This is the entry point of site-link-check.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the reference graph of the whole site (concurrent, all-or-nothing)
// 3. Validate the finished graph
// 4. Print the report and exit with the proper code:
//      0 = no broken links
//      1 = broken links found
//      2 = fatal error (bad root, unparseable page, self-link without anchor)
// =============================================================================

mod checker; // src/checker/ - per-page extraction, classification, suggestions
mod cli; // src/cli.rs - command-line parsing
mod error; // src/error.rs - fatal error types
mod graph; // src/graph/ - reference graph construction and validation
mod logging; // src/logging.rs - tracing subscriber setup
mod report; // src/report.rs - text and JSON output

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use report::Report;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Fatal errors abort before any report is printed
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err   = fatal error, mapped to 2 by main
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    if !cli.use_color() {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.use_color())?;

    let options = cli.check_options();
    tracing::info!(root = %options.root.display(), base = %options.base, "checking site");

    let graph = graph::build_graph(&options.root, &options.base)
        .await
        .with_context(|| format!("cannot check {}", options.root.display()))?;

    let issues = graph::validate(&graph);
    let report = Report::new(&graph, issues);

    if cli.json {
        println!("{}", report.render_json()?);
    } else {
        print!("{}", report.render_text(cli.use_color()));
    }

    Ok(report.exit_code())
}
