// src/logging.rs
// =============================================================================
// Sets up `tracing` for diagnostics about the run itself (files found,
// pages parsed). The report is not logging; it goes to stdout separately.
//
// Logs always go to stderr so `--json` output on stdout stays parseable.
// =============================================================================

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// Maps the -v count to a level: none = warn, -v = info, -vv or more = debug
fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber was already installed.
pub fn init(verbose: u8, color: bool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for(verbose))
        .with_target(false)
        .with_ansi(color)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
