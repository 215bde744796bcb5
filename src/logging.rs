//! Tracing setup.
//!
//! `--verbose` sends `info` and above to [`config::LOG_FILE`], truncated on
//! every run. Without it the console only gets critical events, and since
//! `tracing` has nothing above `error` the console stays quiet. `RUST_LOG`
//! overrides either default.
//!
//! The subscriber itself is built by [`subscriber`] from any writer so tests
//! can capture output in memory.

use crate::config;
use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "off" }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// A fmt subscriber writing plain lines to `writer`.
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tfmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .finish()
}

/// Open the log file for this run, discarding what the last run wrote.
fn open_log_file(path: impl AsRef<Path>) -> std::io::Result<Mutex<File>> {
    File::create(path).map(Mutex::new)
}

/// Install the process-wide subscriber. Call once, before anything logs.
pub fn init(verbose: bool) -> Result<(), Box<dyn Error>> {
    if verbose {
        let file = open_log_file(config::LOG_FILE)?;
        tracing::subscriber::set_global_default(subscriber(filter(true), file))?;
    } else {
        tracing::subscriber::set_global_default(subscriber(filter(false), std::io::stderr))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "info");
        assert_eq!(default_directive(false), "off");
    }

    #[test]
    fn test_log_file_is_truncated_each_run() {
        let path = std::env::temp_dir().join(format!(
            "channel_watch-log-{}.log",
            std::process::id()
        ));
        std::fs::write(&path, "previous run\n").unwrap();

        let file = open_log_file(&path).unwrap();
        let sub = subscriber(EnvFilter::new(default_directive(true)), file);
        tracing::subscriber::with_default(sub, || {
            tracing::info!(channel = "acme", "Checking channel");
            tracing::debug!("below the verbose level");
        });

        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(!written.contains("previous run"));
        assert!(written.contains("INFO"));
        assert!(written.contains("Checking channel"));
        assert!(written.contains("channel=\"acme\""));
        assert!(!written.contains("below the verbose level"));
    }
}
