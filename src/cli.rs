//! Command-line interface definitions for Channel Watch.
//!
//! The only option is verbosity; channels, timeouts and the recency window
//! are compiled in (see [`crate::config`]).

use clap::Parser;

/// Command-line arguments for the Channel Watch application.
///
/// # Examples
///
/// ```sh
/// # Print fresh videos, log nothing
/// channel_watch
///
/// # Also write an info-level log to ./output.log
/// channel_watch --verbose
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about = "Report videos published in the last hour on a fixed set of channels")]
pub struct Cli {
    /// Enable detailed logging to output.log
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["channel_watch"]);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_long_flag() {
        let cli = Cli::parse_from(["channel_watch", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_short_flag() {
        let cli = Cli::parse_from(["channel_watch", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["channel_watch", "--json-output-dir", "x"]).is_err());
    }
}
