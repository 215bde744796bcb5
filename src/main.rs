//! # Channel Watch
//!
//! Checks a fixed list of video channels and prints any video published in
//! the last hour, with its publisher, raw publish time and link.
//!
//! ## Usage
//!
//! ```sh
//! channel_watch            # print fresh videos only
//! channel_watch --verbose  # also log progress to output.log
//! ```
//!
//! ## Architecture
//!
//! 1. **Bootstrap**: provision geckodriver, start a headless Firefox session,
//!    dismiss the cookie consent dialog
//! 2. **Check**: for each channel read the newest video from its listing page
//!    and, only if it is less than an hour old, read the watch page
//! 3. **Output**: print each fresh video, then shut the browser down
//!
//! Channels are checked sequentially and a failure on one channel never stops
//! the others. Only bootstrap failures end the run early.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, info};

mod bootstrap;
mod browser;
mod cli;
mod config;
mod dates;
mod extractor;
mod logging;
mod models;
mod utils;
mod watch;

use bootstrap::consent::dismiss_consent;
use bootstrap::driver::resolve_driver_binary;
use bootstrap::session::{Session, run_then_release};
use cli::Cli;
use models::ChannelTarget;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    logging::init(args.verbose)?;

    let start_time = std::time::Instant::now();
    info!("channel_watch starting up");
    debug!(?args, "Parsed CLI arguments");

    let targets = config::CHANNELS
        .iter()
        .map(|url| ChannelTarget::parse(url))
        .collect::<Result<Vec<_>, _>>()?;

    // ---- Bootstrap (fatal on failure) ----
    let binary = resolve_driver_binary().await?;
    info!(?binary, "Resolved geckodriver");
    let session = Session::start(&binary).await?;

    // ---- Check channels; the session is released whatever happens here ----
    let records = run_then_release(
        session,
        async |session: &Session| {
            dismiss_consent(session.browser(), config::CONSENT_TIMEOUT).await;
            watch::check_all(session.browser(), &targets, Utc::now).await
        },
        Session::quit,
    )
    .await;

    for record in &records {
        println!("{record}");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        channels = targets.len(),
        fresh = records.len(),
        "Execution complete"
    );

    Ok(())
}
