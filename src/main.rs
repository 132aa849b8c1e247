//! UI smoke verification binary
//!
//! Launches a headless browser against the locally running web application,
//! walks the verification checklist, and exits non-zero if any unguarded
//! step fails. Screenshot artifacts land in `verification/`.
//!
//! Invoked with no arguments. `RUST_LOG` tunes diagnostic verbosity on
//! stderr; the checklist status lines always go to stdout.

use tracing::{info, warn};

use verifier::browser::{BrowserSession, BrowserSessionConfig};
use verifier::VerifyConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    verifier::init_logging();

    let config = VerifyConfig::default();

    // Fail fast on a malformed target constant, before launching Chrome
    let target = url::Url::parse(&config.base_url)?;
    info!("Target application: {}", target);

    std::fs::create_dir_all(&config.artifact_dir)?;

    let session = BrowserSession::new(BrowserSessionConfig::default()).await?;

    // The session is released on every exit path: run the checklist, close,
    // then propagate the checklist outcome
    let outcome = verifier::verify::run(&session, &config).await;

    if !session.is_alive() {
        warn!("Browser process disconnected during the run");
    }
    if let Err(e) = session.close().await {
        warn!("Browser session did not close cleanly: {}", e);
    }

    outcome?;
    info!("Verification run complete");
    Ok(())
}
