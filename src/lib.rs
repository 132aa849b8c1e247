//! UI smoke verification runner
//!
//! Drives a headless Chrome/Chromium instance against the locally running
//! web application, walks through the Lab and Hardware tabs, captures
//! screenshots, and reports which expected UI texts are visible.

pub mod browser;
pub mod verify;

use std::path::PathBuf;
use std::time::Duration;

/// Verification run configuration
///
/// All targets are literal constants carried by `Default`; the binary
/// recognizes no flags and no functional environment variables.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyConfig {
    /// Base URL of the target application
    pub base_url: String,
    /// Directory the screenshot artifacts are written to
    pub artifact_dir: PathBuf,
    /// Delay after initial navigation, letting client-side rendering settle
    pub settle_delay_ms: u64,
    /// Delay after each tab interaction
    pub interaction_delay_ms: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173/".to_string(),
            artifact_dir: PathBuf::from("verification"),
            settle_delay_ms: 2000,
            interaction_delay_ms: 1000,
        }
    }
}

impl VerifyConfig {
    /// Settle delay after the initial page load
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Delay after each tab click
    pub fn interaction_delay(&self) -> Duration {
        Duration::from_millis(self.interaction_delay_ms)
    }
}

/// Initialize logging.
///
/// Diagnostics go to stderr; stdout is reserved for the checklist status
/// lines so that two runs against an unchanged target produce identical
/// stdout.
pub fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_config_default() {
        let config = VerifyConfig::default();
        assert_eq!(config.base_url, "http://localhost:5173/");
        assert_eq!(config.artifact_dir, PathBuf::from("verification"));
        assert_eq!(config.settle_delay(), Duration::from_millis(2000));
        assert_eq!(config.interaction_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_verify_config_base_url_parses() {
        let config = VerifyConfig::default();
        let target = url::Url::parse(&config.base_url).expect("base URL must be valid");
        assert_eq!(target.scheme(), "http");
        assert_eq!(target.host_str(), Some("localhost"));
        assert_eq!(target.port_or_known_default(), Some(5173));
    }

    #[test]
    fn test_verify_config_roundtrip() {
        let config = VerifyConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("baseUrl"));
        let parsed: VerifyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.base_url, config.base_url);
        assert_eq!(parsed.settle_delay_ms, config.settle_delay_ms);
    }
}
