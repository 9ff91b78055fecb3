//! Shared blocking HTTP client for the embedding and generation services.

use crate::config::HttpConfig;
use std::time::Duration;

/// Build the client used for every external call.
///
/// The request timeout bounds each embedding and generation call so an
/// unresponsive service fails the current query instead of hanging the loop.
pub fn build_client(settings: &HttpConfig) -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(concat!("subjectivity/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Strip trailing slashes so `{base}/path` never doubles them
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
