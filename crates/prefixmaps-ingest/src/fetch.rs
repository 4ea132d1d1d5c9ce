//! Blocking HTTP retrieval of upstream sources.

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("prefixmaps/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 60,
        }
    }
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// GET `url` and return the body as text. Non-2xx responses are errors.
#[cfg(feature = "remote")]
pub fn fetch_text(config: &FetchConfig, url: &str) -> Result<String> {
    use anyhow::Context as _;
    use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).context("invalid user agent")?,
    );
    let client = reqwest::blocking::Client::builder()
        .default_headers(headers)
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .context("failed to build http client")?;

    tracing::info!(url = %url, "fetching");
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request failed: {url}"))?
        .error_for_status()
        .with_context(|| format!("bad response from {url}"))?;
    response
        .text()
        .with_context(|| format!("failed to read response body from {url}"))
}

#[cfg(not(feature = "remote"))]
pub fn fetch_text(_config: &FetchConfig, url: &str) -> Result<String> {
    anyhow::bail!("cannot fetch {url}: built without the `remote` feature")
}
