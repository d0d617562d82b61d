use std::time::Duration;

use tracing::debug;
use wreq::Client;

use crate::error::{self, PlanError};

pub const DEFAULT_BASE_URL: &str = "http://api.aviationstack.com/v1";

#[derive(Clone)]
pub struct LookupOptions {
    pub api_key: Option<String>,
    pub base_url: String,
    pub proxy: Option<String>,
    pub timeout: u64,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            timeout: 30,
        }
    }
}

impl LookupOptions {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("AVIATIONSTACK_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("JETLAG_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            ..Self::default()
        }
    }

    pub fn require_api_key(&self) -> Result<&str, PlanError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(PlanError::MissingApiKey)
    }
}

impl std::fmt::Debug for LookupOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn flights_url(base_url: &str) -> String {
    format!("{}/flights", base_url.trim_end_matches('/'))
}

/// Body of a successful response. Error statuses come back as errors, with
/// the upstream message when the body carries one.
pub async fn fetch_flights_json(
    params: &[(String, String)],
    options: &LookupOptions,
) -> Result<String, PlanError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(options.timeout));

    if let Some(ref proxy) = options.proxy {
        let proxy = wreq::Proxy::all(proxy)
            .map_err(|e| PlanError::ProxyError(e.without_uri().to_string()))?;
        builder = builder.proxy(proxy);
    }

    let client = builder.build().map_err(error::from_http_error)?;
    let url = flights_url(&options.base_url);

    debug!(url = %url, "requesting flight data");

    let response = client
        .get(url.as_str())
        .query(&params)
        .send()
        .await
        .map_err(error::from_http_error)?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(error::from_http_error)?;

    debug!(status, bytes = body.len(), "flight data response");

    match status {
        200..=299 => Ok(body),
        429 => Err(PlanError::RateLimited),
        _ => Err(crate::parse::upstream_message(&body)
            .map(PlanError::Upstream)
            .unwrap_or(PlanError::HttpStatus(status))),
    }
}
