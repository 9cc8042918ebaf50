//! Shodan host lookup capability.
//!
//! The raw record shape is owned by the Shodan API; this module only
//! fetches it and classifies transport-level failures. Normalization
//! lives in [`crate::analysis`].

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

const SHODAN_API_BASE: &str = "https://api.shodan.io";

/// Failure kinds surfaced by a host lookup. These are the only errors
/// the interaction loop reports to the user; they abort the current
/// query, never the session.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no information available for host '{host}'")]
    NotFound { host: String },
    #[error("Shodan API key rejected; check your configuration")]
    Unauthorized,
    #[error("Shodan API request failed with {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("network error talking to Shodan: {0}")]
    Network(#[from] reqwest::Error),
}

/// Capability to resolve a host identifier into a raw host record.
pub trait HostLookup: Send + Sync {
    fn fetch_host<'a>(
        &'a self,
        host: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Value, LookupError>> + Send + 'a>>;
}

/// Shodan REST API client.
#[derive(Debug, Clone)]
pub struct ShodanClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ShodanClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self::with_base_url(client, SHODAN_API_BASE.to_string(), api_key)
    }

    /// Override the API base URL, used by tests against a local stub.
    pub fn with_base_url(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

impl HostLookup for ShodanClient {
    fn fetch_host<'a>(
        &'a self,
        host: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Value, LookupError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!(
                "{}/shodan/host/{}?key={}",
                self.base_url.trim_end_matches('/'),
                host,
                self.api_key
            );

            let response = self.client.get(url).send().await?;
            let status = response.status();
            match status {
                StatusCode::NOT_FOUND => Err(LookupError::NotFound {
                    host: host.to_string(),
                }),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(LookupError::Unauthorized),
                _ if !status.is_success() => {
                    let message = response.text().await.unwrap_or_default();
                    Err(LookupError::Api { status, message })
                }
                _ => Ok(response.json::<Value>().await?),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error_names_the_host() {
        let err = LookupError::NotFound {
            host: "1.2.3.4".to_string(),
        };
        assert!(err.to_string().contains("1.2.3.4"));
    }

    #[test]
    fn api_error_carries_status_and_body() {
        let err = LookupError::Api {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "rate limited".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("rate limited"));
    }
}
