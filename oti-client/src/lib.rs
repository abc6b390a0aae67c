//! OTI HTTP Client
//!
//! A small, type-safe HTTP client for the transit-indicators backend.
//!
//! The client covers the endpoints the job monitor needs: the latest
//! indicator job, job submission, the per-user job list and scenarios. The
//! [`JobApi`] trait is the seam the status poller is written against.
//!
//! # Example
//!
//! ```no_run
//! use oti_client::IndicatorsClient;
//! use oti_core::dto::job::CreateJob;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = IndicatorsClient::new("http://localhost:8000");
//!
//!     let job = client.submit_job(CreateJob::for_city("Accra")).await?;
//!
//!     println!("Submitted job {} ({})", job.id, job.job_status);
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
mod jobs;
mod scenarios;

// Re-export commonly used types
pub use api::JobApi;
pub use error::{ClientError, Result};

use oti_core::dto::job::ErrorBody;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the indicators API
#[derive(Debug, Clone)]
pub struct IndicatorsClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl IndicatorsClient {
    /// Create a new indicators client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend (e.g., "http://localhost:8000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new indicators client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use oti_client::IndicatorsClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = IndicatorsClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success responses are turned into a [`ClientError`], recognizing the
    /// backend's structured invalid-configuration body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            debug!("Request failed with status {}: {}", status, error_text);
            return Err(error_from_body(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Build the error for a failed response from its status and body
fn error_from_body(status: u16, body: String) -> ClientError {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => match parsed.missing_configuration() {
            Some(items) => ClientError::InvalidConfiguration {
                items: items.to_vec(),
            },
            None => ClientError::api_error(status, parsed.error),
        },
        Err(_) => ClientError::api_error(status, body),
    }
}
