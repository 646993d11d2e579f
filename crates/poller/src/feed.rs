//! Victim feed client for the ransomware.live API.

use std::time::Duration;

use serde_json::Value;

use leakwatch_common::error::AppError;

/// Source of raw victim payloads, one region at a time.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the raw feed payload for an ISO country code.
    async fn fetch(&self, region_code: &str) -> Result<Value, AppError>;
}

/// HTTP client for `GET {base}/countryvictims/{code}`.
pub struct RansomwareLiveClient {
    base_url: String,
    client: reqwest::Client,
}

impl RansomwareLiveClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, region_code: &str) -> String {
        format!("{}/countryvictims/{}", self.base_url, region_code)
    }
}

#[async_trait::async_trait]
impl FeedSource for RansomwareLiveClient {
    async fn fetch(&self, region_code: &str) -> Result<Value, AppError> {
        let url = self.endpoint(region_code);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Feed(format!(
                "{} returned status {}",
                url,
                status.as_u16()
            )));
        }

        let payload: Value = response.json().await?;
        tracing::debug!(region = region_code, "Fetched victim feed");
        Ok(payload)
    }
}
