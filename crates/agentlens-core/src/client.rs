//! HTTP client for the three read-only analytics endpoints
//!
//! Thin wrapper over a shared reqwest::Client. Transport failures,
//! non-success statuses and undecodable bodies each map to their own
//! `CoreError` variant; the poller collapses them into one "cycle failed"
//! outcome because all three responses are required for a snapshot.

use crate::error::CoreError;
use crate::models::{CostBreakdown, RealtimeSnapshot, TrailingWindow, TrendSeries};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the analytics service
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalyticsClient {
    /// Create a client with a per-request timeout
    ///
    /// `base_url` is the service root, e.g. `http://localhost:8000/api/v1`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| CoreError::ClientBuild { source })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create with the default timeout
    pub fn with_defaults(base_url: impl Into<String>) -> Result<Self, CoreError> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Real-time counters: `GET /analytics/{agent_id}/realtime`
    pub async fn realtime(&self, agent_id: &str) -> Result<RealtimeSnapshot, CoreError> {
        let url = format!("{}/analytics/{}/realtime", self.base_url, agent_id);
        self.get_json(url).await
    }

    /// Trend series: `GET /analytics/{agent_id}/trends?days={n}`
    pub async fn trends(
        &self,
        agent_id: &str,
        window: TrailingWindow,
    ) -> Result<TrendSeries, CoreError> {
        let url = format!(
            "{}/analytics/{}/trends?days={}",
            self.base_url,
            agent_id,
            window.days()
        );
        self.get_json(url).await
    }

    /// Cost breakdown: `GET /analytics/{agent_id}/costs?days={n}`
    pub async fn costs(
        &self,
        agent_id: &str,
        window: TrailingWindow,
    ) -> Result<CostBreakdown, CoreError> {
        let url = format!(
            "{}/analytics/{}/costs?days={}",
            self.base_url,
            agent_id,
            window.days()
        );
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, CoreError> {
        debug!(%url, "Fetching");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| CoreError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::UnexpectedStatus { url, status });
        }

        response
            .json()
            .await
            .map_err(|source| CoreError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AnalyticsClient::with_defaults("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/api/v1");
    }
}
