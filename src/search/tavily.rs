use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{SearchConfig, SearchDepth};
use crate::search::{SearchError, SearchProvider};
use crate::types::source::RawSource;

/// Tavily 搜索接口
pub struct TavilyProvider {
    api_key: String,
    api_base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TavilySearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    max_results: usize,
}

#[derive(Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<RawSource>,
}

impl TavilyProvider {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        if config.api_key.trim().is_empty() {
            return Err(SearchError::NotConfigured(
                "TAVILY_API_KEY is not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<Vec<RawSource>, SearchError> {
        tracing::debug!("🔍 API CALL: '{}' ({}, {})", query, depth, max_results);

        let resp = self
            .client
            .post(format!("{}/search", self.api_base_url))
            .json(&TavilySearchRequest {
                api_key: &self.api_key,
                query,
                search_depth: depth,
                max_results,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let search_resp: TavilySearchResponse = resp.json().await?;
        Ok(search_resp.results)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
