//! Web search for the researcher agent, backed by the Tavily search API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::contract::{SearchHit, WebSearch};
use crate::error::SearchError;
use crate::settings::Secret;

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_MAX_RESULTS: u8 = 5;

pub struct TavilySearch {
    http: reqwest::Client,
    api_key: Secret,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilySearch {
    pub fn new(http: reqwest::Client, api_key: Secret, base_url: Option<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

fn into_hits(body: TavilyResponse) -> Vec<SearchHit> {
    body.results
        .into_iter()
        .map(|r| SearchHit {
            title: r.title,
            url: r.url,
            content: r.content,
        })
        .collect()
}

#[async_trait]
impl WebSearch for TavilySearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        info!(query, max_results = DEFAULT_MAX_RESULTS, "Running web search");
        let resp = self
            .http
            .post(format!("{}/search", self.base_url.trim_end_matches('/')))
            .json(&json!({
                "api_key": self.api_key.expose(),
                "query": query,
                "max_results": DEFAULT_MAX_RESULTS,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Web search rejected");
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let body: TavilyResponse = resp.json().await?;
        let hits = into_hits(body);
        info!(count = hits.len(), "Web search returned results");
        Ok(hits)
    }
}

/// Renders search hits as a numbered reference list for a prompt.
pub fn render_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| format!("{}. {} ({})\n   {}", i + 1, hit.title, hit.url, hit.content.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
