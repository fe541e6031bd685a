//! Upstream news provider boundary.

use async_trait::async_trait;
use newsroom_types::NewsQuery;
use serde_json::{Map, Value};

use crate::http::shared_client;

const DEFAULT_PAGE: &str = "1";
const DEFAULT_PAGE_SIZE: &str = "20";

/// Which provider listing to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Free-text search, used when `q` is present
    Everything,
    /// Curated top listing
    TopHeadlines,
}

impl SearchMode {
    pub fn for_query(query: &NewsQuery) -> Self {
        if non_empty(&query.q).is_some() {
            SearchMode::Everything
        } else {
            SearchMode::TopHeadlines
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            SearchMode::Everything => "/everything",
            SearchMode::TopHeadlines => "/top-headlines",
        }
    }
}

/// A fully resolved provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub mode: SearchMode,
    pub api_key: String,
    pub params: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Map client query parameters onto provider parameters. Filters are
    /// passed through unmodified; empty values are dropped.
    pub fn build(query: &NewsQuery, api_key: &str) -> Self {
        let mut params = vec![
            (
                "page".to_string(),
                non_empty(&query.page).unwrap_or(DEFAULT_PAGE).to_string(),
            ),
            (
                "pageSize".to_string(),
                non_empty(&query.page_size).unwrap_or(DEFAULT_PAGE_SIZE).to_string(),
            ),
        ];

        let optional = [
            ("q", &query.q),
            ("sources", &query.sources),
            ("category", &query.category),
            ("country", &query.country),
            ("sortBy", &query.sort_by),
        ];
        for (name, value) in optional {
            if let Some(value) = non_empty(value) {
                params.push((name.to_string(), value.to_string()));
            }
        }

        Self {
            mode: SearchMode::for_query(query),
            api_key: api_key.to_string(),
            params,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Source of raw search results. Returns the provider's top-level JSON object.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Map<String, Value>, String>;
}

/// NewsAPI-compatible HTTP provider.
pub struct NewsApiClient {
    base_url: String,
}

impl NewsApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, mode: SearchMode) -> String {
        format!("{}{}", self.base_url, mode.path())
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Map<String, Value>, String> {
        let url = self.endpoint(request.mode);

        let response = shared_client()
            .get(&url)
            .header("X-Api-Key", &request.api_key)
            .query(&request.params)
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("{} returned HTTP {}: {}", url, status.as_u16(), body));
        }

        match response.json::<Value>().await {
            Ok(Value::Object(body)) => Ok(body),
            Ok(other) => Err(format!("{} returned non-object JSON: {}", url, other)),
            Err(e) => Err(format!("{} returned invalid JSON: {}", url, e)),
        }
    }
}
