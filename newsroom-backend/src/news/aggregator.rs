//! News aggregation: cache lookup, provider fetch, identity resolution and
//! annotation merge.

use newsroom_types::{AnnotatedArticle, NewsQuery, NewsResponse};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::provider::{NewsProvider, UpstreamRequest};
use crate::cache::ResponseCache;
use crate::error::ApiError;
use crate::identity;
use crate::store::MetadataStore;

pub struct NewsAggregator {
    provider: Arc<dyn NewsProvider>,
    api_key: Option<String>,
    cache: ResponseCache,
    metadata: Arc<MetadataStore>,
}

impl NewsAggregator {
    pub fn new(
        provider: Arc<dyn NewsProvider>,
        api_key: Option<String>,
        cache: ResponseCache,
        metadata: Arc<MetadataStore>,
    ) -> Self {
        Self {
            provider,
            api_key,
            cache,
            metadata,
        }
    }

    /// Search the provider, annotating each article with its id and flags.
    ///
    /// `raw_query` is the request query string as received and keys the
    /// cache. A cached response is returned untouched, even if flags for its
    /// articles have changed since it was stored.
    pub async fn query(&self, raw_query: &str, query: &NewsQuery) -> Result<Arc<NewsResponse>, ApiError> {
        let key = ResponseCache::key_for(raw_query);

        if let Some(hit) = self.cache.get(&key).await {
            log::debug!("[NEWS] Cache hit for '{}'", key);
            return Ok(hit);
        }

        log::debug!("[NEWS] Cache miss for '{}'", key);
        self.cache
            .get_or_try_insert(key, self.fetch_annotated(query))
            .await
    }

    async fn fetch_annotated(&self, query: &NewsQuery) -> Result<Arc<NewsResponse>, ApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Config("NEWSAPI_KEY not configured".to_string()))?;

        let request = UpstreamRequest::build(query, api_key);
        let mut body = self.provider.fetch(&request).await.map_err(|cause| {
            log::error!("[NEWS] Upstream {:?} request failed: {}", request.mode, cause);
            ApiError::Upstream(cause)
        })?;

        let raw_articles = match body.remove("articles") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        let articles: Vec<AnnotatedArticle> = raw_articles
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(self.annotate(fields)),
                _ => None,
            })
            .collect();

        log::info!(
            "[NEWS] Fetched {} article(s) via {:?}",
            articles.len(),
            request.mode
        );

        Ok(Arc::new(NewsResponse {
            articles,
            upstream: body,
        }))
    }

    fn annotate(&self, mut fields: Map<String, Value>) -> AnnotatedArticle {
        let id = identity::resolve(&fields);
        // Derived fields take precedence over anything the provider sent
        fields.remove("id");
        fields.remove("meta");
        let meta = self.metadata.get(&id);
        AnnotatedArticle { id, fields, meta }
    }
}
