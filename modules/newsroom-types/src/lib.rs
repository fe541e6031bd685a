//! Shared wire types for the newsroom backend and its clients.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =====================================================
// Article annotations
// =====================================================

/// Per-article flags set by readers. Absent records read as the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMeta {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub relevant: bool,
}

impl ArticleMeta {
    /// Apply only the flags present in `patch`.
    pub fn merge(&mut self, patch: &MetaPatch) {
        if let Some(read) = patch.read {
            self.read = read;
        }
        if let Some(relevant) = patch.relevant {
            self.relevant = relevant;
        }
    }
}

/// Partial flag update. Values that are not JSON booleans are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaPatch {
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub relevant: Option<bool>,
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_bool()))
}

/// Payload of the `article:update` event and of the mark endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub id: String,
    pub meta: ArticleMeta,
}

// =====================================================
// Comments
// =====================================================

/// A reader comment attached to an article. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub article_id: String,
    pub author: String,
    pub text: String,
    pub created_at: String,
}

/// Body of `POST /api/comments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub article_id: Option<String>,
    pub author: Option<String>,
    pub text: Option<String>,
}

// =====================================================
// News search
// =====================================================

/// Query parameters accepted by `GET /api/news`, passed through to the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub sources: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub country: Option<String>,
    pub sort_by: Option<String>,
}

/// An upstream article with its derived identity and current annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedArticle {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub meta: ArticleMeta,
}

/// Aggregated search result: annotated articles plus the provider's own
/// top-level fields (status, totalResults, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub articles: Vec<AnnotatedArticle>,
    #[serde(flatten)]
    pub upstream: Map<String, Value>,
}
