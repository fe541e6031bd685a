//! In-process provider used by tests in place of the network.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::provider::{NewsProvider, UpstreamRequest};

pub struct StubProvider {
    response: Result<Map<String, Value>, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<UpstreamRequest>>,
}

impl StubProvider {
    pub fn returning(body: Value) -> Self {
        Self {
            response: Ok(body.as_object().cloned().unwrap_or_default()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(cause: &str) -> Self {
        Self {
            response: Err(cause.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<UpstreamRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsProvider for StubProvider {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Map<String, Value>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.response.clone()
    }
}

pub const FIRST_URL: &str = "https://example.com/elecciones-1";
pub const SECOND_URL: &str = "https://example.com/elecciones-2";

/// Provider body with two articles, shaped like a NewsAPI `everything` reply.
pub fn two_articles() -> Value {
    json!({
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": {"id": null, "name": "Diario Uno"},
                "title": "Elecciones: primeros resultados",
                "url": FIRST_URL,
                "description": "Cobertura en vivo",
                "publishedAt": "2024-10-27T21:00:00Z"
            },
            {
                "source": {"id": "dos", "name": "Diario Dos"},
                "title": "Elecciones: participación récord",
                "url": SECOND_URL,
                "description": null,
                "publishedAt": "2024-10-27T22:30:00Z"
            }
        ]
    })
}
