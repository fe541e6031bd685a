//! Stable article identifiers.
//!
//! The provider does not assign ids, so one is derived from the article's
//! canonical field: its URL, else its title, else the whole record.

use md5::{Digest, Md5};
use std::collections::BTreeMap;
use serde_json::{Map, Value};

/// Derive the id for an upstream article.
pub fn resolve(article: &Map<String, Value>) -> String {
    let canonical = match non_empty_str(article, "url").or_else(|| non_empty_str(article, "title")) {
        Some(field) => field.to_string(),
        // Map order depends on serde_json's `preserve_order` feature, which any
        // crate in the build can turn on; sort so the digest never changes
        None => serde_json::to_string(&article.iter().collect::<BTreeMap<_, _>>())
            .unwrap_or_default(),
    };
    hex::encode(Md5::digest(canonical.as_bytes()))
}

fn non_empty_str<'a>(article: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    article
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
