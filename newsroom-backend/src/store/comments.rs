use chrono::{SecondsFormat, Utc};
use newsroom_types::{Comment, NewComment};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::json_file::{load_or_default, write_atomic};
use super::StoreError;
use crate::error::ApiError;
use crate::gateway::{EventBroadcaster, GatewayEvent};

const DEFAULT_AUTHOR: &str = "Anon";

struct CommentLog {
    comments: Vec<Comment>,
    /// Highest numeric id handed out so far
    last_id: u64,
}

/// Append-only comment list, persisted as a JSON array in insertion order.
pub struct CommentStore {
    path: PathBuf,
    state: Mutex<CommentLog>,
    broadcaster: Arc<EventBroadcaster>,
}

impl CommentStore {
    pub fn open(path: &Path, broadcaster: Arc<EventBroadcaster>) -> Self {
        let comments: Vec<Comment> = load_or_default(path);
        let last_id = comments
            .iter()
            .filter_map(|c| c.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        log::info!("Loaded {} comment(s) from {}", comments.len(), path.display());

        Self {
            path: path.to_path_buf(),
            state: Mutex::new(CommentLog { comments, last_id }),
            broadcaster,
        }
    }

    /// All comments, or only those for `article_id`, oldest first.
    pub fn list(&self, article_id: Option<&str>) -> Vec<Comment> {
        let state = self.state.lock();
        match article_id {
            Some(article_id) => state
                .comments
                .iter()
                .filter(|c| c.article_id == article_id)
                .cloned()
                .collect(),
            None => state.comments.clone(),
        }
    }

    /// Validate, store, persist and announce a new comment.
    pub fn append(&self, input: NewComment) -> Result<Comment, ApiError> {
        let (Some(article_id), Some(text)) = (
            input.article_id.filter(|s| !s.is_empty()),
            input.text.filter(|s| !s.is_empty()),
        ) else {
            return Err(ApiError::Validation("articleId and text required".to_string()));
        };
        let author = input
            .author
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        let comment = {
            let mut state = self.state.lock();
            let now = Utc::now();
            // Millisecond timestamp, bumped past the last id when the clock has not moved
            let Some(next_id) = state.last_id.checked_add(1) else {
                log::error!("Comment ids in {} are exhausted", self.path.display());
                return Err(StoreError::new(&self.path, "comment id space exhausted").into());
            };
            let id = (now.timestamp_millis().max(0) as u64).max(next_id);

            let comment = Comment {
                id: id.to_string(),
                article_id,
                author,
                text,
                created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            };
            state.comments.push(comment.clone());

            if let Err(e) = write_atomic(&self.path, &state.comments) {
                state.comments.pop();
                log::error!("Failed to persist comment for article {}: {}", comment.article_id, e);
                return Err(e.into());
            }
            state.last_id = id;
            comment
        };

        self.broadcaster.broadcast(GatewayEvent::comment(&comment));
        Ok(comment)
    }
}
