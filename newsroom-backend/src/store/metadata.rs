use newsroom_types::{ArticleMeta, ArticleUpdate, MetaPatch};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::json_file::{load_or_default, write_atomic};
use super::StoreError;
use crate::gateway::{EventBroadcaster, GatewayEvent};

/// Article id → reader flags, persisted as a single JSON object.
pub struct MetadataStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, ArticleMeta>>,
    broadcaster: Arc<EventBroadcaster>,
}

impl MetadataStore {
    pub fn open(path: &Path, broadcaster: Arc<EventBroadcaster>) -> Self {
        let entries: BTreeMap<String, ArticleMeta> = load_or_default(path);
        log::info!(
            "Loaded metadata for {} article(s) from {}",
            entries.len(),
            path.display()
        );
        Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
            broadcaster,
        }
    }

    /// Current flags for `id`, or the all-false default.
    pub fn get(&self, id: &str) -> ArticleMeta {
        self.entries.lock().get(id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Merge the provided flags into the record for `id` and persist.
    ///
    /// The lock is held across merge and write so concurrent marks cannot
    /// interleave. If the write fails the previous record is restored.
    pub fn set_flags(&self, id: &str, patch: &MetaPatch) -> Result<ArticleMeta, StoreError> {
        let meta = {
            let mut entries = self.entries.lock();
            let previous = entries.get(id).copied();

            let mut meta = previous.unwrap_or_default();
            meta.merge(patch);
            entries.insert(id.to_string(), meta);

            if let Err(e) = write_atomic(&self.path, &*entries) {
                match previous {
                    Some(prev) => entries.insert(id.to_string(), prev),
                    None => entries.remove(id),
                };
                log::error!("Failed to persist metadata for article {}: {}", id, e);
                return Err(e);
            }
            meta
        };

        self.broadcaster.broadcast(GatewayEvent::article_update(&ArticleUpdate {
            id: id.to_string(),
            meta,
        }));
        Ok(meta)
    }
}
