//! Watch progress history
//!
//! A single list under `watch_history`, most recent first, at most one
//! record per content id and at most `limit` records.

use std::sync::Arc;
use tracing::{debug, info};

use super::{load_or_default, save_logged, KeyValueStore};
use crate::models::WatchProgressRecord;

/// Storage key of the history list
pub const HISTORY_KEY: &str = "watch_history";

/// Default number of records kept
pub const DEFAULT_HISTORY_LIMIT: usize = 40;

/// Resume points for recently watched titles
#[derive(Clone)]
pub struct WatchProgressStore {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl std::fmt::Debug for WatchProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchProgressStore")
            .field("limit", &self.limit)
            .finish()
    }
}

impl WatchProgressStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limit(store, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    /// Every record, most recent first
    pub fn list(&self) -> Vec<WatchProgressRecord> {
        load_or_default(self.store.as_ref(), HISTORY_KEY)
    }

    pub fn get(&self, content_id: &str) -> Option<WatchProgressRecord> {
        self.list().into_iter().find(|r| r.content_id == content_id)
    }

    /// Insert or replace the record for its content id and move it to the front
    pub fn save(&self, record: WatchProgressRecord) {
        let mut records = self.list();
        records.retain(|r| r.content_id != record.content_id);
        info!(
            content_id = %record.content_id,
            position = record.last_position_secs,
            "saving watch progress"
        );
        records.insert(0, record);
        records.truncate(self.limit);
        save_logged(self.store.as_ref(), HISTORY_KEY, &records);
    }

    /// Drop the record for `content_id`; returns whether one existed
    pub fn remove(&self, content_id: &str) -> bool {
        let mut records = self.list();
        let before = records.len();
        records.retain(|r| r.content_id != content_id);
        if records.len() == before {
            return false;
        }
        debug!(content_id, "removing watch progress");
        save_logged(self.store.as_ref(), HISTORY_KEY, &records);
        true
    }

    pub fn clear(&self) {
        save_logged(self.store.as_ref(), HISTORY_KEY, &Vec::<WatchProgressRecord>::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentKind;
    use crate::storage::MemoryStore;

    fn record(id: &str, pos: f64) -> WatchProgressRecord {
        WatchProgressRecord {
            content_id: id.into(),
            display_name: format!("Title {}", id),
            thumbnail_url: None,
            container_format: Some("mp4".into()),
            last_position_secs: pos,
            duration_secs: 3600.0,
            saved_at: 0,
            content_kind: ContentKind::Movie,
            series_id: None,
            season_number: None,
            episode_number: None,
        }
    }

    fn store() -> WatchProgressStore {
        WatchProgressStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_save_puts_newest_first() {
        let s = store();
        s.save(record("a", 10.0));
        s.save(record("b", 20.0));
        let ids: Vec<_> = s.list().into_iter().map(|r| r.content_id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_save_dedupes_by_content_id() {
        let s = store();
        s.save(record("a", 10.0));
        s.save(record("b", 20.0));
        s.save(record("a", 99.0));
        let list = s.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].content_id, "a");
        assert_eq!(list[0].last_position_secs, 99.0);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let s = WatchProgressStore::with_limit(Arc::new(MemoryStore::new()), 3);
        for id in ["1", "2", "3", "4"] {
            s.save(record(id, 1.0));
        }
        let ids: Vec<_> = s.list().into_iter().map(|r| r.content_id).collect();
        assert_eq!(ids, vec!["4", "3", "2"]);
    }

    #[test]
    fn test_remove() {
        let s = store();
        s.save(record("a", 10.0));
        assert!(s.remove("a"));
        assert!(!s.remove("a"));
        assert!(s.get("a").is_none());
    }

    #[test]
    fn test_unreadable_history_is_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(HISTORY_KEY, "garbage").unwrap();
        let s = WatchProgressStore::new(backend);
        assert!(s.list().is_empty());
        s.save(record("a", 5.0));
        assert_eq!(s.list().len(), 1);
    }
}
