//! Keyed response cache with freshness windows
//!
//! Pages fetch through [`QueryClient::fetch`]; mutations call
//! [`QueryClient::invalidate`] with a key prefix. Every invalidation bumps an
//! epoch that the UI watches to re-run its queries.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::core::http::ApiError;

/// Freshness used when a query names none.
pub const DEFAULT_STALE_TIME: TimeDelta = TimeDelta::seconds(60);
/// Email, conversation and follow-up lists.
pub const LIST_STALE_TIME: TimeDelta = TimeDelta::minutes(5);
/// Digests, conversation analysis and related emails.
pub const ANALYSIS_STALE_TIME: TimeDelta = TimeDelta::minutes(10);

/// Cache key: a root name followed by the request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    pub fn with(mut self, part: impl ToString) -> Self {
        self.0.push(part.to_string());
        self
    }

    /// Append a serializable parameter set as compact JSON.
    pub fn with_json<P: serde::Serialize>(self, params: &P) -> Self {
        let encoded = serde_json::to_string(params).unwrap_or_default();
        self.with(encoded)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: DateTime<Utc>,
}

/// Shared cache; clones point at the same entries.
#[derive(Clone)]
pub struct QueryClient {
    entries: Arc<Mutex<HashMap<QueryKey, Entry>>>,
    epoch: Arc<watch::Sender<u64>>,
}

impl Default for QueryClient {
    fn default() -> Self {
        let (epoch, _) = watch::channel(0);
        Self {
            entries: Arc::default(),
            epoch: Arc::new(epoch),
        }
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.entries.lock().len())
            .field("epoch", &*self.epoch.borrow())
            .finish()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key` if it was stored within `stale_time` of `now`.
    pub fn cached<R>(&self, key: &QueryKey, stale_time: TimeDelta, now: DateTime<Utc>) -> Option<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        if now - entry.fetched_at >= stale_time {
            return None;
        }
        entry.value.downcast_ref::<R>().cloned()
    }

    pub fn store<R>(&self, key: QueryKey, value: R, fetched_at: DateTime<Utc>)
    where
        R: Send + Sync + 'static,
    {
        self.entries.lock().insert(
            key,
            Entry {
                value: Arc::new(value),
                fetched_at,
            },
        );
    }

    /// Fresh cached value, or the fetcher's result. Errors are not cached.
    pub async fn fetch<R, F, Fut>(&self, key: QueryKey, stale_time: TimeDelta, fetcher: F) -> Result<R, ApiError>
    where
        R: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        if let Some(value) = self.cached::<R>(&key, stale_time, Utc::now()) {
            tracing::debug!(%key, "query cache hit");
            return Ok(value);
        }
        let value = fetcher().await?;
        self.store(key, value.clone(), Utc::now());
        Ok(value)
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn invalidate(&self, prefix: &QueryKey) {
        let removed = {
            let mut entries = self.entries.lock();
            let before = entries.len();
            entries.retain(|key, _| !key.starts_with(prefix));
            before - entries.len()
        };
        tracing::debug!(%prefix, removed, "invalidated queries");
        self.epoch.send_modify(|epoch| *epoch += 1);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        self.epoch.send_modify(|epoch| *epoch += 1);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn epoch(&self) -> u64 {
        *self.epoch.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.epoch.subscribe()
    }
}

/// Query keys used across the pages.
pub mod keys {
    use super::QueryKey;
    use crate::core::models::ai::{DigestType, FollowUpFilters};
    use crate::core::models::conversations::ConversationFilters;
    use crate::core::models::emails::EmailFilters;

    pub fn emails_root(ms: &str) -> QueryKey {
        QueryKey::new("emails").with(ms)
    }

    pub fn emails(ms: &str, page: u32, page_size: u32, filters: &EmailFilters) -> QueryKey {
        emails_root(ms).with(page).with(page_size).with_json(filters)
    }

    pub fn email(id: &str) -> QueryKey {
        QueryKey::new("email").with(id)
    }

    pub fn conversations_root(ms: &str) -> QueryKey {
        QueryKey::new("conversations").with(ms)
    }

    pub fn conversations(ms: &str, page: u32, page_size: u32, filters: &ConversationFilters) -> QueryKey {
        conversations_root(ms).with(page).with(page_size).with_json(filters)
    }

    pub fn conversation(ms: &str, id: &str, page: u32, page_size: u32) -> QueryKey {
        QueryKey::new("conversation").with(ms).with(id).with(page).with(page_size)
    }

    pub fn ai_analysis(ms: &str, id: &str) -> QueryKey {
        QueryKey::new("ai-analysis").with(ms).with(id)
    }

    pub fn related_emails(ms: &str, id: &str) -> QueryKey {
        QueryKey::new("related-emails").with(ms).with(id)
    }

    pub fn ai_responses_root(ms: &str) -> QueryKey {
        QueryKey::new("ai-responses").with(ms)
    }

    /// Every response page of one conversation.
    pub fn conversation_responses(ms: &str, id: &str) -> QueryKey {
        ai_responses_root(ms).with(id)
    }

    pub fn ai_responses(ms: &str, id: &str, page: u32, page_size: u32) -> QueryKey {
        conversation_responses(ms, id).with(page).with(page_size)
    }

    pub fn digest_root(ms: &str) -> QueryKey {
        QueryKey::new("ai-digest").with(ms)
    }

    pub fn digest(ms: &str, digest_type: DigestType, range: &str) -> QueryKey {
        digest_root(ms).with(digest_type).with(range)
    }

    pub fn follow_ups(ms: &str, filters: &FollowUpFilters) -> QueryKey {
        QueryKey::new("follow-up-emails").with(ms).with_json(filters)
    }

    pub fn connection_status(user_id: i64) -> QueryKey {
        QueryKey::new("connection-status").with(user_id)
    }

    pub fn optical(report: &str) -> QueryKey {
        QueryKey::new("optical").with(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::core::models::emails::EmailFilters;

    #[test]
    fn test_prefix_matching() {
        let key = keys::emails("ms-1", 2, 25, &EmailFilters::default());
        assert!(key.starts_with(&keys::emails_root("ms-1")));
        assert!(key.starts_with(&QueryKey::new("emails")));
        assert!(!key.starts_with(&keys::emails_root("ms-2")));
        assert!(!keys::emails_root("ms-1").starts_with(&key));
    }

    #[test]
    fn test_filters_are_part_of_key() {
        let plain = keys::emails("ms", 1, 25, &EmailFilters::default());
        let filtered = keys::emails(
            "ms",
            1,
            25,
            &EmailFilters {
                search_text: Some("invoice".to_string()),
                ..EmailFilters::default()
            },
        );
        assert_ne!(plain, filtered);
    }

    #[test]
    fn test_cached_respects_stale_time() {
        let client = QueryClient::new();
        let key = QueryKey::new("stats").with("ms");
        let t0 = Utc::now();
        client.store(key.clone(), 42u32, t0);

        assert_eq!(client.cached::<u32>(&key, DEFAULT_STALE_TIME, t0 + TimeDelta::seconds(59)), Some(42));
        assert_eq!(client.cached::<u32>(&key, DEFAULT_STALE_TIME, t0 + TimeDelta::seconds(60)), None);
        assert_eq!(client.cached::<u32>(&key, LIST_STALE_TIME, t0 + TimeDelta::seconds(60)), Some(42));
        assert_eq!(client.cached::<String>(&key, LIST_STALE_TIME, t0), None);
    }

    #[tokio::test]
    async fn test_fetch_uses_cache_while_fresh() {
        let client = QueryClient::new();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new("email").with("1");

        for _ in 0..3 {
            let value = client
                .fetch(key.clone(), LIST_STALE_TIME, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ApiError>("body".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "body");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let client = QueryClient::new();
        let key = QueryKey::new("email").with("1");

        let err = client
            .fetch::<String, _, _>(key.clone(), LIST_STALE_TIME, || async { Err(ApiError::Timeout) })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Timeout);
        assert!(client.is_empty());

        let value = client
            .fetch(key, LIST_STALE_TIME, || async { Ok::<_, ApiError>(7u8) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_invalidate_drops_prefix_and_bumps_epoch() {
        let client = QueryClient::new();
        let now = Utc::now();
        client.store(keys::ai_responses("ms", "c1", 1, 10), 1u8, now);
        client.store(keys::ai_responses("ms", "c2", 1, 10), 2u8, now);
        client.store(keys::ai_analysis("ms", "c1"), 3u8, now);

        client.invalidate(&keys::ai_responses_root("ms"));

        assert_eq!(client.len(), 1);
        assert_eq!(client.epoch(), 1);
        assert!(client.cached::<u8>(&keys::ai_analysis("ms", "c1"), ANALYSIS_STALE_TIME, now).is_some());
    }

    #[test]
    fn test_invalidate_one_conversation() {
        let client = QueryClient::new();
        let now = Utc::now();
        client.store(keys::ai_responses("ms", "c1", 1, 10), 1u8, now);
        client.store(keys::ai_responses("ms", "c1", 2, 10), 1u8, now);
        client.store(keys::ai_responses("ms", "c2", 1, 10), 2u8, now);

        client.invalidate(&keys::conversation_responses("ms", "c1"));

        assert_eq!(client.len(), 1);
        assert!(client.cached::<u8>(&keys::ai_responses("ms", "c2", 1, 10), LIST_STALE_TIME, now).is_some());
    }

    #[test]
    fn test_clear() {
        let client = QueryClient::new();
        client.store(QueryKey::new("a"), 1u8, Utc::now());
        let rx = client.subscribe();

        client.clear();

        assert!(client.is_empty());
        assert!(rx.has_changed().unwrap());
    }
}
