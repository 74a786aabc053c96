//! Reactive wrapper around the query cache

use std::future::Future;

use chrono::TimeDelta;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::api::ApiServices;
use crate::core::http::ApiError;
use crate::core::query::QueryKey;
use crate::ui::auth::{AuthContext, use_auth_context};

/// Signals of one cached query.
pub struct QueryState<T: Send + Sync + 'static> {
    pub data: RwSignal<Option<T>>,
    pub error: RwSignal<Option<String>>,
    pub loading: RwSignal<bool>,
    current: StoredValue<Option<QueryKey>>,
    auth: AuthContext,
}

impl<T: Send + Sync + 'static> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for QueryState<T> {}

impl<T: Send + Sync + 'static> QueryState<T> {
    /// Drop the cached entry and fetch it again.
    pub fn refetch(&self) {
        if let Some(key) = self.current.get_value() {
            self.auth.queries().invalidate(&key);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }
}

/// Key and cache epoch of the last fetch an effect started.
#[derive(Debug, Clone, PartialEq)]
struct FetchMarker {
    key: QueryKey,
    epoch: u64,
}

impl FetchMarker {
    /// A fetch is due only when the key changed or the cache was invalidated.
    fn is_due(previous: Option<&FetchMarker>, next: &FetchMarker) -> bool {
        previous != Some(next)
    }
}

/// Keep `data` in sync with the cache entry named by `source`.
///
/// `source` yields the key and the arguments for `fetcher`, or `None` while
/// the query is disabled. A fetch starts when the key changes or the cache is
/// invalidated; other signal writes seen by `source` are ignored, so a failed
/// query is only retried through `refetch`. Responses for keys that are no
/// longer current are dropped.
pub fn use_query<T, A, S, F, Fut>(source: S, stale_time: TimeDelta, fetcher: F) -> QueryState<T>
where
    T: Clone + Send + Sync + 'static,
    A: 'static,
    S: Fn() -> Option<(QueryKey, A)> + 'static,
    F: Fn(ApiServices, A) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let auth = use_auth_context();
    let state = QueryState {
        data: RwSignal::new(None),
        error: RwSignal::new(None),
        loading: RwSignal::new(false),
        current: StoredValue::new(None),
        auth,
    };

    Effect::new(move |previous: Option<Option<FetchMarker>>| {
        let epoch = auth.query_epoch.get();
        let Some((key, args)) = source() else {
            state.current.set_value(None);
            state.loading.set(false);
            return None;
        };

        let marker = FetchMarker {
            key: key.clone(),
            epoch,
        };
        if !FetchMarker::is_due(previous.flatten().as_ref(), &marker) {
            return Some(marker);
        }

        let changed = state.current.with_value(|current| current.as_ref() != Some(&key));
        if changed {
            state.data.set(None);
        }
        state.current.set_value(Some(key.clone()));
        state.loading.set(true);

        let queries = auth.queries();
        let request = fetcher(auth.services(), args);
        spawn_local(async move {
            let result = queries.fetch(key.clone(), stale_time, move || request).await;
            let still_current = state
                .current
                .try_with_value(|current| current.as_ref() == Some(&key))
                .unwrap_or(false);
            if !still_current {
                return;
            }
            match result {
                Ok(value) => {
                    state.data.set(Some(value));
                    state.error.set(None);
                }
                Err(err) => {
                    leptos::logging::warn!("query {} failed: {}", key, err);
                    state.error.set(Some(err.to_string()));
                }
            }
            state.loading.set(false);
        });

        Some(marker)
    });

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(key: QueryKey, epoch: u64) -> FetchMarker {
        FetchMarker { key, epoch }
    }

    #[test]
    fn test_first_run_fetches() {
        assert!(FetchMarker::is_due(None, &marker(QueryKey::new("emails"), 0)));
    }

    #[test]
    fn test_unrelated_rerun_does_not_refetch() {
        let key = QueryKey::new("emails").with("ms-1").with(1);
        let previous = marker(key.clone(), 3);

        assert!(!FetchMarker::is_due(Some(&previous), &marker(key, 3)));
    }

    #[test]
    fn test_key_change_or_invalidation_refetches() {
        let key = QueryKey::new("emails").with("ms-1").with(1);
        let previous = marker(key.clone(), 3);

        assert!(FetchMarker::is_due(Some(&previous), &marker(key.clone(), 4)));
        assert!(FetchMarker::is_due(Some(&previous), &marker(QueryKey::new("emails").with("ms-1").with(2), 3)));
    }
}
