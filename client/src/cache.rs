//! Keyed cache of in-flight and completed fetches.
//!
//! The cache exists for two reasons: identical logical queries must not
//! trigger duplicate network round-trips, and reads must be forceable back
//! to the network after a write. There is no implicit time-based expiry —
//! freshness is managed purely by explicit invalidation.
//!
//! Concurrent reads for the same key are coalesced onto one shared future,
//! so every caller observes the same result, success or failure. Successful
//! results are cached; failures are handed to every waiter and forgotten. A
//! transient (network) failure is retried once inside the fetch, which means
//! coalesced waiters share the retried outcome too.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use log::debug;

use crate::error::ApiError;

type SharedFetch<V> = Shared<LocalBoxFuture<'static, Result<V, ApiError>>>;

enum Entry<V> {
    Ready(V),
    Pending { id: u64, task: SharedFetch<V> },
}

/// An explicitly constructed, single-threaded query cache.
///
/// Each orchestrator owns its own instances — there is no global cache, so
/// tests get isolation for free by building a fresh one.
pub struct QueryCache<K, V> {
    entries: Rc<RefCell<HashMap<K, Entry<V>>>>,
    next_fetch_id: Rc<Cell<u64>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(HashMap::new())),
            next_fetch_id: Rc::new(Cell::new(0)),
        }
    }

    /// Resolves `key` from the cache, coalescing onto an in-flight fetch or
    /// issuing a new one through `fetcher`.
    ///
    /// `fetcher` may be called twice for a single logical read: once, plus
    /// one retry when the first attempt fails transiently.
    pub fn fetch<F>(&self, key: K, fetcher: F) -> impl Future<Output = Result<V, ApiError>>
    where
        F: Fn() -> LocalBoxFuture<'static, Result<V, ApiError>> + 'static,
    {
        let entries = Rc::clone(&self.entries);
        let next_fetch_id = Rc::clone(&self.next_fetch_id);
        async move {
            let in_flight = {
                let map = entries.borrow();
                match map.get(&key) {
                    Some(Entry::Ready(value)) => return Ok(value.clone()),
                    Some(Entry::Pending { task, .. }) => Some(task.clone()),
                    None => None,
                }
            };
            if let Some(task) = in_flight {
                return task.await;
            }

            let id = next_fetch_id.get();
            next_fetch_id.set(id + 1);

            let task = {
                let entries = Rc::clone(&entries);
                let key = key.clone();
                async move {
                    let mut result = fetcher().await;
                    if result.as_ref().is_err_and(ApiError::is_transient) {
                        debug!("transient fetch failure, retrying once");
                        result = fetcher().await;
                    }

                    // Publish only if this fetch is still the current entry;
                    // an invalidation that landed mid-flight must not be
                    // overwritten by a stale completion.
                    let mut map = entries.borrow_mut();
                    let current = matches!(
                        map.get(&key),
                        Some(Entry::Pending { id: current, .. }) if *current == id
                    );
                    if current {
                        match &result {
                            Ok(value) => {
                                map.insert(key.clone(), Entry::Ready(value.clone()));
                            }
                            Err(_) => {
                                map.remove(&key);
                            }
                        }
                    }
                    result
                }
            }
            .boxed_local()
            .shared();

            entries.borrow_mut().insert(
                key.clone(),
                Entry::Pending {
                    id,
                    task: task.clone(),
                },
            );
            task.await
        }
    }

    /// Marks `key` stale: the next read goes to the network. In-flight
    /// waiters still receive their result, but it will not be cached.
    pub fn invalidate(&self, key: &K) {
        self.entries.borrow_mut().remove(key);
    }

    /// Drops every entry, fresh and in-flight alike.
    pub fn invalidate_all(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::join;

    fn counting_fetcher(
        calls: Rc<Cell<u32>>,
        result: Result<u32, ApiError>,
    ) -> impl Fn() -> LocalBoxFuture<'static, Result<u32, ApiError>> {
        move || {
            calls.set(calls.get() + 1);
            let result = result.clone();
            async move { result }.boxed_local()
        }
    }

    #[tokio::test]
    async fn concurrent_reads_for_one_key_issue_one_fetch() {
        let cache: QueryCache<&str, u32> = QueryCache::new();
        let calls = Rc::new(Cell::new(0u32));
        let (tx, rx) = oneshot::channel::<u32>();
        let rx = Rc::new(RefCell::new(Some(rx)));

        let fetcher = {
            let calls = Rc::clone(&calls);
            let rx = Rc::clone(&rx);
            move || {
                calls.set(calls.get() + 1);
                let rx = rx.borrow_mut().take().expect("fetcher called twice");
                async move { Ok(rx.await.expect("gate dropped")) }.boxed_local()
            }
        };

        let first = cache.fetch("defs", fetcher);
        let second = cache.fetch("defs", {
            let calls = Rc::clone(&calls);
            move || {
                calls.set(calls.get() + 1);
                async move { unreachable!("coalesced caller must not fetch") }.boxed_local()
            }
        });

        let (a, b, _) = join!(first, second, async move {
            tx.send(7).ok();
        });
        assert_eq!(a, Ok(7));
        assert_eq!(b, Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn cached_result_suppresses_refetch_until_invalidated() {
        let cache: QueryCache<&str, u32> = QueryCache::new();
        let calls = Rc::new(Cell::new(0u32));
        let fetcher = counting_fetcher(Rc::clone(&calls), Ok(1));

        assert_eq!(cache.fetch("defs", fetcher).await, Ok(1));
        let fetcher = counting_fetcher(Rc::clone(&calls), Ok(2));
        assert_eq!(cache.fetch("defs", fetcher).await, Ok(1));
        assert_eq!(calls.get(), 1);

        cache.invalidate(&"defs");
        let fetcher = counting_fetcher(Rc::clone(&calls), Ok(2));
        assert_eq!(cache.fetch("defs", fetcher).await, Ok(2));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn transient_failures_retry_once_and_are_not_cached() {
        let cache: QueryCache<&str, u32> = QueryCache::new();
        let calls = Rc::new(Cell::new(0u32));
        let fetcher = counting_fetcher(
            Rc::clone(&calls),
            Err(ApiError::Network("connection reset".to_string())),
        );

        let result = cache.fetch("defs", fetcher).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(calls.get(), 2, "one attempt plus one retry");

        // the failure was not cached, so a later read fetches again
        let fetcher = counting_fetcher(Rc::clone(&calls), Ok(5));
        assert_eq!(cache.fetch("defs", fetcher).await, Ok(5));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn non_transient_failures_are_not_retried() {
        let cache: QueryCache<&str, u32> = QueryCache::new();
        let calls = Rc::new(Cell::new(0u32));
        let fetcher = counting_fetcher(
            Rc::clone(&calls),
            Err(ApiError::Service {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        let result = cache.fetch("defs", fetcher).await;
        assert!(matches!(result, Err(ApiError::Service { .. })));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn completion_after_invalidation_does_not_resurrect_the_entry() {
        let cache: QueryCache<&str, u32> = QueryCache::new();
        let (tx, rx) = oneshot::channel::<u32>();
        let rx = Rc::new(RefCell::new(Some(rx)));

        let gated = cache.fetch("defs", {
            let rx = Rc::clone(&rx);
            move || {
                let rx = rx.borrow_mut().take().expect("fetcher called twice");
                async move { Ok(rx.await.expect("gate dropped")) }.boxed_local()
            }
        });

        let (stale, _) = join!(gated, async {
            cache.invalidate(&"defs");
            tx.send(1).ok();
        });
        // the in-flight waiter still gets its result
        assert_eq!(stale, Ok(1));

        // but the cache stayed empty: the next read fetches fresh data
        let calls = Rc::new(Cell::new(0u32));
        let fetcher = counting_fetcher(Rc::clone(&calls), Ok(2));
        assert_eq!(cache.fetch("defs", fetcher).await, Ok(2));
        assert_eq!(calls.get(), 1);
    }
}
