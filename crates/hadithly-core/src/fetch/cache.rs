//! Memoizing fetch cache with request coalescing
//!
//! Pages are keyed by (collection, book, page) and kept for the life of the
//! process; there is no expiry beyond `invalidate`/`clear`. Language is
//! deliberately not part of the key: every cached record carries all
//! language variants, so changing the display language can never serve a
//! stale page.
//!
//! Concurrent requests for the same key coalesce onto one outbound fetch:
//! the first caller spawns the fetch and every caller (including the first)
//! waits on a broadcast channel for its result. Because the fetch runs as
//! its own task, a caller that loses interest does not cancel it; the page
//! still lands in the cache for the next reader.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::debug;

use crate::fetch::client::RemoteSource;
use crate::fetch::FetchError;
use crate::models::Hadith;

/// Composite cache key for one remote page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    /// Collection name, lowercased (lookups are case-insensitive)
    pub collection: String,
    pub book_number: u32,
    pub page: u32,
}

impl PageKey {
    pub fn new(collection: &str, book_number: u32, page: u32) -> Self {
        Self {
            collection: collection.to_lowercase(),
            book_number,
            page,
        }
    }
}

impl std::fmt::Display for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.collection, self.book_number, self.page)
    }
}

type PageResult = Result<Vec<Hadith>, FetchError>;

/// Remote page cache with single-flight request coalescing
pub struct FetchCache<S: RemoteSource> {
    inner: Arc<Inner<S>>,
}

impl<S: RemoteSource> Clone for FetchCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    source: S,
    /// Completed pages, process-lifetime
    pages: RwLock<HashMap<PageKey, Vec<Hadith>>>,
    /// One broadcast channel per key currently being fetched
    in_flight: Mutex<HashMap<PageKey, broadcast::Sender<PageResult>>>,
}

impl<S: RemoteSource> FetchCache<S> {
    /// Create a cache over the given remote source
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                pages: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Fetch one page, memoized by (collection, book, page)
    ///
    /// A hit is served without network access. On a miss, exactly one
    /// outbound fetch runs per distinct key regardless of how many callers
    /// are waiting; they all receive the same result or the same failure.
    /// A failure leaves no cache entry, so the next call retries.
    pub async fn fetch_page(
        &self,
        collection: &str,
        book_number: u32,
        page: u32,
    ) -> PageResult {
        let key = PageKey::new(collection, book_number, page);

        if let Some(hit) = self.inner.pages.read().await.get(&key) {
            debug!(key = %key, "page cache hit");
            return Ok(hit.clone());
        }

        let mut rx = {
            let mut in_flight = self.inner.in_flight.lock().await;

            // A flight may have landed while we waited for the lock
            if let Some(hit) = self.inner.pages.read().await.get(&key) {
                return Ok(hit.clone());
            }

            if let Some(tx) = in_flight.get(&key) {
                debug!(key = %key, "joining in-flight fetch");
                tx.subscribe()
            } else {
                debug!(key = %key, "starting fetch");
                let (tx, rx) = broadcast::channel(1);
                in_flight.insert(key.clone(), tx);

                let inner = Arc::clone(&self.inner);
                let flight_key = key.clone();
                tokio::spawn(async move {
                    inner.complete_fetch(flight_key).await;
                });
                rx
            }
        };

        match rx.recv().await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Aborted {
                key: key.to_string(),
            }),
        }
    }

    /// Fetch a single hadith, always bypassing the cache
    pub async fn fetch_random(&self, collection: &str) -> Result<Hadith, FetchError> {
        self.inner.source.fetch_random(collection).await
    }

    /// Drop one cached page
    pub async fn invalidate(&self, collection: &str, book_number: u32, page: u32) {
        let key = PageKey::new(collection, book_number, page);
        if self.inner.pages.write().await.remove(&key).is_some() {
            debug!(key = %key, "page invalidated");
        }
    }

    /// Drop every cached page
    pub async fn clear(&self) {
        self.inner.pages.write().await.clear();
    }

    /// Number of pages currently cached
    pub async fn cached_pages(&self) -> usize {
        self.inner.pages.read().await.len()
    }
}

impl<S: RemoteSource> Inner<S> {
    /// Run the outbound fetch for a key and hand the result to every waiter
    async fn complete_fetch(&self, key: PageKey) {
        let result = self
            .source
            .fetch_page(&key.collection, key.book_number, key.page)
            .await;

        if let Ok(hadiths) = &result {
            self.pages
                .write()
                .await
                .insert(key.clone(), hadiths.clone());
        }

        let mut in_flight = self.in_flight.lock().await;
        if let Some(tx) = in_flight.remove(&key) {
            // Send can only fail if every waiter already went away
            let _ = tx.send(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory source that counts outbound fetches
    struct MockSource {
        page_calls: Arc<AtomicUsize>,
        random_calls: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
        delay: Duration,
    }

    impl MockSource {
        fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>, Arc<AtomicBool>) {
            let page_calls = Arc::new(AtomicUsize::new(0));
            let random_calls = Arc::new(AtomicUsize::new(0));
            let fail = Arc::new(AtomicBool::new(false));
            let source = Self {
                page_calls: Arc::clone(&page_calls),
                random_calls: Arc::clone(&random_calls),
                fail: Arc::clone(&fail),
                delay: Duration::from_millis(30),
            };
            (source, page_calls, random_calls, fail)
        }

        fn hadith(collection: &str, book_number: u32, number: u32) -> Hadith {
            let mut text = BTreeMap::new();
            text.insert(Language::Arabic, format!("نص {}", number));
            Hadith::new(
                format!("{}-{}-{}", collection, book_number, number),
                collection,
                book_number,
                number,
                text,
            )
        }
    }

    impl RemoteSource for MockSource {
        async fn fetch_page(
            &self,
            collection: &str,
            book_number: u32,
            page: u32,
        ) -> Result<Vec<Hadith>, FetchError> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;

            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Http {
                    status: 503,
                    url: format!("mock://{}/{}/{}", collection, book_number, page),
                });
            }
            Ok(vec![Self::hadith(collection, book_number, page)])
        }

        async fn fetch_random(&self, collection: &str) -> Result<Hadith, FetchError> {
            self.random_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::hadith(collection, 1, 1))
        }
    }

    #[tokio::test]
    async fn test_hit_serves_from_cache() {
        let (source, page_calls, _, _) = MockSource::new();
        let cache = FetchCache::new(source);

        let first = cache.fetch_page("bukhari", 1, 1).await.unwrap();
        let second = cache.fetch_page("bukhari", 1, 1).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(page_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.cached_pages().await, 1);
    }

    #[tokio::test]
    async fn test_key_is_case_insensitive() {
        let (source, page_calls, _, _) = MockSource::new();
        let cache = FetchCache::new(source);

        cache.fetch_page("Bukhari", 1, 1).await.unwrap();
        cache.fetch_page("bukhari", 1, 1).await.unwrap();

        assert_eq!(page_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_same_key_single_flight() {
        let (source, page_calls, _, _) = MockSource::new();
        let cache = FetchCache::new(source);

        let (a, b) = tokio::join!(
            cache.fetch_page("bukhari", 1, 1),
            cache.fetch_page("bukhari", 1, 1)
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(page_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_different_keys_fetch_separately() {
        let (source, page_calls, _, _) = MockSource::new();
        let cache = FetchCache::new(source);

        let (a, b) = tokio::join!(
            cache.fetch_page("bukhari", 1, 1),
            cache.fetch_page("bukhari", 1, 2)
        );

        assert_ne!(a.unwrap(), b.unwrap());
        assert_eq!(page_calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.cached_pages().await, 2);
    }

    #[tokio::test]
    async fn test_failure_reaches_all_waiters_and_leaves_no_entry() {
        let (source, page_calls, _, fail) = MockSource::new();
        fail.store(true, Ordering::SeqCst);
        let cache = FetchCache::new(source);

        let (a, b) = tokio::join!(
            cache.fetch_page("bukhari", 1, 1),
            cache.fetch_page("bukhari", 1, 1)
        );

        assert!(matches!(a, Err(FetchError::Http { status: 503, .. })));
        assert!(matches!(b, Err(FetchError::Http { status: 503, .. })));
        assert_eq!(page_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.cached_pages().await, 0);

        // Next call retries and succeeds
        fail.store(false, Ordering::SeqCst);
        cache.fetch_page("bukhari", 1, 1).await.unwrap();
        assert_eq!(page_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_abandoned_caller_still_populates_cache() {
        let (source, page_calls, _, _) = MockSource::new();
        let cache = FetchCache::new(source);

        // Drop the caller before the fetch completes
        let started = cache.fetch_page("bukhari", 1, 1);
        tokio::select! {
            _ = started => {}
            _ = tokio::time::sleep(Duration::from_millis(5)) => {}
        }

        // The spawned flight finishes on its own
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.cached_pages().await, 1);

        cache.fetch_page("bukhari", 1, 1).await.unwrap();
        assert_eq!(page_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_drops_one_entry() {
        let (source, page_calls, _, _) = MockSource::new();
        let cache = FetchCache::new(source);

        cache.fetch_page("bukhari", 1, 1).await.unwrap();
        cache.fetch_page("bukhari", 1, 2).await.unwrap();

        cache.invalidate("bukhari", 1, 1).await;
        assert_eq!(cache.cached_pages().await, 1);

        cache.fetch_page("bukhari", 1, 1).await.unwrap();
        cache.fetch_page("bukhari", 1, 2).await.unwrap();
        assert_eq!(page_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let (source, page_calls, _, _) = MockSource::new();
        let cache = FetchCache::new(source);

        cache.fetch_page("bukhari", 1, 1).await.unwrap();
        cache.fetch_page("muslim", 1, 1).await.unwrap();
        cache.clear().await;
        assert_eq!(cache.cached_pages().await, 0);

        cache.fetch_page("bukhari", 1, 1).await.unwrap();
        assert_eq!(page_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_random_bypasses_cache() {
        let (source, page_calls, random_calls, _) = MockSource::new();
        let cache = FetchCache::new(source);

        cache.fetch_random("bukhari").await.unwrap();
        cache.fetch_random("bukhari").await.unwrap();

        assert_eq!(random_calls.load(Ordering::SeqCst), 2);
        assert_eq!(page_calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.cached_pages().await, 0);
    }
}
