//! Trait definition for the lyrics API client.
//!
//! The resolver only talks to [`LyricsApi`], so tests can substitute a
//! scripted implementation and count calls.
//!
//! # Example
//!
//! ```ignore
//! use lyrics_minder::lyrics::traits::LyricsApi;
//!
//! // In production code:
//! async fn lookup<T: LyricsApi>(client: &T, track: &Track) {
//!     let result = client.fetch_by_signature(track, deadline, &cancel).await;
//! }
//!
//! // In tests:
//! let mock = MockLyricsApi::primary_ok(result);
//! ```

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::domain::{ClientError, LyricsResult, SearchQuery, Track};

/// Request/response access to a lyrics database.
///
/// Implementations must hold no per-request mutable state and must give up
/// once `deadline` passes or `cancel` fires.
#[async_trait]
pub trait LyricsApi: Send + Sync {
    /// Exact-ish lookup by title/artist/album/duration.
    async fn fetch_by_signature(
        &self,
        track: &Track,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<LyricsResult, ClientError>;

    /// Loose lookup returning ranked candidates; `Ok` is never empty.
    async fn search(
        &self,
        query: &SearchQuery,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<Vec<LyricsResult>, ClientError>;
}

#[async_trait]
impl LyricsApi for super::lrclib::LrclibClient {
    async fn fetch_by_signature(
        &self,
        track: &Track,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<LyricsResult, ClientError> {
        self.fetch_by_signature(track, deadline, cancel).await
    }

    async fn search(
        &self,
        query: &SearchQuery,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<Vec<LyricsResult>, ClientError> {
        self.search(query, deadline, cancel).await
    }
}

#[async_trait]
impl<T: LyricsApi + ?Sized> LyricsApi for std::sync::Arc<T> {
    async fn fetch_by_signature(
        &self,
        track: &Track,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<LyricsResult, ClientError> {
        (**self).fetch_by_signature(track, deadline, cancel).await
    }

    async fn search(
        &self,
        query: &SearchQuery,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<Vec<LyricsResult>, ClientError> {
        (**self).search(query, deadline, cancel).await
    }
}

/// Scripted lyrics client for testing.
///
/// Records the deadline of every call but never enforces it, and ignores
/// the cancellation token: only the resolver pre-empts work here.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// How a mocked call responds
    #[derive(Debug, Clone)]
    pub enum Scripted<T> {
        Respond(Result<T, ClientError>),
        /// Respond after a delay, regardless of the deadline
        Delayed(Duration, Result<T, ClientError>),
        /// Never respond
        Hang,
    }

    impl<T> Scripted<T> {
        async fn play(self) -> Result<T, ClientError> {
            match self {
                Self::Respond(result) => result,
                Self::Delayed(delay, result) => {
                    tokio::time::sleep(delay).await;
                    result
                }
                Self::Hang => std::future::pending().await,
            }
        }
    }

    /// Mock client with call counters.
    pub struct MockLyricsApi {
        pub primary: Scripted<LyricsResult>,
        pub fallback: Scripted<Vec<LyricsResult>>,
        fetch_calls: AtomicUsize,
        search_calls: AtomicUsize,
        last_search: Mutex<Option<SearchQuery>>,
        fetch_deadlines: Mutex<Vec<Instant>>,
        search_deadlines: Mutex<Vec<Instant>>,
    }

    impl MockLyricsApi {
        pub fn new(primary: Scripted<LyricsResult>, fallback: Scripted<Vec<LyricsResult>>) -> Self {
            Self {
                primary,
                fallback,
                fetch_calls: AtomicUsize::new(0),
                search_calls: AtomicUsize::new(0),
                last_search: Mutex::new(None),
                fetch_deadlines: Mutex::new(Vec::new()),
                search_deadlines: Mutex::new(Vec::new()),
            }
        }

        /// Primary lookup finds `result`; search must not be needed.
        pub fn primary_ok(result: LyricsResult) -> Self {
            Self::new(
                Scripted::Respond(Ok(result)),
                Scripted::Respond(Err(ClientError::NoResult)),
            )
        }

        /// Primary finds nothing; search responds as scripted.
        pub fn fallback(fallback: Scripted<Vec<LyricsResult>>) -> Self {
            Self::new(Scripted::Respond(Err(ClientError::NoResult)), fallback)
        }

        /// Primary fails with `error`.
        pub fn primary_err(error: ClientError) -> Self {
            Self::new(
                Scripted::Respond(Err(error)),
                Scripted::Respond(Err(ClientError::NoResult)),
            )
        }

        pub fn fetch_calls(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }

        pub fn total_calls(&self) -> usize {
            self.fetch_calls() + self.search_calls()
        }

        pub fn last_search(&self) -> Option<SearchQuery> {
            self.last_search.lock().clone()
        }

        /// Deadline passed to each signature lookup, in call order
        pub fn fetch_deadlines(&self) -> Vec<Instant> {
            self.fetch_deadlines.lock().clone()
        }

        /// Deadline passed to each search, in call order
        pub fn search_deadlines(&self) -> Vec<Instant> {
            self.search_deadlines.lock().clone()
        }
    }

    #[async_trait]
    impl LyricsApi for MockLyricsApi {
        async fn fetch_by_signature(
            &self,
            _track: &Track,
            deadline: Instant,
            _cancel: &CancellationToken,
        ) -> Result<LyricsResult, ClientError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            self.fetch_deadlines.lock().push(deadline);
            self.primary.clone().play().await
        }

        async fn search(
            &self,
            query: &SearchQuery,
            deadline: Instant,
            _cancel: &CancellationToken,
        ) -> Result<Vec<LyricsResult>, ClientError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.search_deadlines.lock().push(deadline);
            *self.last_search.lock() = Some(query.clone());
            self.fallback.clone().play().await
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::test_utils::{mock_lyrics_result, mock_track};

        #[tokio::test]
        async fn test_mock_counts_calls() {
            let mock = MockLyricsApi::primary_ok(mock_lyrics_result());
            let cancel = CancellationToken::new();
            let deadline = Instant::now() + Duration::from_secs(1);

            let result = mock
                .fetch_by_signature(&mock_track(), deadline, &cancel)
                .await
                .unwrap();
            assert_eq!(result.track_name, mock_lyrics_result().track_name);
            assert_eq!(mock.fetch_calls(), 1);
            assert_eq!(mock.search_calls(), 0);
            assert_eq!(mock.fetch_deadlines(), vec![deadline]);
            assert!(mock.search_deadlines().is_empty());
        }

        #[tokio::test]
        async fn test_mock_records_search_query() {
            let mock = MockLyricsApi::fallback(Scripted::Respond(Ok(vec![mock_lyrics_result()])));
            let query = SearchQuery::FreeText("song".to_string());
            let results = mock
                .search(&query, Instant::now(), &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(mock.last_search(), Some(query));
        }

        #[tokio::test]
        async fn test_mock_through_arc() {
            let mock = std::sync::Arc::new(MockLyricsApi::primary_err(ClientError::Timeout));
            let result = mock
                .fetch_by_signature(&mock_track(), Instant::now(), &CancellationToken::new())
                .await;
            assert_eq!(result, Err(ClientError::Timeout));
            assert_eq!(mock.fetch_calls(), 1);
        }
    }
}
