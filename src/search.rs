use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::mangadex::Manga;
use crate::mangadex_client::{ApiError, MangaDexClient};

#[async_trait]
pub trait SearchSource {
    async fn search(&self, title: &str) -> Result<Vec<Manga>, ApiError>;
}

#[async_trait]
impl<S: SearchSource + Sync> SearchSource for &S {
    async fn search(&self, title: &str) -> Result<Vec<Manga>, ApiError> {
        (**self).search(title).await
    }
}

#[async_trait]
impl SearchSource for MangaDexClient {
    async fn search(&self, title: &str) -> Result<Vec<Manga>, ApiError> {
        Ok(self.search_manga(title).await?.data)
    }
}

#[derive(Debug, PartialEq)]
pub enum SearchOutcome {
    /// A later submission took over before this one fired or settled.
    Superseded,
    /// Empty or whitespace-only input; results should be cleared, no call
    /// was made.
    Cleared,
    Results(Vec<Manga>),
}

/// Debounced search-as-you-type resolver. Every submission restarts the
/// single-shot delay; only the submission whose generation survives both the
/// delay and the network round trip gets to report results, so a slow,
/// superseded response is discarded instead of overwriting newer state.
pub struct SearchResolver<S> {
    source: S,
    delay: Duration,
    generation: AtomicU64,
    loading: AtomicBool,
}

impl<S: SearchSource> SearchResolver<S> {
    pub fn new(source: S, delay: Duration) -> Self {
        Self {
            source,
            delay,
            generation: AtomicU64::new(0),
            loading: AtomicBool::new(false),
        }
    }

    /// True only between request dispatch and settlement.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, query: &str) -> Result<SearchOutcome, ApiError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::Cleared);
        }

        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("search for {query:?} superseded before dispatch");
            return Ok(SearchOutcome::Superseded);
        }

        self.loading.store(true, Ordering::SeqCst);
        let result = self.source.search(query).await;
        self.loading.store(false, Ordering::SeqCst);

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("search for {query:?} superseded while in flight, discarding");
            return Ok(SearchOutcome::Superseded);
        }

        result.map(SearchOutcome::Results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSource {
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SearchSource for RecordingSource {
        async fn search(&self, title: &str) -> Result<Vec<Manga>, ApiError> {
            self.calls.lock().unwrap().push(title.to_string());
            Ok(Vec::new())
        }
    }

    fn resolver(source: RecordingSource) -> Arc<SearchResolver<RecordingSource>> {
        Arc::new(SearchResolver::new(source, Duration::from_millis(300)))
    }

    #[tokio::test(start_paused = true)]
    async fn a_single_submission_fires_after_the_delay() {
        let source = RecordingSource::default();
        let resolver = resolver(source.clone());

        let outcome = resolver.submit("bloom").await.unwrap();

        assert_eq!(outcome, SearchOutcome::Results(Vec::new()));
        assert_eq!(*source.calls.lock().unwrap(), vec!["bloom"]);
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_within_the_window_collapse_to_one_call() {
        let source = RecordingSource::default();
        let resolver = resolver(source.clone());

        let first = tokio::spawn({
            let resolver = resolver.clone();
            async move { resolver.submit("blo").await }
        });
        // Second keystroke 100ms later, well inside the 300ms window.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = tokio::spawn({
            let resolver = resolver.clone();
            async move { resolver.submit("bloom").await }
        });

        assert_eq!(
            first.await.unwrap().unwrap(),
            SearchOutcome::Superseded
        );
        assert_eq!(
            second.await.unwrap().unwrap(),
            SearchOutcome::Results(Vec::new())
        );
        // Exactly one network call, for the final value only.
        assert_eq!(*source.calls.lock().unwrap(), vec!["bloom"]);
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_outside_the_window_each_fire() {
        let source = RecordingSource::default();
        let resolver = resolver(source.clone());

        resolver.submit("blo").await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        resolver.submit("bloom").await.unwrap();

        assert_eq!(*source.calls.lock().unwrap(), vec!["blo", "bloom"]);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_clears_without_calling_out() {
        let source = RecordingSource::default();
        let resolver = resolver(source.clone());

        assert_eq!(resolver.submit("   ").await.unwrap(), SearchOutcome::Cleared);
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_supersedes_a_pending_submission() {
        let source = RecordingSource::default();
        let resolver = resolver(source.clone());

        let pending = tokio::spawn({
            let resolver = resolver.clone();
            async move { resolver.submit("blo").await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        // The user cleared the input before the timer fired.
        assert_eq!(resolver.submit("").await.unwrap(), SearchOutcome::Cleared);

        assert_eq!(pending.await.unwrap().unwrap(), SearchOutcome::Superseded);
        assert!(source.calls.lock().unwrap().is_empty());
    }
}
