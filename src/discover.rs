/// Fetch workflows behind the two lists on screen
use crate::api::{MovieCatalog, TrendingStore};
use crate::error::Result;
use crate::state::data::{Movie, TrendingEntry};

/// Search the catalog for `query`, or list popular movies when it is empty.
///
/// A non-empty search with at least one result counts one search for the
/// term against its top result. Failing to count is logged but does not
/// fail the search.
pub async fn fetch_movies(
    catalog: &dyn MovieCatalog,
    store: &dyn TrendingStore,
    query: &str,
) -> Result<Vec<Movie>> {
    let query = query.trim();

    if query.is_empty() {
        return catalog.discover().await;
    }

    let movies = catalog.search(query).await?;

    if let Some(top) = movies.first() {
        if let Err(e) = store.record_search(query, top).await {
            tracing::warn!(query, error = %e, "failed to update search count");
        }
    }

    tracing::info!(query, results = movies.len(), "search complete");
    Ok(movies)
}

/// Most searched terms for the trending strip
pub async fn fetch_trending(store: &dyn TrendingStore, limit: usize) -> Result<Vec<TrendingEntry>> {
    store.top(limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCatalog {
        results: Vec<Movie>,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn returning(titles: &[&str]) -> Self {
            let results = titles
                .iter()
                .enumerate()
                .map(|(i, t)| Movie {
                    id: i as i64 + 1,
                    title: t.to_string(),
                    ..Movie::default()
                })
                .collect();
            Self {
                results,
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn answer(&self, call: String) -> Result<Vec<Movie>> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(Error::Status {
                    status: StatusCode::UNAUTHORIZED,
                    url: "https://api.themoviedb.org/3/search/movie".into(),
                });
            }
            Ok(self.results.clone())
        }
    }

    #[async_trait]
    impl MovieCatalog for FakeCatalog {
        async fn search(&self, query: &str) -> Result<Vec<Movie>> {
            self.answer(format!("search:{query}"))
        }

        async fn discover(&self) -> Result<Vec<Movie>> {
            self.answer("discover".into())
        }
    }

    #[derive(Default)]
    struct FakeStore {
        recorded: Mutex<Vec<(String, i64)>>,
        fail: bool,
    }

    #[async_trait]
    impl TrendingStore for FakeStore {
        async fn top(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
            let recorded = self.recorded.lock().unwrap();
            Ok(recorded
                .iter()
                .take(limit)
                .enumerate()
                .map(|(i, (term, movie_id))| TrendingEntry {
                    id: i.to_string(),
                    search_term: term.clone(),
                    count: 1,
                    movie_id: *movie_id,
                    poster_url: String::new(),
                })
                .collect())
        }

        async fn record_search(&self, term: &str, movie: &Movie) -> Result<()> {
            self.recorded.lock().unwrap().push((term.to_string(), movie.id));
            if self.fail {
                return Err(Error::Config("store offline".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_empty_query_uses_discovery_without_counting() {
        let catalog = FakeCatalog::returning(&["Popular"]);
        let store = FakeStore::default();

        let movies = fetch_movies(&catalog, &store, "  ").await.unwrap();

        assert_eq!(movies.len(), 1);
        assert_eq!(*catalog.calls.lock().unwrap(), vec!["discover".to_string()]);
        assert!(store.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_counts_top_result_once() {
        let catalog = FakeCatalog::returning(&["Alien", "Aliens", "Alien 3"]);
        let store = FakeStore::default();

        let movies = fetch_movies(&catalog, &store, " alien ").await.unwrap();

        assert_eq!(movies.len(), 3);
        assert_eq!(*catalog.calls.lock().unwrap(), vec!["search:alien".to_string()]);
        assert_eq!(*store.recorded.lock().unwrap(), vec![("alien".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_no_results_records_nothing() {
        let catalog = FakeCatalog::returning(&[]);
        let store = FakeStore::default();

        let movies = fetch_movies(&catalog, &store, "qwzx").await.unwrap();

        assert!(movies.is_empty());
        assert!(store.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_error_propagates_without_counting() {
        let catalog = FakeCatalog::failing();
        let store = FakeStore::default();

        let err = fetch_movies(&catalog, &store, "alien").await.unwrap_err();

        assert!(matches!(err, Error::Status { .. }));
        assert!(store.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_failure_keeps_results() {
        let catalog = FakeCatalog::returning(&["Heat"]);
        let store = FakeStore {
            fail: true,
            ..FakeStore::default()
        };

        let movies = fetch_movies(&catalog, &store, "heat").await.unwrap();

        assert_eq!(movies[0].title, "Heat");
        assert_eq!(store.recorded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_trending_respects_limit() {
        let store = FakeStore::default();
        for term in ["a", "b", "c"] {
            store.record_search(term, &Movie::default()).await.unwrap();
        }

        let top = fetch_trending(&store, 2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].search_term, "a");
    }
}
