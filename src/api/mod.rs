/// Remote services module
///
/// This module handles:
/// - The movie catalog (tmdb.rs)
/// - The hosted trending store (appwrite.rs)
///
/// Both sit behind traits so the local SQLite store and test fakes
/// can stand in for them.
use async_trait::async_trait;

use crate::error::Result;
use crate::state::data::{Movie, TrendingEntry};

pub mod appwrite;
pub mod tmdb;

#[cfg(test)]
mod loopback;

/// A source of movie listings
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Free-text search
    async fn search(&self, query: &str) -> Result<Vec<Movie>>;

    /// Popularity-sorted listing used when there is no query
    async fn discover(&self) -> Result<Vec<Movie>>;
}

/// Per-term search counts backing the trending list
#[async_trait]
pub trait TrendingStore: Send + Sync {
    /// Most searched terms, highest count first
    async fn top(&self, limit: usize) -> Result<Vec<TrendingEntry>>;

    /// Count one search for `term`, creating the entry from `movie`
    /// (the top result) if the term is new
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<()>;
}
