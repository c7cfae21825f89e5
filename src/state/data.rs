/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the network/database layers and the UI layer.
use serde::{Deserialize, Serialize};

/// Base URL for poster images served by the catalog's image CDN
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// A single movie as returned by the catalog API.
/// Only the fields the app displays are kept; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    /// Relative path such as "/abc.jpg"
    pub poster_path: Option<String>,
    pub vote_average: f64,
    pub original_language: String,
    /// "YYYY-MM-DD", sometimes empty
    pub release_date: Option<String>,
    pub popularity: f64,
    pub overview: String,
}

impl Movie {
    /// Full poster URL, if the movie has a poster
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{POSTER_BASE_URL}{p}"))
    }

    /// Rating with one decimal, or "N/A" for unrated movies
    pub fn rating_label(&self) -> String {
        if self.vote_average > 0.0 {
            format!("{:.1}", self.vote_average)
        } else {
            "N/A".to_string()
        }
    }

    /// Release year, or "N/A" when the date is missing or malformed
    pub fn year_label(&self) -> String {
        self.release_date
            .as_deref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| d.format("%Y").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// One row of the trending list: how often a term was searched,
/// and the poster of the top result the first time it was searched.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingEntry {
    pub id: String,
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

/// Load status of a list shown on screen.
///
/// Loading, failure and a successful result are mutually exclusive, and a
/// failure carries no stale list.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Loading,
    Ready(T),
    Failed(&'static str),
}

impl<T> Fetch<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Fetch::Ready(value) => Some(value),
            _ => None,
        }
    }
}
