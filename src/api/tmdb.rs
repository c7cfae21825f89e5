/// Movie catalog client (The Movie Database v3 API)
use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::Deserialize;

use super::MovieCatalog;
use crate::config::TmdbConfig;
use crate::error::{Error, Result};
use crate::state::data::Movie;

/// Paged listing envelope; only `results` is used
#[derive(Debug, Default, Deserialize)]
struct Listing {
    #[serde(default)]
    results: Vec<Movie>,
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Search endpoint for a non-empty query, discovery listing otherwise
    pub fn endpoint(&self, query: &str) -> Result<Url> {
        let url = if query.is_empty() {
            Url::parse_with_params(
                &format!("{}/discover/movie", self.base_url),
                &[("sort_by", "popularity.desc")],
            )
        } else {
            Url::parse_with_params(&format!("{}/search/movie", self.base_url), &[("query", query)])
        };
        url.map_err(|e| Error::Config(format!("invalid catalog base url {}: {e}", self.base_url)))
    }

    async fn fetch(&self, url: Url) -> Result<Vec<Movie>> {
        tracing::debug!(%url, "fetching movies");

        let resp = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Status {
                status: resp.status(),
                url: redact(&url),
            });
        }

        let body = resp.bytes().await?;
        parse_listing(&body)
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        self.fetch(self.endpoint(query)?).await
    }

    async fn discover(&self) -> Result<Vec<Movie>> {
        self.fetch(self.endpoint("")?).await
    }
}

fn parse_listing(body: &[u8]) -> Result<Vec<Movie>> {
    let listing: Listing = serde_json::from_slice(body)?;
    Ok(listing.results)
}

/// Path only, so search terms don't end up in error messages
fn redact(url: &Url) -> String {
    format!("{}{}", url.origin().ascii_serialization(), url.path())
}
