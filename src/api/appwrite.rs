/// Hosted trending store backed by an Appwrite documents collection
///
/// Each document holds one search term:
/// `{ searchTerm, count, movie_id, poster_url }`.
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use super::TrendingStore;
use crate::config::AppwriteConfig;
use crate::error::{Error, Result};
use crate::state::data::{Movie, TrendingEntry};

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    #[serde(default)]
    count: i64,
    #[serde(default)]
    movie_id: i64,
    #[serde(default)]
    poster_url: String,
}

impl From<Document> for TrendingEntry {
    fn from(doc: Document) -> Self {
        TrendingEntry {
            id: doc.id,
            search_term: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id,
            poster_url: doc.poster_url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppwriteStore {
    client: Client,
    config: AppwriteConfig,
}

impl AppwriteStore {
    pub fn new(client: Client, config: AppwriteConfig) -> Self {
        Self { client, config }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint, self.config.database_id, self.config.collection_id
        )
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
    }

    async fn list(&self, queries: &[String]) -> Result<Vec<Document>> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();

        let resp = self
            .authed(self.client.get(self.documents_url()))
            .query(&params)
            .send()
            .await?;

        let body = check(resp).await?.bytes().await?;
        let list: DocumentList = serde_json::from_slice(&body)?;
        Ok(list.documents)
    }
}

#[async_trait]
impl TrendingStore for AppwriteStore {
    async fn top(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        let docs = self.list(&[query_limit(limit), query_order_desc("count")]).await?;
        Ok(docs.into_iter().map(TrendingEntry::from).collect())
    }

    async fn record_search(&self, term: &str, movie: &Movie) -> Result<()> {
        let existing = self.list(&[query_equal("searchTerm", term)]).await?;

        let resp = match existing.into_iter().next() {
            Some(doc) => {
                let url = format!("{}/{}", self.documents_url(), doc.id);
                self.authed(self.client.patch(url))
                    .json(&json!({ "data": { "count": doc.count + 1 } }))
                    .send()
                    .await?
            }
            None => {
                self.authed(self.client.post(self.documents_url()))
                    .json(&new_document(term, movie))
                    .send()
                    .await?
            }
        };

        check(resp).await?;
        tracing::debug!(term, "recorded search in appwrite");
        Ok(())
    }
}

/// Body for creating a document for a first-time search term
fn new_document(term: &str, movie: &Movie) -> Value {
    json!({
        "documentId": "unique()",
        "data": {
            "searchTerm": term,
            "count": 1,
            "movie_id": movie.id,
            "poster_url": movie.poster_url().unwrap_or_default(),
        }
    })
}

fn query_limit(limit: usize) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

fn query_order_desc(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

fn query_equal(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

async fn check(resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let url = resp.url().path().to_string();
    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(%status, %url, body = %body, "appwrite request failed");
    Err(Error::Status { status, url })
}
