//! Retrieval against the search backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ElasticsearchConfig;
use crate::errors::FinRagError;
use crate::errors::Result;
use crate::models::RetrievedDocument;
use crate::rag::SearchRequest;

/// Anything that can answer a hybrid search request with ranked documents
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Run the request; documents come back in fused rank order
    async fn retrieve(&self, request: &SearchRequest) -> Result<Vec<RetrievedDocument>>;
}

/// Elasticsearch `_search` client using basic auth
pub struct ElasticsearchRetriever {
    search_url: Url,
    user: String,
    password: String,
    client: Client,
}

impl ElasticsearchRetriever {
    /// Create a new retriever for the configured index
    ///
    /// # Errors
    /// - Malformed cluster URL
    /// - HTTP client build errors
    pub fn new(config: &ElasticsearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            search_url: search_url(&config.url, &config.index)?,
            user: config.user.clone(),
            password: config.password.clone(),
            client,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

#[async_trait]
impl DocumentRetriever for ElasticsearchRetriever {
    async fn retrieve(&self, request: &SearchRequest) -> Result<Vec<RetrievedDocument>> {
        debug!("POST {}", self.search_url);

        let response = self
            .client
            .post(self.search_url.clone())
            .basic_auth(&self.user, Some(&self.password))
            .json(request)
            .send()
            .await
            .map_err(|e| FinRagError::RetrievalFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FinRagError::RetrievalFailure(format!(
                "search returned {status}: {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FinRagError::RetrievalFailure(e.to_string()))?;
        parse_hits(&body)
    }
}

/// `{url}/{index}/_search`, tolerating a trailing slash on the base URL
pub fn search_url(base: &str, index: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| FinRagError::ConfigError(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .push(index)
        .push("_search");
    Ok(url)
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

/// Extract `hits.hits[]._source` in response order
pub fn parse_hits(body: &str) -> Result<Vec<RetrievedDocument>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| FinRagError::RetrievalFailure(format!("unexpected search response: {e}")))?;

    Ok(response
        .hits
        .hits
        .iter()
        .map(|hit| RetrievedDocument::from_source(&hit.source))
        .collect())
}
