//! Hybrid search request: reciprocal rank fusion over two semantic retrievers
//! and one lexical multi-field match.

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::models::fields;

/// Semantic (embedding) field over the article body
pub const MESSAGE_SEMANTIC_FIELD: &str = "message_semantic";
/// Semantic (embedding) field over the article title
pub const TITLE_SEMANTIC_FIELD: &str = "title_semantic";

/// Free text plus sizing, as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub free_text: String,
    pub result_limit: usize,
    pub rank_window: Option<usize>,
}

impl SearchQuery {
    pub fn new(free_text: impl Into<String>, result_limit: usize) -> Self {
        Self {
            free_text: free_text.into(),
            result_limit,
            rank_window: None,
        }
    }

    #[must_use]
    pub fn with_rank_window(mut self, rank_window: Option<usize>) -> Self {
        self.rank_window = rank_window;
        self
    }

    /// Size the query from pipeline settings
    pub fn from_pipeline(free_text: impl Into<String>, pipeline: &PipelineConfig) -> Self {
        Self::new(free_text, pipeline.result_limit).with_rank_window(pipeline.rank_window)
    }

    /// Build the request body. The text is passed through untouched, even when
    /// empty; the backend validates it.
    #[must_use]
    pub fn to_request(&self) -> SearchRequest {
        let text = &self.free_text;
        SearchRequest {
            size: self.result_limit,
            retriever: RetrieverClause {
                rrf: RrfRetriever {
                    retrievers: vec![
                        StandardRetriever::new(QueryClause::semantic(MESSAGE_SEMANTIC_FIELD, text)),
                        StandardRetriever::new(QueryClause::semantic(TITLE_SEMANTIC_FIELD, text)),
                        StandardRetriever::new(QueryClause::MultiMatch {
                            query: text.clone(),
                            fields: vec![fields::MESSAGE.to_string(), fields::TITLE.to_string()],
                        }),
                    ],
                    rank_window_size: self.rank_window,
                },
            },
        }
    }
}

/// `_search` body using the retriever API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub size: usize,
    pub retriever: RetrieverClause,
}

impl SearchRequest {
    pub fn to_json(&self) -> serde_json::Value {
        // Plain structs and strings only; serialization cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrieverClause {
    pub rrf: RrfRetriever,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RrfRetriever {
    pub retrievers: Vec<StandardRetriever>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_window_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardRetriever {
    pub standard: StandardQuery,
}

impl StandardRetriever {
    fn new(query: QueryClause) -> Self {
        Self {
            standard: StandardQuery { query },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardQuery {
    pub query: QueryClause,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClause {
    Semantic { field: String, query: String },
    MultiMatch { query: String, fields: Vec<String> },
}

impl QueryClause {
    fn semantic(field: &str, query: &str) -> Self {
        Self::Semantic {
            field: field.to_string(),
            query: query.to_string(),
        }
    }

    pub const fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantic { .. })
    }
}
