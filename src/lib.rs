//! Financial news summaries over Elasticsearch hybrid retrieval (RAG).
//!
//! A question is turned into a reciprocal-rank-fusion search request, the hits
//! are flattened into a context block, the context is embedded in a French
//! instruction template, and an Azure OpenAI deployment writes the summary.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;


pub use config::AppConfig;
pub use errors::*;
