//! RAG (Retrieval-Augmented Generation) module
//!
//! One pass per question:
//! - Hybrid search request (RRF over two semantic retrievers and a lexical match)
//! - Retrieval from the search backend
//! - Context assembly from the ranked hits
//! - Prompt assembly and LLM-based summary generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use finrag::config::AppConfig;
//! use finrag::rag::RagService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     config.validate()?;
//!     let service = RagService::new(&config)?;
//!
//!     let response = service.ask("Quelles sont les nouvelles sur Nvidia ?").await?;
//!     println!("{}", response.answer);
//!     println!("Sources: {} articles", response.documents.len());
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;
pub mod prompts;
pub mod query;
pub mod retriever;

pub use context::ContextFormatter;
pub use context::ContextLayout;
pub use pipeline::RagResponse;
pub use pipeline::RagService;
pub use prompts::Prompt;
pub use prompts::PromptAssembler;
pub use prompts::TemplateVariant;
pub use query::SearchQuery;
pub use query::SearchRequest;
pub use retriever::DocumentRetriever;
pub use retriever::ElasticsearchRetriever;
