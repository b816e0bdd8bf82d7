//! Complete RAG pipeline: Query -> Retrieve -> Format -> Prompt -> Generate

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::config::PipelineConfig;
use crate::errors::Result;
use crate::llm::LlmService;
use crate::models::RetrievedDocument;
use crate::rag::ContextFormatter;
use crate::rag::DocumentRetriever;
use crate::rag::ElasticsearchRetriever;
use crate::rag::PromptAssembler;
use crate::rag::SearchQuery;
use crate::rag::SearchRequest;

/// Complete RAG service. Holds no per-question state; every call to
/// [`RagService::ask`] builds its own request, context and prompt.
#[derive(Clone)]
pub struct RagService {
    retriever: Arc<dyn DocumentRetriever>,
    llm_service: LlmService,
    pipeline: PipelineConfig,
    formatter: ContextFormatter,
    assembler: PromptAssembler,
}

impl RagService {
    /// Create a service talking to Elasticsearch and Azure OpenAI
    ///
    /// # Errors
    /// - Malformed backend URLs
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        let retriever = Arc::new(ElasticsearchRetriever::new(&config.elasticsearch)?);
        let llm_service = LlmService::new(config)?;
        Ok(Self::from_services(retriever, llm_service, config.pipeline.clone()))
    }

    /// Create from existing services
    #[must_use]
    pub fn from_services(
        retriever: Arc<dyn DocumentRetriever>,
        llm_service: LlmService,
        pipeline: PipelineConfig,
    ) -> Self {
        let formatter =
            ContextFormatter::new(pipeline.context_layout, pipeline.include_published_date);
        let assembler = PromptAssembler::new(pipeline.template);

        Self {
            retriever,
            llm_service,
            pipeline,
            formatter,
            assembler,
        }
    }

    /// Search request for a question, sized from the pipeline settings
    #[must_use]
    pub fn build_request(&self, question: &str) -> SearchRequest {
        SearchQuery::from_pipeline(question, &self.pipeline).to_request()
    }

    /// Answer a question.
    ///
    /// Retrieval finishes before the prompt is built, and the prompt is
    /// complete before the completion call. Zero hits is not an error: the
    /// model is still asked, with an empty context.
    ///
    /// # Errors
    /// - Retrieval failures (network, auth, rejected query)
    /// - Completion failures (network, auth, rate limit, malformed response)
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        info!("Processing RAG query: {}", question);

        // Step 1: Retrieve relevant articles
        let request = self.build_request(question);
        let documents = self.retriever.retrieve(&request).await?;
        debug!("Retrieved {} documents", documents.len());

        // Step 2: Assemble context
        let context = self.formatter.format(&documents);
        debug!("Context assembled ({} chars)", context.len());

        // Step 3: Generate answer
        let prompt = self.assembler.assemble(&context, question);
        debug!(
            "Prompt assembled ({} chars of instructions)",
            prompt.system_instructions().len()
        );
        let answer = self.llm_service.complete(&prompt).await?;

        info!("RAG query completed successfully");

        Ok(RagResponse {
            question: question.to_string(),
            answer,
            context,
            request: request.to_json(),
            documents,
        })
    }
}

/// RAG response
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    pub question: String,
    /// Trimmed completion text
    pub answer: String,
    /// Formatted context embedded in the prompt
    pub context: String,
    /// Search request body as sent
    pub request: serde_json::Value,
    pub documents: Vec<RetrievedDocument>,
}
