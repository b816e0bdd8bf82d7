//! In-memory backends for driving the pipeline without network access

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use finrag::config::PipelineConfig;
use finrag::llm::ChatMessage;
use finrag::llm::CompletionBackend;
use finrag::llm::LlmService;
use finrag::models::RetrievedDocument;
use finrag::rag::DocumentRetriever;
use finrag::rag::RagService;
use finrag::rag::SearchRequest;
use finrag::FinRagError;
use finrag::Result;

/// Returns canned documents and records every request body
#[derive(Default)]
pub struct FakeRetriever {
    documents: Vec<RetrievedDocument>,
    fail: bool,
    pub requests: Mutex<Vec<serde_json::Value>>,
}

impl FakeRetriever {
    pub fn with_documents(documents: Vec<RetrievedDocument>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl DocumentRetriever for FakeRetriever {
    async fn retrieve(&self, request: &SearchRequest) -> Result<Vec<RetrievedDocument>> {
        self.requests.lock().unwrap().push(request.to_json());
        if self.fail {
            return Err(FinRagError::RetrievalFailure("search returned 401 Unauthorized".to_string()));
        }
        Ok(self.documents.clone())
    }
}

/// Returns a canned answer and records every message list
pub struct FakeCompletion {
    answer: String,
    fail: bool,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeCompletion {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: String::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Vec<ChatMessage> {
        self.calls.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CompletionBackend for FakeCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if self.fail {
            return Err(FinRagError::CompletionFailure("chat completion returned 429 Too Many Requests".to_string()));
        }
        Ok(self.answer.clone())
    }
}

pub fn service(
    retriever: &Arc<FakeRetriever>,
    completion: &Arc<FakeCompletion>,
    pipeline: PipelineConfig,
) -> RagService {
    RagService::from_services(
        retriever.clone(),
        LlmService::with_backend(completion.clone()),
        pipeline,
    )
}

pub fn fed_article() -> RetrievedDocument {
    RetrievedDocument {
        title: Some("Fed holds rates".to_string()),
        body: Some("...".to_string()),
        source_tag: Some("Reuters".to_string()),
        published_at: None,
        link: Some("https://reuters.example/1".to_string()),
    }
}
