//! Real HTTP clients against a local stub of the search and completion backends

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use axum::extract::Query;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use axum::Json;
use axum::Router;
use finrag::config::AppConfig;
use finrag::config::AzureOpenAiConfig;
use finrag::config::ElasticsearchConfig;
use finrag::llm::AzureOpenAiClient;
use finrag::llm::ChatMessage;
use finrag::llm::CompletionBackend;
use finrag::rag::DocumentRetriever;
use finrag::rag::ElasticsearchRetriever;
use finrag::rag::RagService;
use finrag::rag::SearchQuery;
use finrag::FinRagError;
use serde_json::json;
use serde_json::Value;

/// `elastic:changeme`
const EXPECTED_BASIC: &str = "Basic ZWxhc3RpYzpjaGFuZ2VtZQ==";
const API_KEY: &str = "key-123";

#[derive(Debug, Clone)]
struct Recorded {
    headers: HeaderMap,
    query: HashMap<String, String>,
    body: Value,
}

#[derive(Clone, Default)]
struct Stub {
    searches: Arc<Mutex<Vec<Recorded>>>,
    completions: Arc<Mutex<Vec<Recorded>>>,
}

async fn search(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let authorized =
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(EXPECTED_BASIC);
    stub.searches.lock().unwrap().push(Recorded {
        headers,
        query: HashMap::new(),
        body,
    });

    if !authorized {
        return (StatusCode::UNAUTHORIZED, "bad creds").into_response();
    }
    Json(json!({
        "took": 2,
        "hits": {
            "hits": [
                { "_id": "1", "_source": { "title": "T1", "message": "Corps 1", "tags": ["Reuters"] } },
                { "_id": "2", "_source": { "title": "T2" } }
            ]
        }
    }))
    .into_response()
}

async fn chat(
    State(stub): State<Stub>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorized = headers.get("api-key").and_then(|v| v.to_str().ok()) == Some(API_KEY);
    stub.completions.lock().unwrap().push(Recorded {
        headers,
        query,
        body,
    });

    if !authorized {
        return (StatusCode::UNAUTHORIZED, "invalid key").into_response();
    }
    Json(json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": " hi " } }]
    }))
    .into_response()
}

async fn spawn_stub() -> (SocketAddr, Stub) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/fin-news/_search", post(search))
        .route("/openai/deployments/gpt-4o/chat/completions", post(chat))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, stub)
}

fn es_config(addr: SocketAddr, password: &str) -> ElasticsearchConfig {
    ElasticsearchConfig {
        url: format!("http://{addr}"),
        user: "elastic".to_string(),
        password: password.to_string(),
        index: "fin-news".to_string(),
    }
}

fn azure_config(addr: SocketAddr, api_key: &str) -> AzureOpenAiConfig {
    AzureOpenAiConfig {
        endpoint: format!("http://{addr}/"),
        api_key: api_key.to_string(),
        api_version: "2024-06-01".to_string(),
        deployment: "gpt-4o".to_string(),
    }
}

#[tokio::test]
async fn test_search_posts_request_with_basic_auth() {
    let (addr, stub) = spawn_stub().await;
    let retriever = ElasticsearchRetriever::new(&es_config(addr, "changeme")).unwrap();
    let request = SearchQuery::new("taux de la Fed", 10).to_request();

    let docs = retriever.retrieve(&request).await.unwrap();

    let titles: Vec<_> = docs.iter().map(|d| d.title()).collect();
    assert_eq!(titles, vec!["T1", "T2"]);
    assert_eq!(docs[0].source_tag(), "Reuters");

    let searches = stub.searches.lock().unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].headers[AUTHORIZATION], EXPECTED_BASIC);
    assert_eq!(searches[0].body, request.to_json());
    assert_eq!(searches[0].body["size"], 10);
}

#[tokio::test]
async fn test_search_rejection_is_retrieval_failure() {
    let (addr, _stub) = spawn_stub().await;
    let retriever = ElasticsearchRetriever::new(&es_config(addr, "wrong")).unwrap();

    let err = retriever
        .retrieve(&SearchQuery::new("Nvidia", 10).to_request())
        .await
        .unwrap_err();

    match err {
        FinRagError::RetrievalFailure(message) => {
            assert!(message.contains("401"), "{message}");
            assert!(message.contains("bad creds"), "{message}");
        }
        other => panic!("expected RetrievalFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_completion_posts_messages_with_api_key() {
    let (addr, stub) = spawn_stub().await;
    let client = AzureOpenAiClient::new(&azure_config(addr, API_KEY)).unwrap();
    let messages = [ChatMessage::system("règles"), ChatMessage::user("Que fait la Fed ?")];

    let answer = client.complete(&messages).await.unwrap();
    assert_eq!(answer, " hi ");

    let completions = stub.completions.lock().unwrap();
    assert_eq!(completions.len(), 1);
    let recorded = &completions[0];
    assert_eq!(recorded.headers["api-key"], API_KEY);
    assert_eq!(recorded.query.get("api-version").map(String::as_str), Some("2024-06-01"));
    assert_eq!(
        recorded.body["messages"],
        json!([
            { "role": "system", "content": "règles" },
            { "role": "user", "content": "Que fait la Fed ?" }
        ])
    );
}

#[tokio::test]
async fn test_completion_rejection_is_completion_failure() {
    let (addr, _stub) = spawn_stub().await;
    let client = AzureOpenAiClient::new(&azure_config(addr, "stale")).unwrap();

    let err = client.complete(&[ChatMessage::user("q")]).await.unwrap_err();

    match err {
        FinRagError::CompletionFailure(message) => {
            assert!(message.contains("401"), "{message}");
            assert!(message.contains("invalid key"), "{message}");
        }
        other => panic!("expected CompletionFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_service_against_both_backends() {
    let (addr, stub) = spawn_stub().await;
    let config = AppConfig {
        elasticsearch: es_config(addr, "changeme"),
        azure_openai: azure_config(addr, API_KEY),
        ..AppConfig::default()
    };
    let service = RagService::new(&config).unwrap();

    let response = service.ask("Que fait la Fed ?").await.unwrap();

    assert_eq!(response.answer, "hi");
    assert!(response.context.starts_with("Titre: T1\nTexte: Corps 1\nSource: Reuters\n"));

    let completions = stub.completions.lock().unwrap();
    let messages = completions[0].body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0]["content"].as_str().unwrap().contains(&response.context));
    assert_eq!(messages[1]["content"], "Que fait la Fed ?");
}
