#![allow(dead_code)]

use ask_service::config::{
    AskConfig, ConversationConfig, CorsConfig, GoogleConfig, ModelConfig, RequestConfig,
    UpstreamConfig,
};
use ask_service::services::providers::TextProvider;
use ask_service::startup::{build_router, AppState, Application};
use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use http_body_util::BodyExt;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub fn test_config(api_base: &str) -> AskConfig {
    AskConfig {
        common: CoreConfig {
            port: 0,
            ..Default::default()
        },
        google: GoogleConfig {
            api_key: "test-api-key".to_string(),
            api_base: api_base.to_string(),
        },
        models: ModelConfig {
            answer_model: "gemini-2.5-flash".to_string(),
            summary_model: "gemini-2.5-flash".to_string(),
        },
        conversation: ConversationConfig {
            summary_enabled: true,
            max_recent_messages: 20,
        },
        upstream: UpstreamConfig {
            request_timeout_ms: 5_000,
            max_retries: 0,
        },
        request: RequestConfig {
            max_body_bytes: 16 * 1024 * 1024,
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

pub fn test_router(provider: Arc<dyn TextProvider>) -> Router {
    build_router(AppState::new(
        test_config("http://127.0.0.1:1/v1beta"),
        provider,
    ))
}

pub fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the full application on a random port.
    pub async fn spawn(config: AskConfig, provider: Option<Arc<dyn TextProvider>>) -> Self {
        let app = match provider {
            Some(provider) => Application::build_with_provider(config, provider).await,
            None => Application::build(config).await,
        }
        .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp { address, port }
    }
}
