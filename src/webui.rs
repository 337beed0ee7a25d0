use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderValue, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chat::ChatService;
use crate::error::ChatError;

const INDEX_HTML: &str = include_str!("../web/index.html");
const APP_JS: &str = include_str!("../web/app.js");
const APP_CSS: &str = include_str!("../web/app.css");

pub fn build_router(service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/assets/app.js", get(asset_js))
        .route("/assets/app.css", get(asset_css))
        .route("/health", get(health))
        .route("/chat", post(api_chat))
        .with_state(service)
}

pub async fn run_web(service: ChatService, host: &str, port: u16) -> Result<()> {
    info!(
        agent = %service.config().agent.name,
        credential_program = %service.config().credentials.program,
        "starting web ui"
    );
    let app = build_router(Arc::new(service));
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    let addr = listener.local_addr()?;
    info!("agentcore-chat web running at http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("web server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn asset_js() -> Response {
    (
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/javascript; charset=utf-8"))],
        APP_JS,
    )
        .into_response()
}

async fn asset_css() -> Response {
    (
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/css; charset=utf-8"))],
        APP_CSS,
    )
        .into_response()
}

async fn health() -> Json<SimpleOk> {
    Json(SimpleOk { ok: true })
}

/// Always answers 200 with a JSON body; failures are flagged with `error: true`.
async fn api_chat(
    State(service): State<Arc<ChatService>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let result = match payload {
        Ok(Json(req)) => match req.prompt {
            Some(prompt) => service.reply(&prompt).await,
            None => Err(ChatError::EmptyPrompt),
        },
        Err(rejection) => {
            debug!(%rejection, "rejected chat request");
            Err(ChatError::InvalidRequest)
        }
    };
    Json(ChatResponse::from_result(result))
}

#[derive(Debug, Serialize)]
struct SimpleOk {
    ok: bool,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<bool>,
}

impl ChatResponse {
    fn from_result(result: std::result::Result<String, ChatError>) -> Self {
        match result {
            Ok(response) => Self {
                response,
                error: None,
            },
            Err(err) => {
                warn!(error = %err, "chat turn failed");
                Self {
                    response: err.user_message(),
                    error: Some(true),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::chat::tests::{CREDS_SCRIPT, sh_config};
    use crate::config::Config;

    fn app(cfg: Config) -> Router {
        build_router(Arc::new(ChatService::new(cfg)))
    }

    async fn post_chat(app: Router, content_type: &str, body: &str) -> Value {
        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn index_serves_the_chat_page() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app(Config::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("id=\"userInput\""));
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_request() {
        let v = post_chat(app(Config::default()), "text/plain", "hello").await;
        assert_eq!(v, json!({"response": "Invalid request format", "error": true}));
    }

    #[tokio::test]
    async fn wrong_prompt_type_is_invalid_request() {
        let v = post_chat(app(Config::default()), "application/json", r#"{"prompt": 5}"#).await;
        assert_eq!(v["response"], "Invalid request format");
    }

    #[tokio::test]
    async fn missing_or_blank_prompt() {
        let v = post_chat(app(Config::default()), "application/json", "{}").await;
        assert_eq!(v, json!({"response": "Please provide a valid prompt", "error": true}));
        let v = post_chat(app(Config::default()), "application/json", r#"{"prompt": "  "}"#).await;
        assert_eq!(v["error"], true);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_reply_has_no_error_flag() {
        let cfg = sh_config(CREDS_SCRIPT, r#"printf '{"text": "Happy to help"}'"#);
        let v = post_chat(app(cfg), "application/json", r#"{"prompt": "hi"}"#).await;
        assert_eq!(v, json!({"response": "Happy to help"}));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn credential_timeout_is_reported() {
        let mut cfg = sh_config("sleep 5", "printf unused");
        cfg.credentials.timeout_secs = 1;
        let v = post_chat(app(cfg), "application/json", r#"{"prompt": "hi"}"#).await;
        assert_eq!(v, json!({"response": "Timeout getting AWS credentials", "error": true}));
    }
}
