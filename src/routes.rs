use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::handlers;
use crate::state::{AppState, Upstream};

/// Full application: the routes plus the cross-origin policy (any origin,
/// POST only) and request tracing.
pub fn app(state: AppState) -> Router {
    // The endpoints are called straight from the app: any origin, POST only.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(Any);

    Router::new()
        .merge(create_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/ask", post(ask_ai_tutor).fallback(method_not_allowed))
        .route("/translate", post(translate_text).fallback(method_not_allowed))
}

async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method Not Allowed" })),
    )
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "ai_tutor": state.chat.is_ready(),
        "translator": state.translator.is_ready(),
    }))
}

/// Gate: only delegate when the chat upstream was configured at bootstrap.
async fn ask_ai_tutor(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Value>) {
    match &state.chat {
        Upstream::Ready(model) => handlers::handle_ask(model.as_ref(), &body).await,
        Upstream::Unavailable(reason) => {
            error!("Rejecting /ask: chat model not initialized: {reason}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("AI Tutor configuration error: {reason}") })),
            )
        }
    }
}

async fn translate_text(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Value>) {
    match &state.translator {
        Upstream::Ready(translator) => {
            handlers::handle_translate(translator.as_ref(), &body).await
        }
        Upstream::Unavailable(reason) => {
            error!("Rejecting /translate: translator not initialized: {reason}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Translator configuration error: {reason}") })),
            )
        }
    }
}
