use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::header::ACCEPT;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::explain::ExplainService;
use crate::models::ExplainParams;
use crate::render::{render_response, ResponseFormat};

#[derive(Clone)]
struct AppState {
    explain: ExplainService,
}

pub fn build_router(explain: ExplainService) -> Router {
    let state = AppState { explain };

    Router::new()
        .route("/", get(explain_handler))
        .route("/api/explain", get(explain_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: AppConfig, explain: ExplainService) -> Result<()> {
    let app = build_router(explain);

    let addr: SocketAddr = config.bind_addr.parse()?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn explain_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = ExplainParams::from_pairs(pairs);
    let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());
    let format = ResponseFormat::from_accept(accept);

    let explanation = state.explain.explain(&params).await?;
    render_response(&explanation, format)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
