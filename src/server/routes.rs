//! Axum HTTP routes for the query API.

use crate::config::ServeConfig;
use crate::db::reader;
use crate::error::{ServerError, ServerResult};
use crate::server::context::AppState;
use crate::types::{AssetClassBreakdown, InvestorDetail, InvestorSummary};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

// ─── Route builder ───────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    // Any origin, method and header; credentials stay disallowed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/investors", get(list_investors))
        .route("/investor/:investor_id", get(get_investor))
        .route("/investor/:investor_id/asset-classes", get(get_asset_classes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ─── Handlers ────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "investor-commitments",
    }))
}

async fn list_investors(State(state): State<AppState>) -> ServerResult<Json<Vec<InvestorSummary>>> {
    let investors = state.with_connection(reader::list_investors).await?;
    Ok(Json(investors))
}

async fn get_investor(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ServerResult<Json<InvestorDetail>> {
    let investor_id = parse_investor_id(&raw_id)?;
    let detail = state
        .with_connection(move |conn| reader::investor_commitments(conn, investor_id))
        .await?;
    Ok(Json(detail))
}

async fn get_asset_classes(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ServerResult<Json<AssetClassBreakdown>> {
    let investor_id = parse_investor_id(&raw_id)?;
    let totals = state
        .with_connection(move |conn| reader::investor_asset_classes(conn, investor_id))
        .await?;
    Ok(Json(AssetClassBreakdown::new(investor_id, totals)))
}

/// Path ids are taken as text and parsed here so a bad id gets the same
/// JSON error body as every other failure.
fn parse_investor_id(raw: &str) -> ServerResult<i64> {
    raw.parse::<i64>().map_err(|e| ServerError::InvalidParameter {
        name: "investor_id".to_string(),
        reason: format!("'{}' is not an integer: {}", raw, e),
    })
}

// ─── Server startup ──────────────────────────────────────────────

/// Start the query service and run until Ctrl+C
pub async fn serve(config: ServeConfig) -> ServerResult<()> {
    let state = AppState::new(config.db_path);
    if !state.db_path().exists() {
        tracing::warn!(
            db = %state.db_path().display(),
            "store does not exist yet; requests will fail until it is loaded"
        );
    }

    info!(addr = %config.addr, db = %state.db_path().display(), "query service listening");
    let router = build_router(state);

    eprintln!("Query service listening on http://{}", config.addr);
    eprintln!("API endpoints:");
    eprintln!("  GET  /health");
    eprintln!("  GET  /investors");
    eprintln!("  GET  /investor/:investor_id");
    eprintln!("  GET  /investor/:investor_id/asset-classes");

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    eprintln!("\nShutting down gracefully...");
}
