use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hashchain_core::{Block, Chain, ChainError};
use hashchain_storage::MemoryStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error};

use crate::constants::MAX_MINE_BODY_BYTES;

pub type NodeChain = Chain<MemoryStore>;

#[derive(Clone)]
pub struct AppState {
    pub chain: NodeChain,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Head {
    pub height: u64,
    pub hash: String,
    pub difficulty: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Validity {
    pub valid: bool,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct MineRequest {
    data: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("block {0} not found")]
    NotFound(u64),

    #[error("mining task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Chain(ChainError::ProofOfWorkTimeout { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Chain(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route("/blocks", get(list_blocks))
        .route("/blocks/{index}", get(get_block))
        .route(
            "/mine",
            post(mine).layer(DefaultBodyLimit::max(MAX_MINE_BODY_BYTES)),
        )
        .route("/chain/head", get(head))
        .route("/chain/valid", get(validity))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_blocks(State(state): State<AppState>) -> Result<Json<Vec<Block>>, ApiError> {
    Ok(Json(state.chain.snapshot()?))
}

async fn get_block(
    State(state): State<AppState>,
    Path(index): Path<u64>,
) -> Result<Json<Block>, ApiError> {
    state
        .chain
        .block(index)?
        .map(Json)
        .ok_or(ApiError::NotFound(index))
}

/// A missing or malformed body mines a block with empty data.
async fn mine(State(state): State<AppState>, body: Bytes) -> Result<Json<Block>, ApiError> {
    let request: MineRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!(error = %e, "unreadable mine request, using empty data");
        MineRequest::default()
    });
    let chain = state.chain.clone();
    let block = tokio::task::spawn_blocking(move || chain.append(request.data)).await??;
    Ok(Json(block))
}

async fn head(State(state): State<AppState>) -> Result<Json<Head>, ApiError> {
    let tip = state.chain.tip()?;
    Ok(Json(Head {
        height: tip.index,
        hash: tip.hash,
        difficulty: state.chain.config().difficulty,
    }))
}

async fn validity(State(state): State<AppState>) -> Result<Json<Validity>, ApiError> {
    Ok(Json(Validity {
        valid: state.chain.is_valid()?,
    }))
}
