//! HTTP routes for the manifest store protocol
//!
//! - `POST /manifests`: store a manifest; 201 when new, 200 when replaced
//! - `GET /manifests/{did}`: fetch a manifest; 404 when absent
//! - `GET /health`: liveness and manifest count

use aims_core::Manifest;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::state::RegistryState;

/// Body returned by a successful publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub did: String,
    pub revision: u64,
}

/// Build the registry router over `state`
pub fn router(state: RegistryState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/manifests", post(publish_manifest))
        .route("/manifests/{did}", get(get_manifest))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<RegistryState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "manifests": state.len() }))
}

/// Identifiers are stored as given; only layer content is validated.
async fn publish_manifest(
    State(state): State<RegistryState>,
    Json(manifest): Json<Manifest>,
) -> Response {
    if let Err(e) = manifest.validate() {
        warn!(did = %manifest.did, error = %e, "Rejected invalid manifest");
        return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response();
    }

    let did = manifest.did.clone();
    let outcome = state.upsert(manifest);
    info!(did = %did, revision = outcome.revision, created = outcome.created, "Stored manifest");

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let receipt = PublishReceipt {
        did,
        revision: outcome.revision,
    };
    (status, Json(receipt)).into_response()
}

async fn get_manifest(
    State(state): State<RegistryState>,
    Path(did): Path<String>,
) -> Result<Json<Manifest>, StatusCode> {
    match state.get(&did) {
        Some(stored) => {
            debug!(did = %did, revision = stored.revision, "Serving manifest");
            Ok(Json(stored.manifest))
        }
        None => {
            debug!(did = %did, "Manifest not found");
            Err(StatusCode::NOT_FOUND)
        }
    }
}
