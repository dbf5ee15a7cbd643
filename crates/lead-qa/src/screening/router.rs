use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::LeadId;
use super::store::{ResultStore, StoreError};

/// Router builder exposing read-only reporting endpoints over the result store.
pub fn results_router<S>(store: Arc<S>) -> Router
where
    S: ResultStore + 'static,
{
    Router::new()
        .route("/api/v1/leads", get(list_handler::<S>))
        .route("/api/v1/leads/stats", get(stats_handler::<S>))
        .route("/api/v1/leads/:lead_id", get(lookup_handler::<S>))
        .with_state(store)
}

pub(crate) async fn list_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: ResultStore + 'static,
{
    match query_store(store, |store| store.list_all()).await {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn stats_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: ResultStore + 'static,
{
    match query_store(store, |store| store.stats_by_verdict()).await {
        Ok(stats) => {
            let payload = json!({
                "total": stats.total(),
                "by_decision": stats,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => store_failure(error),
    }
}

pub(crate) async fn lookup_handler<S>(
    State(store): State<Arc<S>>,
    Path(lead_id): Path<String>,
) -> Response
where
    S: ResultStore + 'static,
{
    let id = LeadId(lead_id);
    let key = id.clone();
    match query_store(store, move |store| store.get(&key)).await {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("lead {id} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => store_failure(error),
    }
}

/// Runs a store query on the blocking pool; SQLite calls hold a connection lock.
async fn query_store<S, T, F>(store: Arc<S>, query: F) -> Result<T, StoreError>
where
    S: ResultStore + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || query(store.as_ref()))
        .await
        .map_err(|err| StoreError::Unavailable(format!("store task failed: {err}")))?
}

fn store_failure(error: StoreError) -> Response {
    tracing::error!(%error, "result store query failed");
    let payload = json!({
        "error": "result store unavailable",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
