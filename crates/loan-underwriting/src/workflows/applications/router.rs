use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::ApplicationId;
use super::repository::{ApplicationRepository, DecisionNotifier, RepositoryError};
use super::service::{ApplicationServiceError, LoanApplicationService};
use crate::workflows::underwriting::{LoanApplication, UnderwritingError};

const DEFAULT_HISTORY_LIMIT: usize = 20;
const MAX_HISTORY_LIMIT: usize = 200;

/// Router builder exposing HTTP endpoints for intake, decision lookup and history.
pub fn application_router<R, N>(service: Arc<LoanApplicationService<R, N>>) -> Router
where
    R: ApplicationRepository + 'static,
    N: DecisionNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/loans/applications",
            post(submit_handler::<R, N>).get(history_handler::<R, N>),
        )
        .route(
            "/api/v1/loans/applications/:application_id",
            get(status_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryQuery {
    limit: Option<usize>,
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<LoanApplicationService<R, N>>>,
    axum::Json(application): axum::Json<LoanApplication>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: DecisionNotifier + 'static,
{
    // Evaluation fans out to worker threads; keep it off the async executor.
    let outcome =
        tokio::task::spawn_blocking(move || service.submit_and_evaluate(application)).await;

    let result = match outcome {
        Ok(result) => result,
        Err(join_error) => {
            error!(%join_error, "underwriting task aborted");
            let payload = json!({
                "error": "underwriting task aborted",
            });
            return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
        }
    };

    match result {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(ApplicationServiceError::Underwriting(UnderwritingError::InvalidApplication(
            violation,
        ))) => {
            let payload = json!({
                "error": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ApplicationServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "application already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<LoanApplicationService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: DecisionNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "application_id": id.0,
                "error": "application not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn history_handler<R, N>(
    State(service): State<Arc<LoanApplicationService<R, N>>>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: DecisionNotifier + 'static,
{
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    match service.history(limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            let payload = json!({
                "count": views.len(),
                "applications": views,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
