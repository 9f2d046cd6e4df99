use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loan_underwriting::error::AppError;
use loan_underwriting::workflows::applications::{
    application_router, ApplicationRepository, DecisionNotifier, LoanApplicationService,
};
use loan_underwriting::workflows::underwriting::{
    narrative, LoanApplication, UnderwritingReport,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Stateless dry run: the full report without storing anything.
#[derive(Debug, Serialize)]
pub(crate) struct EvaluationResponse {
    pub(crate) report: UnderwritingReport,
    pub(crate) narrative: String,
}

pub(crate) fn with_application_routes<R, N>(
    service: Arc<LoanApplicationService<R, N>>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    N: DecisionNotifier + 'static,
{
    application_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/loans/evaluate",
            axum::routing::post(evaluate_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn evaluate_endpoint(
    Extension(state): Extension<AppState>,
    Json(application): Json<LoanApplication>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let pipeline = state.pipeline.clone();
    let report = tokio::task::spawn_blocking(move || pipeline.evaluate(&application))
        .await
        .map_err(std::io::Error::other)??;

    let narrative = narrative::render(&report);
    Ok(Json(EvaluationResponse { report, narrative }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryApplicationRepository, InMemoryNotifier};
    use loan_underwriting::workflows::underwriting::{DecisionCategory, PipelineCoordinator};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            pipeline: Arc::new(PipelineCoordinator::default()),
        }
    }

    fn strong_application() -> LoanApplication {
        LoanApplication {
            applicant_name: "Jordan Strong".to_string(),
            income: 120_000.0,
            loan_amount: 200_000.0,
            existing_loans: 1,
            repayment_score: 0.92,
            employment_years: 8.0,
            company_name: "Tech Corp".to_string(),
            collateral_value: 300_000.0,
        }
    }

    #[tokio::test]
    async fn evaluate_endpoint_returns_report_and_narrative() {
        let Json(body) = evaluate_endpoint(Extension(app_state(true)), Json(strong_application()))
            .await
            .expect("strong application evaluates");

        assert_eq!(body.report.decision.category, DecisionCategory::Approved);
        assert!(body.narrative.starts_with("Decision: APPROVED"));
    }

    #[tokio::test]
    async fn evaluate_endpoint_rejects_invalid_input_as_bad_request() {
        let application = LoanApplication {
            repayment_score: 1.4,
            ..strong_application()
        };

        let error = evaluate_endpoint(Extension(app_state(true)), Json(application))
            .await
            .expect_err("repayment score out of range");

        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let response = readiness_endpoint(Extension(app_state(false)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_route_is_mounted_beside_application_routes() {
        let service = Arc::new(LoanApplicationService::new(
            Arc::new(InMemoryApplicationRepository::default()),
            Arc::new(InMemoryNotifier::default()),
            Default::default(),
        ));
        let router = with_application_routes(service).layer(Extension(app_state(true)));

        let response = router
            .oneshot(
                axum::http::Request::get("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
