//! End-to-end underwriting scenarios exercised through the public pipeline, service facade and
//! HTTP router.

mod common {
    use std::sync::{Arc, Mutex};

    use loan_underwriting::workflows::applications::{
        ApplicationId, ApplicationRecord, ApplicationRepository, DecisionNotifier,
        LoanApplicationService, Notification, NotificationError, RepositoryError,
    };
    use loan_underwriting::workflows::underwriting::{LoanApplication, UnderwritingConfig};

    pub(super) fn applicant(
        name: &str,
        income: f64,
        loan_amount: f64,
        existing_loans: u32,
        repayment_score: f64,
        employment_years: f64,
        company_name: &str,
        collateral_value: f64,
    ) -> LoanApplication {
        LoanApplication {
            applicant_name: name.to_string(),
            income,
            loan_amount,
            existing_loans,
            repayment_score,
            employment_years,
            company_name: company_name.to_string(),
            collateral_value,
        }
    }

    pub(super) fn strong() -> LoanApplication {
        applicant(
            "Jordan Strong",
            120_000.0,
            200_000.0,
            1,
            0.92,
            8.0,
            "Tech Corp",
            300_000.0,
        )
    }

    pub(super) fn weak() -> LoanApplication {
        applicant(
            "Riley Weak", 35_000.0, 250_000.0, 4, 0.45, 1.0, "Startup", 50_000.0,
        )
    }

    pub(super) fn moderate() -> LoanApplication {
        applicant(
            "Morgan Moderate",
            60_000.0,
            180_000.0,
            3,
            0.72,
            3.5,
            "Innovation Labs",
            200_000.0,
        )
    }

    pub(super) fn extreme_dti() -> LoanApplication {
        applicant(
            "Casey Extreme",
            30_000.0,
            500_000.0,
            0,
            0.95,
            10.0,
            "Google",
            1_000_000.0,
        )
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<Vec<ApplicationRecord>>>,
    }

    impl ApplicationRepository for MemoryRepository {
        fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            if guard.iter().any(|existing| existing.id == record.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.push(record.clone());
            Ok(record)
        }

        fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            match guard.iter_mut().find(|existing| existing.id == record.id) {
                Some(existing) => {
                    *existing = record;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
        }

        fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.iter().find(|record| &record.id == id).cloned())
        }

        fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.iter().rev().take(limit).cloned().collect())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryNotifier {
        events: Arc<Mutex<Vec<Notification>>>,
    }

    impl MemoryNotifier {
        pub(super) fn events(&self) -> Vec<Notification> {
            self.events.lock().expect("notifier mutex poisoned").clone()
        }
    }

    impl DecisionNotifier for MemoryNotifier {
        fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
            self.events
                .lock()
                .expect("notifier mutex poisoned")
                .push(notification);
            Ok(())
        }
    }

    pub(super) fn service(
        config: UnderwritingConfig,
    ) -> (
        Arc<LoanApplicationService<MemoryRepository, MemoryNotifier>>,
        Arc<MemoryNotifier>,
    ) {
        let notifier = Arc::new(MemoryNotifier::default());
        let service = LoanApplicationService::new(
            Arc::new(MemoryRepository::default()),
            notifier.clone(),
            config,
        );
        (Arc::new(service), notifier)
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::*;
use loan_underwriting::config::parse_policy;
use loan_underwriting::workflows::applications::{application_router, NotificationTemplate};
use loan_underwriting::workflows::underwriting::{
    narrative, DecisionCategory, ExecutionMode, PipelineCoordinator, Recommendation,
    UnderwritingConfig,
};
use serde_json::Value;
use tower::ServiceExt;

#[test]
fn reference_applicants_land_in_expected_bands() {
    let pipeline = PipelineCoordinator::default();

    let strong = pipeline.decide(&strong()).expect("strong evaluates");
    assert_eq!(strong.category, DecisionCategory::Approved);
    assert_eq!(strong.passed_count, 3);
    assert!(strong.requirements.is_empty());

    let weak = pipeline.decide(&weak()).expect("weak evaluates");
    assert_eq!(weak.category, DecisionCategory::Rejected);
    assert!(weak
        .requirements
        .iter()
        .any(|requirement| matches!(requirement, Recommendation::IncreaseCollateral { .. })));

    let moderate = pipeline.decide(&moderate()).expect("moderate evaluates");
    assert_eq!(moderate.category, DecisionCategory::Rejected);
    assert_eq!(moderate.passed_count, 2);

    let extreme = pipeline.decide(&extreme_dti()).expect("extreme evaluates");
    assert_eq!(extreme.category, DecisionCategory::Rejected);
    assert_eq!(extreme.aggregate_risk, 1.0);
}

#[test]
fn execution_modes_agree_on_every_reference_applicant() {
    let concurrent = PipelineCoordinator::default();
    let sequential = PipelineCoordinator::new(UnderwritingConfig {
        execution: ExecutionMode::Sequential,
        ..UnderwritingConfig::default()
    });

    for application in [strong(), weak(), moderate(), extreme_dti()] {
        let left = concurrent.evaluate(&application).expect("concurrent run");
        let right = sequential.evaluate(&application).expect("sequential run");
        assert_eq!(left, right, "{}", application.applicant_name);
    }
}

#[test]
fn policy_document_changes_outcome_without_code_changes() {
    let covered = common::applicant(
        "Morgan Moderate",
        60_000.0,
        180_000.0,
        3,
        0.72,
        3.5,
        "Innovation Labs",
        230_000.0,
    );

    let default_decision = PipelineCoordinator::default()
        .decide(&covered)
        .expect("default policy evaluates");
    assert_eq!(default_decision.category, DecisionCategory::Conditional);

    let relaxed = parse_policy(r#"{ "decision": { "approve_max_risk": 0.35 } }"#)
        .expect("policy parses");
    let relaxed_decision = PipelineCoordinator::new(relaxed)
        .decide(&covered)
        .expect("relaxed policy evaluates");
    assert_eq!(relaxed_decision.category, DecisionCategory::Approved);
}

#[test]
fn narrative_reflects_the_binding_decision() {
    let report = PipelineCoordinator::default()
        .evaluate(&weak())
        .expect("weak evaluates");
    let text = narrative::render(&report);

    assert!(text.starts_with("Decision: REJECTED"));
    assert!(text.contains("Decision Rationale:"));
}

#[tokio::test]
async fn application_round_trips_through_http() {
    let (service, notifier) = service(UnderwritingConfig::default());
    let router = application_router(service);

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/loans/applications")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&strong()).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = serde_json::from_slice(
        &axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap(),
    )
    .unwrap();
    let id = created["application_id"].as_str().unwrap().to_string();

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/loans/applications/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = serde_json::from_slice(
        &axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(fetched["status"], "approved");
    assert_eq!(fetched["application_id"], id.as_str());

    let templates: Vec<NotificationTemplate> = notifier
        .events()
        .iter()
        .map(|event| event.template)
        .collect();
    assert_eq!(
        templates,
        vec![
            NotificationTemplate::ApplicationReceived,
            NotificationTemplate::DecisionIssued
        ]
    );
}

#[tokio::test]
async fn malformed_application_is_unprocessable() {
    let (service, notifier) = service(UnderwritingConfig::default());
    let router = application_router(service);

    let mut application = strong();
    application.repayment_score = -0.1;

    let response = router
        .oneshot(
            Request::post("/api/v1/loans/applications")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&application).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(notifier.events().is_empty());
}
