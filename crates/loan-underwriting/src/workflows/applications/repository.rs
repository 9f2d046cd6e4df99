use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ApplicationId, LoanApplicationStatus};
use crate::workflows::underwriting::{narrative, LoanApplication, UnderwritingReport};

/// Repository record containing the application, its status and the underwriting report.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub application: LoanApplication,
    pub status: LoanApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub report: Option<UnderwritingReport>,
}

impl ApplicationRecord {
    pub fn decision_rationale(&self) -> String {
        match (&self.report, self.status) {
            (Some(report), _) => report.decision.summary(),
            (None, LoanApplicationStatus::EvaluationFailed) => {
                "evaluation failed; no decision issued".to_string()
            }
            (None, _) => "pending evaluation".to_string(),
        }
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        let report = self.report.as_ref();
        ApplicationStatusView {
            application_id: self.id.clone(),
            applicant_name: self.application.applicant_name.clone(),
            status: self.status.label(),
            decision_rationale: self.decision_rationale(),
            aggregate_risk: report.map(|report| report.decision.aggregate_risk),
            requirements: report
                .map(|report| {
                    report
                        .decision
                        .requirements
                        .iter()
                        .map(|requirement| requirement.summary())
                        .collect()
                })
                .unwrap_or_default(),
            narrative: report.map(narrative::render),
            submitted_at: self.submitted_at,
            decided_at: self.decided_at,
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Most recently submitted first.
    fn recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for applicant/underwriter notifications (e-mail, queue, webhook adapters).
pub trait DecisionNotifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTemplate {
    ApplicationReceived,
    DecisionIssued,
}

impl NotificationTemplate {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationTemplate::ApplicationReceived => "application_received",
            NotificationTemplate::DecisionIssued => "decision_issued",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub template: NotificationTemplate,
    pub application_id: ApplicationId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub applicant_name: String,
    pub status: &'static str,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_risk: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}
