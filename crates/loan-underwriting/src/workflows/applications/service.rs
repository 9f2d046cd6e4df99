use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{ApplicationId, LoanApplicationStatus};
use super::repository::{
    ApplicationRecord, ApplicationRepository, DecisionNotifier, Notification, NotificationError,
    NotificationTemplate, RepositoryError,
};
use crate::workflows::underwriting::{
    ApplicationGuard, LoanApplication, PipelineCoordinator, UnderwritingConfig, UnderwritingError,
};

/// Service composing intake validation, storage, the underwriting pipeline and notifications.
pub struct LoanApplicationService<R, N> {
    guard: ApplicationGuard,
    repository: Arc<R>,
    notifier: Arc<N>,
    pipeline: Arc<PipelineCoordinator>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("loan-{id:06}"))
}

impl<R, N> LoanApplicationService<R, N>
where
    R: ApplicationRepository + 'static,
    N: DecisionNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: UnderwritingConfig) -> Self {
        Self::with_pipeline(repository, notifier, Arc::new(PipelineCoordinator::new(config)))
    }

    pub fn with_pipeline(
        repository: Arc<R>,
        notifier: Arc<N>,
        pipeline: Arc<PipelineCoordinator>,
    ) -> Self {
        Self {
            guard: ApplicationGuard,
            repository,
            notifier,
            pipeline,
        }
    }

    /// Validate and store a new application without evaluating it.
    pub fn submit(
        &self,
        application: LoanApplication,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        self.guard
            .check(&application)
            .map_err(UnderwritingError::from)?;

        let record = ApplicationRecord {
            id: next_application_id(),
            application,
            status: LoanApplicationStatus::Submitted,
            submitted_at: Utc::now(),
            decided_at: None,
            report: None,
        };

        let stored = self.repository.insert(record)?;
        info!(application_id = %stored.id, "loan application received");

        self.notifier.notify(Notification {
            template: NotificationTemplate::ApplicationReceived,
            application_id: stored.id.clone(),
            details: BTreeMap::new(),
        })?;

        Ok(stored)
    }

    /// Run the pipeline for a stored application and persist the outcome.
    pub fn evaluate(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let mut record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status.is_terminal() {
            warn!(
                application_id = %record.id,
                status = record.status.label(),
                "decision already issued"
            );
            return Err(ApplicationServiceError::AlreadyDecided {
                id: record.id,
                status: record.status,
            });
        }

        let report = match self.pipeline.evaluate(&record.application) {
            Ok(report) => report,
            Err(error) => {
                warn!(application_id = %record.id, %error, "underwriting failed");
                record.status = LoanApplicationStatus::EvaluationFailed;
                self.repository.update(record)?;
                return Err(error.into());
            }
        };

        let category = report.decision.category;
        let mut details = BTreeMap::new();
        details.insert("decision".to_string(), category.label().to_string());
        details.insert(
            "aggregate_risk".to_string(),
            format!("{:.4}", report.decision.aggregate_risk),
        );

        record.status = LoanApplicationStatus::from(category);
        record.decided_at = Some(Utc::now());
        record.report = Some(report);
        self.repository.update(record.clone())?;

        info!(
            application_id = %record.id,
            status = record.status.label(),
            "loan decision recorded"
        );

        self.notifier.notify(Notification {
            template: NotificationTemplate::DecisionIssued,
            application_id: record.id.clone(),
            details,
        })?;

        Ok(record)
    }

    pub fn submit_and_evaluate(
        &self,
        application: LoanApplication,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.submit(application)?;
        self.evaluate(&record.id)
    }

    /// Fetch an application and current status for API responses.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn history(&self, limit: usize) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.repository.recent(limit)?)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Underwriting(#[from] UnderwritingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("application {id} already has a final decision ({})", .status.label())]
    AlreadyDecided {
        id: ApplicationId,
        status: LoanApplicationStatus,
    },
}
