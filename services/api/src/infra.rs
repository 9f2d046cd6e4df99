use loan_underwriting::config::load_policy;
use loan_underwriting::error::AppError;
use loan_underwriting::workflows::applications::{
    ApplicationId, ApplicationRecord, ApplicationRepository, DecisionNotifier, Notification,
    NotificationError, RepositoryError,
};
use loan_underwriting::workflows::underwriting::{
    LoanApplication, PipelineCoordinator, UnderwritingConfig,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) pipeline: Arc<PipelineCoordinator>,
}

/// Insertion-ordered store; nothing survives a restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<Vec<ApplicationRecord>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
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

/// Keeps notifications in memory so the demo can print what would have been sent.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl DecisionNotifier for InMemoryNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotifier {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

/// Policy from `--policy` when given, otherwise the defaults.
pub(crate) fn policy_or_default(path: Option<&Path>) -> Result<UnderwritingConfig, AppError> {
    match path {
        Some(path) => Ok(load_policy(path)?),
        None => Ok(UnderwritingConfig::default()),
    }
}

pub(crate) fn read_application(path: &Path) -> Result<LoanApplication, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let application = serde_json::from_str(&raw).map_err(std::io::Error::from)?;
    Ok(application)
}
