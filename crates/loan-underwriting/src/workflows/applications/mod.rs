//! Loan application intake: id assignment, storage and notification around the underwriting
//! pipeline, plus the HTTP routes in front of it.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationId, LoanApplicationStatus};
pub use repository::{
    ApplicationRecord, ApplicationRepository, ApplicationStatusView, DecisionNotifier,
    Notification, NotificationError, NotificationTemplate, RepositoryError,
};
pub use router::application_router;
pub use service::{ApplicationServiceError, LoanApplicationService};
