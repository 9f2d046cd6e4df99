use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::underwriting::DecisionCategory;

/// Identifier assigned at intake, e.g. `loan-000042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a stored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanApplicationStatus {
    Submitted,
    Approved,
    Conditional,
    Rejected,
    /// An evaluator faulted; no decision was produced.
    EvaluationFailed,
}

impl LoanApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoanApplicationStatus::Submitted => "submitted",
            LoanApplicationStatus::Approved => "approved",
            LoanApplicationStatus::Conditional => "conditional",
            LoanApplicationStatus::Rejected => "rejected",
            LoanApplicationStatus::EvaluationFailed => "evaluation_failed",
        }
    }

    /// A decision has been issued and is final. A failed evaluation produced no decision and
    /// may be retried.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoanApplicationStatus::Approved
                | LoanApplicationStatus::Conditional
                | LoanApplicationStatus::Rejected
        )
    }
}

impl From<DecisionCategory> for LoanApplicationStatus {
    fn from(value: DecisionCategory) -> Self {
        match value {
            DecisionCategory::Approved => LoanApplicationStatus::Approved,
            DecisionCategory::Conditional => LoanApplicationStatus::Conditional,
            DecisionCategory::Rejected => LoanApplicationStatus::Rejected,
        }
    }
}
