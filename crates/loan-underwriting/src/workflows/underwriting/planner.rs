use serde::{Deserialize, Serialize};

use super::domain::LoanApplication;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStage {
    CreditHistory,
    Employment,
    Collateral,
    CrossCheck,
    FinalDecision,
}

/// Rough reviewer effort implied by the application's complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReviewEffort {
    Low,
    Medium,
    High,
}

impl ReviewEffort {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewEffort::Low => "low",
            ReviewEffort::Medium => "medium",
            ReviewEffort::High => "high",
        }
    }

    pub const fn estimated_duration(self) -> &'static str {
        match self {
            ReviewEffort::Low => "2-3 minutes",
            ReviewEffort::Medium => "3-5 minutes",
            ReviewEffort::High => "5-7 minutes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationStep {
    pub stage: PlanStage,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationPlan {
    pub steps: Vec<VerificationStep>,
    pub complexity: f64,
    pub effort: ReviewEffort,
}

impl VerificationPlan {
    /// Deterministic five-step plan for one application.
    pub fn for_application(application: &LoanApplication) -> Self {
        let complexity = complexity_score(application);
        let effort = if complexity < 2.0 {
            ReviewEffort::Low
        } else if complexity < 4.0 {
            ReviewEffort::Medium
        } else {
            ReviewEffort::High
        };

        let steps = vec![
            VerificationStep {
                stage: PlanStage::CreditHistory,
                description: format!(
                    "analyze credit: {} existing loan(s), repayment {:.2}, income {:.2}",
                    application.existing_loans, application.repayment_score, application.income
                ),
            },
            VerificationStep {
                stage: PlanStage::Employment,
                description: format!(
                    "verify employment at {} for {} year(s)",
                    application.company_name, application.employment_years
                ),
            },
            VerificationStep {
                stage: PlanStage::Collateral,
                description: format!(
                    "assess collateral of {:.2} against loan amount {:.2}",
                    application.collateral_value, application.loan_amount
                ),
            },
            VerificationStep {
                stage: PlanStage::CrossCheck,
                description: "cross-check evaluator outputs for contradictions".to_string(),
            },
            VerificationStep {
                stage: PlanStage::FinalDecision,
                description: "synthesize verification results into a binding decision"
                    .to_string(),
            },
        ];

        Self {
            steps,
            complexity,
            effort,
        }
    }
}

pub fn complexity_score(application: &LoanApplication) -> f64 {
    let under_collateralized = if application.collateral_value < application.loan_amount {
        1.0
    } else {
        0.0
    };
    f64::from(application.existing_loans) * 0.5
        + (1.0 - application.repayment_score) * 2.0
        + under_collateralized
}
