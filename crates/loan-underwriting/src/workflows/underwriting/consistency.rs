use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::ConsistencyPolicy;
use super::domain::{CreditRiskCategory, DtiCategory, EmploymentStability, LtvCategory};
use super::evaluators::{CollateralAssessment, CreditAssessment, EmploymentAssessment};

/// Cross-evaluator findings. All but [`Inconsistency::AllFailedConfirmsHighRisk`] are
/// contradictions that cost confidence and trigger review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inconsistency {
    CreditEmploymentMismatch,
    HighRiskDespiteStrongEmployment,
    CriticalHighRiskInsufficientCollateral,
    LowRiskHighLtv,
    PassedWithConcerningDti,
    AllFailedConfirmsHighRisk,
}

impl Inconsistency {
    pub const fn is_contradiction(self) -> bool {
        !matches!(self, Inconsistency::AllFailedConfirmsHighRisk)
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Inconsistency::CreditEmploymentMismatch => {
                "credit/employment mismatch: low credit risk with concerning employment stability"
            }
            Inconsistency::HighRiskDespiteStrongEmployment => {
                "unexpected high credit risk despite strong employment"
            }
            Inconsistency::CriticalHighRiskInsufficientCollateral => {
                "critical: high credit risk with insufficient collateral"
            }
            Inconsistency::LowRiskHighLtv => "unusual: low credit risk but high loan-to-value",
            Inconsistency::PassedWithConcerningDti => {
                "all verifications passed but debt-to-income is concerning"
            }
            Inconsistency::AllFailedConfirmsHighRisk => {
                "all verifications failed, confirming a high-risk profile"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub inconsistency_count: usize,
    pub inconsistencies: Vec<Inconsistency>,
    pub confidence_score: f64,
    pub requires_review: bool,
}

impl ConsistencyReport {
    pub fn contradiction_count(&self) -> usize {
        self.inconsistencies
            .iter()
            .filter(|finding| finding.is_contradiction())
            .count()
    }

    pub fn summary(&self) -> String {
        if self.inconsistencies.is_empty() {
            return "all verifications are internally consistent".to_string();
        }
        let findings: Vec<&str> = self
            .inconsistencies
            .iter()
            .map(|finding| finding.summary())
            .collect();
        findings.join("; ")
    }
}

type Rule = fn(
    &CreditAssessment,
    &EmploymentAssessment,
    &CollateralAssessment,
) -> Option<Inconsistency>;

const RULES: [Rule; 6] = [
    credit_employment_mismatch,
    high_risk_despite_strong_employment,
    high_risk_insufficient_collateral,
    low_risk_high_ltv,
    passed_with_concerning_dti,
    all_failed,
];

pub fn credit_employment_mismatch(
    credit: &CreditAssessment,
    employment: &EmploymentAssessment,
    _collateral: &CollateralAssessment,
) -> Option<Inconsistency> {
    (credit.risk_category == CreditRiskCategory::Low
        && employment.stability == EmploymentStability::Concerning)
        .then_some(Inconsistency::CreditEmploymentMismatch)
}

pub fn high_risk_despite_strong_employment(
    credit: &CreditAssessment,
    employment: &EmploymentAssessment,
    _collateral: &CollateralAssessment,
) -> Option<Inconsistency> {
    (credit.risk_category == CreditRiskCategory::High && employment.stability.is_strong())
        .then_some(Inconsistency::HighRiskDespiteStrongEmployment)
}

pub fn high_risk_insufficient_collateral(
    credit: &CreditAssessment,
    _employment: &EmploymentAssessment,
    collateral: &CollateralAssessment,
) -> Option<Inconsistency> {
    (credit.risk_category == CreditRiskCategory::High && !collateral.sufficient)
        .then_some(Inconsistency::CriticalHighRiskInsufficientCollateral)
}

pub fn low_risk_high_ltv(
    credit: &CreditAssessment,
    _employment: &EmploymentAssessment,
    collateral: &CollateralAssessment,
) -> Option<Inconsistency> {
    (credit.risk_category == CreditRiskCategory::Low
        && collateral.ltv_category == LtvCategory::High)
        .then_some(Inconsistency::LowRiskHighLtv)
}

/// Cannot fire with the default credit pass rule, which already fails on a high DTI.
pub fn passed_with_concerning_dti(
    credit: &CreditAssessment,
    employment: &EmploymentAssessment,
    collateral: &CollateralAssessment,
) -> Option<Inconsistency> {
    (credit.passed
        && employment.passed
        && collateral.passed
        && credit.dti_category == DtiCategory::High)
        .then_some(Inconsistency::PassedWithConcerningDti)
}

pub fn all_failed(
    credit: &CreditAssessment,
    employment: &EmploymentAssessment,
    collateral: &CollateralAssessment,
) -> Option<Inconsistency> {
    (!credit.passed && !employment.passed && !collateral.passed)
        .then_some(Inconsistency::AllFailedConfirmsHighRisk)
}

/// Critique step. Reads only the three assessments; holds no state between calls.
pub struct ConsistencyChecker {
    policy: ConsistencyPolicy,
}

impl ConsistencyChecker {
    pub fn new(policy: ConsistencyPolicy) -> Self {
        Self { policy }
    }

    pub fn check(
        &self,
        credit: &CreditAssessment,
        employment: &EmploymentAssessment,
        collateral: &CollateralAssessment,
    ) -> ConsistencyReport {
        let inconsistencies: Vec<Inconsistency> = RULES
            .iter()
            .filter_map(|rule| rule(credit, employment, collateral))
            .collect();

        let contradictions = inconsistencies
            .iter()
            .filter(|finding| finding.is_contradiction())
            .count();
        let confidence_score =
            (1.0 - self.policy.contradiction_penalty * contradictions as f64).clamp(0.0, 1.0);

        let report = ConsistencyReport {
            inconsistency_count: inconsistencies.len(),
            inconsistencies,
            confidence_score,
            requires_review: contradictions > 0,
        };

        debug!(
            inconsistencies = report.inconsistency_count,
            contradictions,
            confidence = report.confidence_score,
            "consistency check complete"
        );

        report
    }
}
