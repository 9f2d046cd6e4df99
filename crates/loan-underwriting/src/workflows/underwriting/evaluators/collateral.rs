use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::config::CollateralPolicy;
use super::super::domain::{
    CoverageCategory, EvaluatorKind, Fact, FactKind, FactValue, LoanApplication, LtvCategory,
};
use super::{ensure_defined, Evaluator, EvaluatorFault};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralAssessment {
    /// `+inf` when no collateral is pledged.
    pub loan_to_value: f64,
    pub ltv_category: LtvCategory,
    pub margin_applied: f64,
    pub effective_collateral: f64,
    pub coverage_ratio: f64,
    pub coverage_category: CoverageCategory,
    pub sufficient: bool,
    pub passed: bool,
    pub facts: Vec<Fact>,
}

impl CollateralAssessment {
    /// Amount by which effective collateral misses the loan, as a percentage of the loan.
    pub fn shortfall_pct(&self) -> f64 {
        ((1.0 - self.coverage_ratio) * 100.0).max(0.0)
    }
}

/// Effective collateral equal to the loan amount.
const FULL_COVERAGE: f64 = 1.0;

pub struct CollateralEvaluator {
    policy: CollateralPolicy,
}

impl CollateralEvaluator {
    pub fn new(policy: CollateralPolicy) -> Self {
        Self { policy }
    }

    pub fn ltv_category(&self, loan_to_value: f64) -> LtvCategory {
        if loan_to_value <= self.policy.standard_ltv_max {
            LtvCategory::Standard
        } else if loan_to_value <= self.policy.acceptable_ltv_max {
            LtvCategory::Acceptable
        } else {
            LtvCategory::High
        }
    }

    pub fn coverage_category(&self, coverage_ratio: f64) -> CoverageCategory {
        if coverage_ratio >= self.policy.coverage_low_risk_min {
            CoverageCategory::LowRisk
        } else if coverage_ratio >= self.policy.coverage_acceptable_min {
            CoverageCategory::Acceptable
        } else if coverage_ratio >= self.policy.coverage_marginal_min {
            CoverageCategory::Marginal
        } else {
            CoverageCategory::Insufficient
        }
    }
}

impl Evaluator for CollateralEvaluator {
    type Assessment = CollateralAssessment;

    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Collateral
    }

    fn evaluate(
        &self,
        application: &LoanApplication,
    ) -> Result<CollateralAssessment, EvaluatorFault> {
        let kind = self.kind();
        let margin_applied = self.policy.standard_ltv_margin;

        let loan_to_value = if application.collateral_value > 0.0 {
            application.loan_amount / application.collateral_value
        } else {
            f64::INFINITY
        };
        let loan_to_value = ensure_defined(kind, "loan-to-value", loan_to_value)?;

        let effective_collateral = application.collateral_value * margin_applied;
        let coverage_ratio = ensure_defined(
            kind,
            "coverage ratio",
            effective_collateral / application.loan_amount,
        )?;

        let ltv_category = self.ltv_category(loan_to_value);
        let coverage_category = if application.collateral_value > 0.0 {
            self.coverage_category(coverage_ratio)
        } else {
            CoverageCategory::Insufficient
        };

        let sufficient = application.collateral_value > 0.0 && coverage_ratio >= FULL_COVERAGE;
        let passed = sufficient && coverage_ratio >= self.policy.coverage_acceptable_min;

        let difference = effective_collateral - application.loan_amount;
        let mut facts = vec![
            Fact::new(
                FactKind::CollateralValue,
                FactValue::Money(application.collateral_value),
            ),
            Fact::new(FactKind::LoanToValue, FactValue::Ratio(loan_to_value)),
            Fact::new(FactKind::MarginApplied, FactValue::Ratio(margin_applied)),
            Fact::new(
                FactKind::EffectiveCollateral,
                FactValue::Money(effective_collateral),
            ),
            Fact::new(FactKind::CoverageRatio, FactValue::Ratio(coverage_ratio)),
        ];
        if difference >= 0.0 {
            facts.push(Fact::new(
                FactKind::CollateralSurplus,
                FactValue::Money(difference),
            ));
        } else {
            facts.push(Fact::new(
                FactKind::CollateralShortfall,
                FactValue::Money(-difference),
            ));
        }

        debug!(
            ltv = loan_to_value,
            coverage = coverage_ratio,
            category = coverage_category.label(),
            passed,
            "collateral assessment complete"
        );

        Ok(CollateralAssessment {
            loan_to_value,
            ltv_category,
            margin_applied,
            effective_collateral,
            coverage_ratio,
            coverage_category,
            sufficient,
            passed,
            facts,
        })
    }
}
