//! The three independent scoring steps. None reads another's output, so the coordinator is
//! free to run them in any order or in parallel.

mod collateral;
mod credit;
mod employment;

pub use collateral::{CollateralAssessment, CollateralEvaluator};
pub use credit::{CreditAssessment, CreditRiskEvaluator};
pub use employment::{EmploymentAssessment, EmploymentEvaluator};

use super::domain::{EvaluatorKind, Fact, LoanApplication};

/// A scoring step that turns an application into its own immutable assessment.
pub trait Evaluator: Send + Sync {
    type Assessment: Send;

    fn kind(&self) -> EvaluatorKind;

    fn evaluate(&self, application: &LoanApplication) -> Result<Self::Assessment, EvaluatorFault>;
}

/// Unexpected internal failure inside one evaluator. Aborts the whole pipeline run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} evaluator failed: {reason}", .evaluator.label())]
pub struct EvaluatorFault {
    pub evaluator: EvaluatorKind,
    pub reason: String,
}

impl EvaluatorFault {
    pub fn new(evaluator: EvaluatorKind, reason: impl Into<String>) -> Self {
        Self {
            evaluator,
            reason: reason.into(),
        }
    }
}

/// NaN never arises from a valid application; seeing one means the arithmetic is broken.
pub(crate) fn ensure_defined(
    evaluator: EvaluatorKind,
    name: &str,
    value: f64,
) -> Result<f64, EvaluatorFault> {
    if value.is_nan() {
        Err(EvaluatorFault::new(
            evaluator,
            format!("{name} evaluated to NaN"),
        ))
    } else {
        Ok(value)
    }
}

/// Uniform read-only view over the three assessments, used for audit trails.
#[derive(Debug, Clone, Copy)]
pub enum EvaluatorResult<'a> {
    Credit(&'a CreditAssessment),
    Employment(&'a EmploymentAssessment),
    Collateral(&'a CollateralAssessment),
}

impl<'a> EvaluatorResult<'a> {
    pub fn kind(&self) -> EvaluatorKind {
        match self {
            EvaluatorResult::Credit(_) => EvaluatorKind::Credit,
            EvaluatorResult::Employment(_) => EvaluatorKind::Employment,
            EvaluatorResult::Collateral(_) => EvaluatorKind::Collateral,
        }
    }

    pub fn passed(&self) -> bool {
        match self {
            EvaluatorResult::Credit(credit) => credit.passed,
            EvaluatorResult::Employment(employment) => employment.passed,
            EvaluatorResult::Collateral(collateral) => collateral.passed,
        }
    }

    /// Credit score, employer verification confidence, or effective coverage ratio.
    pub fn sub_score(&self) -> f64 {
        match self {
            EvaluatorResult::Credit(credit) => credit.credit_score,
            EvaluatorResult::Employment(employment) => employment.verification_confidence,
            EvaluatorResult::Collateral(collateral) => collateral.coverage_ratio,
        }
    }

    pub fn category_label(&self) -> &'static str {
        match self {
            EvaluatorResult::Credit(credit) => credit.risk_category.label(),
            EvaluatorResult::Employment(employment) => employment.stability.label(),
            EvaluatorResult::Collateral(collateral) => collateral.coverage_category.label(),
        }
    }

    pub fn facts(&self) -> &'a [Fact] {
        match self {
            EvaluatorResult::Credit(credit) => &credit.facts,
            EvaluatorResult::Employment(employment) => &employment.facts,
            EvaluatorResult::Collateral(collateral) => &collateral.facts,
        }
    }
}
