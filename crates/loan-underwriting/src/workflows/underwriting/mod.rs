//! Loan underwriting pipeline: guard, three independent evaluators, consistency critique and
//! decision synthesis.

pub mod config;
pub mod consistency;
pub mod decision;
pub mod domain;
pub mod evaluators;
pub mod guard;
pub mod narrative;
pub mod pipeline;
pub mod planner;

pub use config::{
    CollateralPolicy, ConsistencyPolicy, CreditPolicy, DecisionPolicy, DtiBasis,
    EmploymentPolicy, ExecutionMode, KnownEmployers, PolicyError, UnderwritingConfig,
};
pub use consistency::{ConsistencyChecker, ConsistencyReport, Inconsistency};
pub use decision::{
    Decision, DecisionCategory, DecisionSynthesizer, Recommendation, RiskBreakdown,
};
pub use domain::{
    CoverageCategory, CreditRiskCategory, DegenerateInput, DtiCategory, EmployerStanding,
    EmploymentStability, EvaluatorKind, Fact, FactKind, FactValue, LoanApplication,
    LtvCategory,
};
pub use evaluators::{
    CollateralAssessment, CollateralEvaluator, CreditAssessment, CreditRiskEvaluator,
    EmploymentAssessment, EmploymentEvaluator, Evaluator, EvaluatorFault, EvaluatorResult,
};
pub use guard::{ApplicationGuard, ApplicationViolation};
pub use pipeline::{PipelineCoordinator, UnderwritingError, UnderwritingReport};
pub use planner::{PlanStage, ReviewEffort, VerificationPlan, VerificationStep};

#[cfg(test)]
mod tests;
