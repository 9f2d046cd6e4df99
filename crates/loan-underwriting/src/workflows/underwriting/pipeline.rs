use std::panic::{self, AssertUnwindSafe};
use std::thread;

use serde::Serialize;
use tracing::{info, warn};

use super::config::{ExecutionMode, UnderwritingConfig};
use super::consistency::{ConsistencyChecker, ConsistencyReport};
use super::decision::{Decision, DecisionSynthesizer};
use super::domain::{DegenerateInput, EvaluatorKind, LoanApplication};
use super::evaluators::{
    CollateralAssessment, CollateralEvaluator, CreditAssessment, CreditRiskEvaluator,
    EmploymentAssessment, EmploymentEvaluator, Evaluator, EvaluatorFault, EvaluatorResult,
};
use super::guard::{ApplicationGuard, ApplicationViolation};
use super::planner::VerificationPlan;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnderwritingError {
    #[error("invalid application: {0}")]
    InvalidApplication(#[from] ApplicationViolation),
    #[error(transparent)]
    EvaluatorFailure(#[from] EvaluatorFault),
}

/// Everything one pipeline run produced, kept together so callers can render an audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderwritingReport {
    pub plan: VerificationPlan,
    pub degenerate_inputs: Vec<DegenerateInput>,
    pub credit: CreditAssessment,
    pub employment: EmploymentAssessment,
    pub collateral: CollateralAssessment,
    pub consistency: ConsistencyReport,
    pub decision: Decision,
}

impl UnderwritingReport {
    pub fn evaluator_results(&self) -> [EvaluatorResult<'_>; 3] {
        [
            EvaluatorResult::Credit(&self.credit),
            EvaluatorResult::Employment(&self.employment),
            EvaluatorResult::Collateral(&self.collateral),
        ]
    }
}

type Assessments = (CreditAssessment, EmploymentAssessment, CollateralAssessment);

/// Validates an application, fans out to the three evaluators, then runs the critique and
/// decision barrier steps. Pure and deterministic; owns no mutable state.
pub struct PipelineCoordinator<
    C = CreditRiskEvaluator,
    E = EmploymentEvaluator,
    L = CollateralEvaluator,
> {
    guard: ApplicationGuard,
    credit: C,
    employment: E,
    collateral: L,
    checker: ConsistencyChecker,
    synthesizer: DecisionSynthesizer,
    execution: ExecutionMode,
}

impl PipelineCoordinator {
    pub fn new(config: UnderwritingConfig) -> Self {
        let credit = CreditRiskEvaluator::new(config.credit.clone());
        let employment = EmploymentEvaluator::new(config.employment.clone());
        let collateral = CollateralEvaluator::new(config.collateral.clone());
        Self::with_evaluators(&config, credit, employment, collateral)
    }
}

impl Default for PipelineCoordinator {
    fn default() -> Self {
        Self::new(UnderwritingConfig::default())
    }
}

impl<C, E, L> PipelineCoordinator<C, E, L>
where
    C: Evaluator<Assessment = CreditAssessment>,
    E: Evaluator<Assessment = EmploymentAssessment>,
    L: Evaluator<Assessment = CollateralAssessment>,
{
    pub fn with_evaluators(
        config: &UnderwritingConfig,
        credit: C,
        employment: E,
        collateral: L,
    ) -> Self {
        Self {
            guard: ApplicationGuard,
            credit,
            employment,
            collateral,
            checker: ConsistencyChecker::new(config.consistency.clone()),
            synthesizer: DecisionSynthesizer::new(config),
            execution: config.execution,
        }
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution
    }

    pub fn evaluate(
        &self,
        application: &LoanApplication,
    ) -> Result<UnderwritingReport, UnderwritingError> {
        if let Err(violation) = self.guard.check(application) {
            warn!(%violation, "application rejected before evaluation");
            return Err(violation.into());
        }

        let plan = VerificationPlan::for_application(application);
        let degenerate_inputs = self.guard.degenerate_inputs(application);

        let assessments = match self.execution {
            ExecutionMode::Sequential => self.run_sequential(application),
            ExecutionMode::Concurrent => self.run_concurrent(application),
        };
        let (credit, employment, collateral) = match assessments {
            Ok(assessments) => assessments,
            Err(fault) => {
                warn!(
                    evaluator = fault.evaluator.label(),
                    reason = %fault.reason,
                    "evaluator fault aborted underwriting"
                );
                return Err(fault.into());
            }
        };

        let consistency = self.checker.check(&credit, &employment, &collateral);
        let decision = self
            .synthesizer
            .synthesize(&credit, &employment, &collateral, &consistency);

        info!(
            decision = decision.category.label(),
            aggregate_risk = decision.aggregate_risk,
            passed_count = decision.passed_count,
            inconsistencies = consistency.inconsistency_count,
            "underwriting complete"
        );

        Ok(UnderwritingReport {
            plan,
            degenerate_inputs,
            credit,
            employment,
            collateral,
            consistency,
            decision,
        })
    }

    /// Convenience for callers that only need the binding outcome.
    pub fn decide(&self, application: &LoanApplication) -> Result<Decision, UnderwritingError> {
        self.evaluate(application).map(|report| report.decision)
    }

    fn run_sequential(&self, application: &LoanApplication) -> Result<Assessments, EvaluatorFault> {
        let credit = contain(self.credit.kind(), || self.credit.evaluate(application))?;
        let employment = contain(self.employment.kind(), || {
            self.employment.evaluate(application)
        })?;
        let collateral = contain(self.collateral.kind(), || {
            self.collateral.evaluate(application)
        })?;
        Ok((credit, employment, collateral))
    }

    fn run_concurrent(&self, application: &LoanApplication) -> Result<Assessments, EvaluatorFault> {
        thread::scope(|scope| {
            let credit = scope.spawn(|| self.credit.evaluate(application));
            let employment = scope.spawn(|| self.employment.evaluate(application));
            let collateral = scope.spawn(|| self.collateral.evaluate(application));

            // Join everything before inspecting results so faults surface in a fixed order.
            let credit = credit.join().unwrap_or_else(|_| Err(panicked(self.credit.kind())));
            let employment = employment
                .join()
                .unwrap_or_else(|_| Err(panicked(self.employment.kind())));
            let collateral = collateral
                .join()
                .unwrap_or_else(|_| Err(panicked(self.collateral.kind())));

            Ok((credit?, employment?, collateral?))
        })
    }
}

fn contain<T>(
    kind: EvaluatorKind,
    evaluate: impl FnOnce() -> Result<T, EvaluatorFault>,
) -> Result<T, EvaluatorFault> {
    panic::catch_unwind(AssertUnwindSafe(evaluate)).unwrap_or_else(|_| Err(panicked(kind)))
}

fn panicked(kind: EvaluatorKind) -> EvaluatorFault {
    EvaluatorFault::new(kind, "evaluator panicked")
}
