use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::config::{CreditPolicy, DtiBasis};
use super::super::domain::{
    CreditRiskCategory, DtiCategory, EvaluatorKind, Fact, FactKind, FactValue, LoanApplication,
};
use super::{ensure_defined, Evaluator, EvaluatorFault};

/// Synthetic credit profile derived from income, debt load and repayment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub credit_score: f64,
    pub risk_category: CreditRiskCategory,
    /// `+inf` when income is zero.
    pub debt_to_income: f64,
    pub dti_category: DtiCategory,
    /// Raw `loan_amount / income`, reported whatever the DTI basis. `+inf` when income is zero.
    pub loan_to_income: f64,
    pub passed: bool,
    pub facts: Vec<Fact>,
}

pub struct CreditRiskEvaluator {
    policy: CreditPolicy,
}

impl CreditRiskEvaluator {
    pub fn new(policy: CreditPolicy) -> Self {
        Self { policy }
    }

    /// Score clamped to `[score_min, score_max]`.
    pub fn credit_score(&self, application: &LoanApplication) -> f64 {
        let policy = &self.policy;
        let loans = f64::from(application.existing_loans);

        let repayment = application.repayment_score * policy.repayment_max;
        let loan_penalty = (loans * policy.loan_penalty_per_loan).min(policy.loan_penalty_cap);
        let income_component = ((application.income / application.loan_amount)
            * policy.income_multiplier)
            .min(policy.income_cap);

        // Without income the debt-burden ratio is unbounded, which zeroes the term.
        let debt_component = if application.income > 0.0 {
            let burden = loans / (application.income / policy.debt_burden_income_unit);
            (policy.debt_burden_base - burden * policy.debt_burden_multiplier).max(0.0)
        } else {
            0.0
        };

        let raw = policy.base_score + repayment - loan_penalty + income_component + debt_component;
        raw.max(policy.score_min).min(policy.score_max)
    }

    pub fn debt_to_income(&self, application: &LoanApplication) -> f64 {
        if application.income <= 0.0 {
            return f64::INFINITY;
        }

        match self.policy.dti_basis {
            DtiBasis::EstimatedMonthlyPayment => {
                let monthly_debt = f64::from(application.existing_loans)
                    * self.policy.monthly_payment_per_existing_loan
                    + application.loan_amount * self.policy.monthly_payment_rate;
                monthly_debt / (application.income / 12.0)
            }
            DtiBasis::LoanToIncome => application.loan_amount / application.income,
        }
    }

    pub fn risk_category(&self, credit_score: f64) -> CreditRiskCategory {
        if credit_score >= self.policy.low_risk_min_score {
            CreditRiskCategory::Low
        } else if credit_score >= self.policy.medium_risk_min_score {
            CreditRiskCategory::Medium
        } else {
            CreditRiskCategory::High
        }
    }

    pub fn dti_category(&self, debt_to_income: f64) -> DtiCategory {
        if debt_to_income < self.policy.healthy_dti_max {
            DtiCategory::Healthy
        } else if debt_to_income < self.policy.high_dti_min {
            DtiCategory::Moderate
        } else {
            DtiCategory::High
        }
    }
}

impl Evaluator for CreditRiskEvaluator {
    type Assessment = CreditAssessment;

    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Credit
    }

    fn evaluate(&self, application: &LoanApplication) -> Result<CreditAssessment, EvaluatorFault> {
        let kind = self.kind();
        let credit_score = ensure_defined(kind, "credit score", self.credit_score(application))?;
        let debt_to_income =
            ensure_defined(kind, "debt-to-income", self.debt_to_income(application))?;
        let loan_to_income = if application.income > 0.0 {
            application.loan_amount / application.income
        } else {
            f64::INFINITY
        };

        let risk_category = if application.income <= 0.0 {
            CreditRiskCategory::High
        } else {
            self.risk_category(credit_score)
        };
        let dti_category = self.dti_category(debt_to_income);

        let passed = matches!(
            risk_category,
            CreditRiskCategory::Low | CreditRiskCategory::Medium
        ) && dti_category != DtiCategory::High;

        let facts = vec![
            Fact::new(FactKind::CreditScore, FactValue::Decimal(credit_score)),
            Fact::new(
                FactKind::RepaymentScore,
                FactValue::Decimal(application.repayment_score),
            ),
            Fact::new(
                FactKind::ExistingLoans,
                FactValue::Count(application.existing_loans),
            ),
            Fact::new(FactKind::DebtToIncome, FactValue::Ratio(debt_to_income)),
            Fact::new(FactKind::LoanToIncome, FactValue::Ratio(loan_to_income)),
        ];

        debug!(
            credit_score,
            risk = risk_category.label(),
            dti = debt_to_income,
            passed,
            "credit assessment complete"
        );

        Ok(CreditAssessment {
            credit_score,
            risk_category,
            debt_to_income,
            dti_category,
            loan_to_income,
            passed,
            facts,
        })
    }
}
