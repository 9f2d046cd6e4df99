use super::domain::{DegenerateInput, LoanApplication};

/// Structural violations that reject an application before any evaluator runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplicationViolation {
    #[error("applicant name must not be empty")]
    MissingApplicantName,
    #[error("company name must not be empty")]
    MissingCompanyName,
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("loan_amount must be greater than zero (found {found})")]
    NonPositiveLoanAmount { found: f64 },
    #[error("{field} must not be negative (found {found})")]
    Negative { field: &'static str, found: f64 },
    #[error("repayment_score must be within [0, 1] (found {found})")]
    RepaymentOutOfRange { found: f64 },
}

/// Gatekeeper enforcing the `LoanApplication` invariants.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationGuard;

impl ApplicationGuard {
    pub fn check(&self, application: &LoanApplication) -> Result<(), ApplicationViolation> {
        if application.applicant_name.trim().is_empty() {
            return Err(ApplicationViolation::MissingApplicantName);
        }
        if application.company_name.trim().is_empty() {
            return Err(ApplicationViolation::MissingCompanyName);
        }

        for (field, value) in [
            ("income", application.income),
            ("loan_amount", application.loan_amount),
            ("repayment_score", application.repayment_score),
            ("employment_years", application.employment_years),
            ("collateral_value", application.collateral_value),
        ] {
            if !value.is_finite() {
                return Err(ApplicationViolation::NotFinite { field });
            }
        }

        if application.loan_amount <= 0.0 {
            return Err(ApplicationViolation::NonPositiveLoanAmount {
                found: application.loan_amount,
            });
        }

        for (field, value) in [
            ("income", application.income),
            ("employment_years", application.employment_years),
            ("collateral_value", application.collateral_value),
        ] {
            if value < 0.0 {
                return Err(ApplicationViolation::Negative {
                    field,
                    found: value,
                });
            }
        }

        if !(0.0..=1.0).contains(&application.repayment_score) {
            return Err(ApplicationViolation::RepaymentOutOfRange {
                found: application.repayment_score,
            });
        }

        Ok(())
    }

    /// Sentinel policies the evaluators will apply to an already valid application.
    pub fn degenerate_inputs(&self, application: &LoanApplication) -> Vec<DegenerateInput> {
        let mut degenerate = Vec::new();
        if application.income == 0.0 {
            degenerate.push(DegenerateInput::ZeroIncome);
        }
        if application.collateral_value == 0.0 {
            degenerate.push(DegenerateInput::ZeroCollateral);
        }
        degenerate
    }
}
