use crate::workflows::underwriting::config::{ExecutionMode, UnderwritingConfig};
use crate::workflows::underwriting::consistency::ConsistencyReport;
use crate::workflows::underwriting::domain::{
    CoverageCategory, CreditRiskCategory, DtiCategory, EmployerStanding, EmploymentStability,
    LoanApplication, LtvCategory,
};
use crate::workflows::underwriting::evaluators::{
    CollateralAssessment, CreditAssessment, EmploymentAssessment,
};
use crate::workflows::underwriting::pipeline::PipelineCoordinator;

pub(super) const EPSILON: f64 = 1e-9;

#[allow(clippy::too_many_arguments)]
pub(super) fn application(
    applicant_name: &str,
    income: f64,
    loan_amount: f64,
    existing_loans: u32,
    repayment_score: f64,
    employment_years: f64,
    company_name: &str,
    collateral_value: f64,
) -> LoanApplication {
    LoanApplication {
        applicant_name: applicant_name.to_string(),
        income,
        loan_amount,
        existing_loans,
        repayment_score,
        employment_years,
        company_name: company_name.to_string(),
        collateral_value,
    }
}

pub(super) fn strong_applicant() -> LoanApplication {
    application(
        "Jordan Strong",
        120_000.0,
        200_000.0,
        1,
        0.92,
        8.0,
        "Tech Corp",
        300_000.0,
    )
}

pub(super) fn weak_applicant() -> LoanApplication {
    application(
        "Riley Weak", 35_000.0, 250_000.0, 4, 0.45, 1.0, "Startup", 50_000.0,
    )
}

pub(super) fn moderate_applicant() -> LoanApplication {
    application(
        "Morgan Moderate",
        60_000.0,
        180_000.0,
        3,
        0.72,
        3.5,
        "Innovation Labs",
        200_000.0,
    )
}

/// Moderate profile with enough collateral for full coverage.
pub(super) fn moderate_covered_applicant() -> LoanApplication {
    LoanApplication {
        collateral_value: 230_000.0,
        ..moderate_applicant()
    }
}

pub(super) fn extreme_dti_applicant() -> LoanApplication {
    application(
        "Casey Extreme",
        30_000.0,
        500_000.0,
        0,
        0.95,
        10.0,
        "Google",
        1_000_000.0,
    )
}

pub(super) fn config_with(execution: ExecutionMode) -> UnderwritingConfig {
    UnderwritingConfig {
        execution,
        ..UnderwritingConfig::default()
    }
}

pub(super) fn pipeline() -> PipelineCoordinator {
    PipelineCoordinator::default()
}

pub(super) fn sequential_pipeline() -> PipelineCoordinator {
    PipelineCoordinator::new(config_with(ExecutionMode::Sequential))
}

pub(super) fn credit(
    risk_category: CreditRiskCategory,
    dti_category: DtiCategory,
    debt_to_income: f64,
    passed: bool,
) -> CreditAssessment {
    CreditAssessment {
        credit_score: match risk_category {
            CreditRiskCategory::Low => 760.0,
            CreditRiskCategory::Medium => 650.0,
            CreditRiskCategory::High => 520.0,
        },
        risk_category,
        debt_to_income,
        dti_category,
        loan_to_income: 2.0,
        passed,
        facts: Vec::new(),
    }
}

pub(super) fn employment(
    stability: EmploymentStability,
    years_employed: f64,
    employment_verified: bool,
    passed: bool,
) -> EmploymentAssessment {
    EmploymentAssessment {
        stability,
        employer_standing: EmployerStanding::Unrecognized,
        employment_verified,
        company_verified: true,
        verification_confidence: 0.70,
        company_rating: 3.5,
        years_employed,
        passed,
        facts: Vec::new(),
    }
}

pub(super) fn collateral(
    ltv_category: LtvCategory,
    coverage_ratio: f64,
    sufficient: bool,
    passed: bool,
) -> CollateralAssessment {
    CollateralAssessment {
        loan_to_value: 0.8 / coverage_ratio.max(0.01),
        ltv_category,
        margin_applied: 0.8,
        effective_collateral: coverage_ratio * 100_000.0,
        coverage_ratio,
        coverage_category: if coverage_ratio >= 1.0 {
            CoverageCategory::Acceptable
        } else {
            CoverageCategory::Insufficient
        },
        sufficient,
        passed,
        facts: Vec::new(),
    }
}

pub(super) fn consistent_report() -> ConsistencyReport {
    ConsistencyReport {
        inconsistency_count: 0,
        inconsistencies: Vec::new(),
        confidence_score: 1.0,
        requires_review: false,
    }
}
