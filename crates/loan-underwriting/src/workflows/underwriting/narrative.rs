//! Prose rendering of an underwriting report. Reads computed facts and categories only and
//! never feeds back into the decision.

use std::fmt::Write as _;

use super::decision::DecisionCategory;
use super::domain::{Fact, FactKind, FactValue};
use super::evaluators::{CollateralAssessment, CreditAssessment, EmploymentAssessment};
use super::pipeline::UnderwritingReport;

pub fn fact_label(kind: FactKind) -> &'static str {
    match kind {
        FactKind::CreditScore => "credit score",
        FactKind::RepaymentScore => "repayment score",
        FactKind::ExistingLoans => "existing loans",
        FactKind::DebtToIncome => "debt-to-income",
        FactKind::LoanToIncome => "loan-to-income",
        FactKind::EmploymentYears => "years employed",
        FactKind::EmploymentVerified => "employment verified",
        FactKind::CompanyVerified => "company verified",
        FactKind::EmployerRecognized => "recognized employer",
        FactKind::CompanyRating => "company rating",
        FactKind::VerificationConfidence => "verification confidence",
        FactKind::CollateralValue => "collateral value",
        FactKind::LoanToValue => "loan-to-value",
        FactKind::MarginApplied => "margin applied",
        FactKind::EffectiveCollateral => "effective collateral",
        FactKind::CoverageRatio => "coverage ratio",
        FactKind::CollateralSurplus => "collateral surplus",
        FactKind::CollateralShortfall => "collateral shortfall",
    }
}

pub fn format_value(value: FactValue) -> String {
    match value {
        FactValue::Ratio(ratio) if ratio.is_infinite() => "undefined".to_string(),
        FactValue::Ratio(ratio) => format!("{ratio:.2}"),
        FactValue::Decimal(decimal) => format!("{decimal:.2}"),
        FactValue::Money(amount) => format!("${amount:.2}"),
        FactValue::Count(count) => count.to_string(),
        FactValue::Boolean(true) => "yes".to_string(),
        FactValue::Boolean(false) => "no".to_string(),
    }
}

pub fn describe_facts(facts: &[Fact]) -> String {
    facts
        .iter()
        .map(|fact| format!("{} {}", fact_label(fact.kind), format_value(fact.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn credit_analysis(credit: &CreditAssessment) -> String {
    format!(
        "{} credit risk with a {} debt-to-income profile ({}); {}.",
        credit.risk_category.label(),
        credit.dti_category.label(),
        describe_facts(&credit.facts),
        verdict(credit.passed)
    )
}

pub fn employment_analysis(employment: &EmploymentAssessment) -> String {
    format!(
        "{} employment stability ({}); {}.",
        employment.stability.label(),
        describe_facts(&employment.facts),
        verdict(employment.passed)
    )
}

pub fn collateral_analysis(collateral: &CollateralAssessment) -> String {
    format!(
        "{} loan-to-value with {} coverage ({}); {}.",
        collateral.ltv_category.label(),
        collateral.coverage_category.label(),
        describe_facts(&collateral.facts),
        verdict(collateral.passed)
    )
}

fn verdict(passed: bool) -> &'static str {
    if passed {
        "verification passed"
    } else {
        "verification failed"
    }
}

fn rationale(category: DecisionCategory, risk_pct: f64) -> String {
    match category {
        DecisionCategory::Approved => format!(
            "The applicant is creditworthy across all verification dimensions with a low risk \
             profile ({risk_pct:.2}%)."
        ),
        DecisionCategory::Conditional => format!(
            "The applicant shows potential with moderate risk ({risk_pct:.2}%). Approval is \
             subject to the requirements below."
        ),
        DecisionCategory::Rejected => format!(
            "The application presents high risk ({risk_pct:.2}%). The applicant is encouraged \
             to address the issues below and reapply."
        ),
    }
}

/// Multi-section narrative for reviewers and applicants.
pub fn render(report: &UnderwritingReport) -> String {
    let decision = &report.decision;
    let risk_pct = decision.aggregate_risk * 100.0;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Decision: {} with an overall risk score of {risk_pct:.2}%.",
        decision.category.label()
    );
    let _ = writeln!(out, "Credit Analysis: {}", credit_analysis(&report.credit));
    let _ = writeln!(
        out,
        "Employment Verification: {}",
        employment_analysis(&report.employment)
    );
    let _ = writeln!(
        out,
        "Collateral Assessment: {}",
        collateral_analysis(&report.collateral)
    );
    let _ = writeln!(
        out,
        "Quality Review: {} (confidence {:.0}%).",
        report.consistency.summary(),
        report.consistency.confidence_score * 100.0
    );
    let _ = write!(
        out,
        "Decision Rationale: {}",
        rationale(decision.category, risk_pct)
    );

    for (index, requirement) in decision.requirements.iter().enumerate() {
        let _ = write!(out, "\n  {}. {}", index + 1, requirement.summary());
    }

    out
}
