use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Every numeric weight, threshold and margin used by the pipeline.
///
/// Defaults reproduce the production rubric; any field can be overridden from a JSON policy
/// file without touching evaluator code. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderwritingConfig {
    pub credit: CreditPolicy,
    pub employment: EmploymentPolicy,
    pub collateral: CollateralPolicy,
    pub consistency: ConsistencyPolicy,
    pub decision: DecisionPolicy,
    pub execution: ExecutionMode,
}

/// How the debt-to-income ratio is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiBasis {
    /// Estimated monthly debt service over monthly income.
    #[default]
    EstimatedMonthlyPayment,
    /// Requested loan amount over annual income.
    LoanToIncome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditPolicy {
    pub base_score: f64,
    pub repayment_max: f64,
    pub loan_penalty_per_loan: f64,
    pub loan_penalty_cap: f64,
    pub income_multiplier: f64,
    pub income_cap: f64,
    pub debt_burden_base: f64,
    pub debt_burden_multiplier: f64,
    /// Income unit the debt-burden term divides by.
    pub debt_burden_income_unit: f64,
    pub score_min: f64,
    pub score_max: f64,
    pub low_risk_min_score: f64,
    pub medium_risk_min_score: f64,
    pub healthy_dti_max: f64,
    pub high_dti_min: f64,
    pub dti_basis: DtiBasis,
    pub monthly_payment_per_existing_loan: f64,
    pub monthly_payment_rate: f64,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self {
            base_score: 500.0,
            repayment_max: 200.0,
            loan_penalty_per_loan: 15.0,
            loan_penalty_cap: 100.0,
            income_multiplier: 50.0,
            income_cap: 150.0,
            debt_burden_base: 100.0,
            debt_burden_multiplier: 10.0,
            debt_burden_income_unit: 10_000.0,
            score_min: 300.0,
            score_max: 850.0,
            low_risk_min_score: 700.0,
            medium_risk_min_score: 600.0,
            healthy_dti_max: 0.36,
            high_dti_min: 0.5,
            dti_basis: DtiBasis::EstimatedMonthlyPayment,
            monthly_payment_per_existing_loan: 500.0,
            monthly_payment_rate: 0.005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentPolicy {
    pub excellent_min_years: f64,
    pub good_min_years: f64,
    pub acceptable_min_years: f64,
    /// Minimum tenure before an employment record counts as verified.
    pub verified_min_years: f64,
    pub recognized_employer_confidence: f64,
    pub unrecognized_employer_confidence: f64,
    pub recognized_employer_rating: f64,
    pub unrecognized_employer_rating: f64,
    pub known_employers: KnownEmployers,
}

impl Default for EmploymentPolicy {
    fn default() -> Self {
        Self {
            excellent_min_years: 5.0,
            good_min_years: 3.0,
            acceptable_min_years: 1.0,
            verified_min_years: 0.5,
            recognized_employer_confidence: 0.85,
            unrecognized_employer_confidence: 0.70,
            recognized_employer_rating: 4.2,
            unrecognized_employer_rating: 3.5,
            known_employers: KnownEmployers::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollateralPolicy {
    /// Share of the appraised collateral value that counts toward coverage.
    pub standard_ltv_margin: f64,
    pub standard_ltv_max: f64,
    pub acceptable_ltv_max: f64,
    pub coverage_low_risk_min: f64,
    pub coverage_acceptable_min: f64,
    pub coverage_marginal_min: f64,
}

impl Default for CollateralPolicy {
    fn default() -> Self {
        Self {
            standard_ltv_margin: 0.80,
            standard_ltv_max: 0.80,
            acceptable_ltv_max: 0.90,
            coverage_low_risk_min: 1.2,
            coverage_acceptable_min: 1.0,
            coverage_marginal_min: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyPolicy {
    /// Confidence deducted for each contradiction.
    pub contradiction_penalty: f64,
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        Self {
            contradiction_penalty: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    pub credit_low_weight: f64,
    pub credit_medium_weight: f64,
    pub credit_high_weight: f64,
    pub dti_multiplier: f64,
    pub dti_cap: f64,
    pub employment_passed_weight: f64,
    pub employment_verified_weight: f64,
    pub employment_failed_weight: f64,
    pub collateral_passed_weight: f64,
    pub collateral_sufficient_weight: f64,
    pub collateral_failed_weight: f64,
    pub critique_weight: f64,
    pub approve_max_risk: f64,
    pub conditional_max_risk: f64,
    pub approve_min_passed: usize,
    pub conditional_min_passed: usize,
    pub clamp_risk: bool,
    /// DTI at or above this ratio saturates the aggregate risk to 1.0.
    pub dti_decline_ratio: f64,
    pub conditional_shortfall_pct: f64,
    pub rejected_shortfall_pct: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            credit_low_weight: 0.1,
            credit_medium_weight: 0.25,
            credit_high_weight: 0.4,
            dti_multiplier: 0.3,
            dti_cap: 0.2,
            employment_passed_weight: 0.05,
            employment_verified_weight: 0.15,
            employment_failed_weight: 0.25,
            collateral_passed_weight: 0.05,
            collateral_sufficient_weight: 0.15,
            collateral_failed_weight: 0.25,
            critique_weight: 0.1,
            approve_max_risk: 0.30,
            conditional_max_risk: 0.50,
            approve_min_passed: 3,
            conditional_min_passed: 2,
            clamp_risk: true,
            dti_decline_ratio: 1.0,
            conditional_shortfall_pct: 10.0,
            rejected_shortfall_pct: 20.0,
        }
    }
}

/// Scheduling of the three independent evaluators. Both modes produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Concurrent,
}

/// Read-only lookup of recognized employers, stored lowercase and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KnownEmployers {
    names: BTreeSet<String>,
}

const DEFAULT_KNOWN_EMPLOYERS: &[&str] = &[
    "microsoft",
    "google",
    "amazon",
    "apple",
    "meta",
    "facebook",
    "tesla",
    "nvidia",
    "intel",
    "ibm",
    "oracle",
    "salesforce",
    "adobe",
    "netflix",
    "uber",
    "airbnb",
    "twitter",
    "linkedin",
    "tech corp",
    "global solutions",
    "innovation labs",
    "digital systems",
    "accenture",
    "deloitte",
    "pwc",
    "ey",
    "kpmg",
    "mckinsey",
    "jp morgan",
    "goldman sachs",
    "morgan stanley",
    "citigroup",
];

impl KnownEmployers {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| normalize_company(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Case-insensitive match: a known name must appear in the company name as whole words,
    /// so `"Tech Corp Inc."` matches `tech corp` while `"Turkey Farms"` does not match `ey`.
    pub fn recognizes(&self, company_name: &str) -> bool {
        let normalized = normalize_company(company_name);
        if normalized.is_empty() {
            return false;
        }
        let words: Vec<&str> = normalized.split(' ').collect();
        self.names.iter().any(|known| {
            let known_words: Vec<&str> = known.split(' ').collect();
            words
                .windows(known_words.len())
                .any(|window| window == known_words.as_slice())
        })
    }
}

impl Default for KnownEmployers {
    fn default() -> Self {
        Self::new(DEFAULT_KNOWN_EMPLOYERS.iter().copied())
    }
}

impl From<Vec<String>> for KnownEmployers {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<KnownEmployers> for Vec<String> {
    fn from(value: KnownEmployers) -> Self {
        value.names.into_iter().collect()
    }
}

fn normalize_company(raw: &str) -> String {
    raw.chars()
        .map(|ch| {
            if ch.is_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Problems detected in an overridden policy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{lower} must not exceed {upper}")]
    OutOfOrder {
        lower: &'static str,
        upper: &'static str,
    },
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("{field} must be within [0, 1]")]
    NotUnitInterval { field: &'static str },
    #[error("{field} must be between 0 and 3 evaluators")]
    PassCount { field: &'static str },
}

impl UnderwritingConfig {
    pub fn validate(&self) -> Result<(), PolicyError> {
        let credit = &self.credit;
        let employment = &self.employment;
        let collateral = &self.collateral;
        let decision = &self.decision;

        let finite = [
            ("base_score", credit.base_score),
            ("repayment_max", credit.repayment_max),
            ("loan_penalty_per_loan", credit.loan_penalty_per_loan),
            ("loan_penalty_cap", credit.loan_penalty_cap),
            ("income_multiplier", credit.income_multiplier),
            ("income_cap", credit.income_cap),
            ("debt_burden_base", credit.debt_burden_base),
            ("debt_burden_multiplier", credit.debt_burden_multiplier),
            ("score_min", credit.score_min),
            ("score_max", credit.score_max),
            ("low_risk_min_score", credit.low_risk_min_score),
            ("medium_risk_min_score", credit.medium_risk_min_score),
            ("healthy_dti_max", credit.healthy_dti_max),
            ("high_dti_min", credit.high_dti_min),
            (
                "monthly_payment_per_existing_loan",
                credit.monthly_payment_per_existing_loan,
            ),
            ("monthly_payment_rate", credit.monthly_payment_rate),
            ("excellent_min_years", employment.excellent_min_years),
            ("good_min_years", employment.good_min_years),
            ("acceptable_min_years", employment.acceptable_min_years),
            ("verified_min_years", employment.verified_min_years),
            ("standard_ltv_max", collateral.standard_ltv_max),
            ("acceptable_ltv_max", collateral.acceptable_ltv_max),
            ("coverage_low_risk_min", collateral.coverage_low_risk_min),
            ("coverage_acceptable_min", collateral.coverage_acceptable_min),
            ("coverage_marginal_min", collateral.coverage_marginal_min),
            (
                "contradiction_penalty",
                self.consistency.contradiction_penalty,
            ),
            ("approve_max_risk", decision.approve_max_risk),
            ("conditional_max_risk", decision.conditional_max_risk),
            ("dti_decline_ratio", decision.dti_decline_ratio),
        ];
        if let Some((field, _)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(PolicyError::NotFinite { field: *field });
        }

        // Penalties and weights feed bounded scores; a negative entry breaks the bounds.
        let non_negative = [
            ("loan_penalty_per_loan", credit.loan_penalty_per_loan),
            ("loan_penalty_cap", credit.loan_penalty_cap),
            (
                "monthly_payment_per_existing_loan",
                credit.monthly_payment_per_existing_loan,
            ),
            ("monthly_payment_rate", credit.monthly_payment_rate),
            (
                "recognized_employer_rating",
                employment.recognized_employer_rating,
            ),
            (
                "unrecognized_employer_rating",
                employment.unrecognized_employer_rating,
            ),
            (
                "contradiction_penalty",
                self.consistency.contradiction_penalty,
            ),
            ("credit_low_weight", decision.credit_low_weight),
            ("credit_medium_weight", decision.credit_medium_weight),
            ("credit_high_weight", decision.credit_high_weight),
            ("dti_multiplier", decision.dti_multiplier),
            ("dti_cap", decision.dti_cap),
            ("employment_passed_weight", decision.employment_passed_weight),
            (
                "employment_verified_weight",
                decision.employment_verified_weight,
            ),
            ("employment_failed_weight", decision.employment_failed_weight),
            ("collateral_passed_weight", decision.collateral_passed_weight),
            (
                "collateral_sufficient_weight",
                decision.collateral_sufficient_weight,
            ),
            ("collateral_failed_weight", decision.collateral_failed_weight),
            ("critique_weight", decision.critique_weight),
            ("conditional_shortfall_pct", decision.conditional_shortfall_pct),
            ("rejected_shortfall_pct", decision.rejected_shortfall_pct),
        ];
        if let Some((field, _)) = non_negative
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(PolicyError::Negative { field: *field });
        }

        let unit_interval = [
            (
                "recognized_employer_confidence",
                employment.recognized_employer_confidence,
            ),
            (
                "unrecognized_employer_confidence",
                employment.unrecognized_employer_confidence,
            ),
        ];
        if let Some((field, _)) = unit_interval
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(value))
        {
            return Err(PolicyError::NotUnitInterval { field: *field });
        }

        let positive = [
            ("debt_burden_income_unit", credit.debt_burden_income_unit),
            ("standard_ltv_margin", collateral.standard_ltv_margin),
        ];
        if let Some((field, _)) = positive
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(PolicyError::NotPositive { field: *field });
        }

        let ordered = [
            ("score_min", credit.score_min, "score_max", credit.score_max),
            (
                "medium_risk_min_score",
                credit.medium_risk_min_score,
                "low_risk_min_score",
                credit.low_risk_min_score,
            ),
            (
                "healthy_dti_max",
                credit.healthy_dti_max,
                "high_dti_min",
                credit.high_dti_min,
            ),
            (
                "acceptable_min_years",
                employment.acceptable_min_years,
                "good_min_years",
                employment.good_min_years,
            ),
            (
                "good_min_years",
                employment.good_min_years,
                "excellent_min_years",
                employment.excellent_min_years,
            ),
            (
                "standard_ltv_max",
                collateral.standard_ltv_max,
                "acceptable_ltv_max",
                collateral.acceptable_ltv_max,
            ),
            (
                "coverage_marginal_min",
                collateral.coverage_marginal_min,
                "coverage_acceptable_min",
                collateral.coverage_acceptable_min,
            ),
            (
                "coverage_acceptable_min",
                collateral.coverage_acceptable_min,
                "coverage_low_risk_min",
                collateral.coverage_low_risk_min,
            ),
            (
                "approve_max_risk",
                decision.approve_max_risk,
                "conditional_max_risk",
                decision.conditional_max_risk,
            ),
        ];
        if let Some((lower, _, upper, _)) = ordered
            .iter()
            .find(|(_, low, _, high)| low > high)
        {
            return Err(PolicyError::OutOfOrder {
                lower: *lower,
                upper: *upper,
            });
        }

        for (field, count) in [
            ("approve_min_passed", decision.approve_min_passed),
            ("conditional_min_passed", decision.conditional_min_passed),
        ] {
            if count > 3 {
                return Err(PolicyError::PassCount { field });
            }
        }

        Ok(())
    }
}
