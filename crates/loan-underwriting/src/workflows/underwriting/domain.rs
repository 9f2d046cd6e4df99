use serde::{Deserialize, Serialize};

/// Loan request as received from the intake layer.
///
/// Amounts are plain decimals in the applicant's currency. The value is never mutated by the
/// pipeline; a corrected resubmission is a new `LoanApplication`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    #[serde(alias = "name")]
    pub applicant_name: String,
    /// Annual gross income.
    pub income: f64,
    pub loan_amount: f64,
    pub existing_loans: u32,
    /// Historical repayment reliability in `[0, 1]`.
    pub repayment_score: f64,
    pub employment_years: f64,
    pub company_name: String,
    pub collateral_value: f64,
}

/// The three independent scoring steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    Credit,
    Employment,
    Collateral,
}

impl EvaluatorKind {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluatorKind::Credit => "credit",
            EvaluatorKind::Employment => "employment",
            EvaluatorKind::Collateral => "collateral",
        }
    }
}

/// Valid-but-undefined ratio inputs that are resolved by sentinel policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateInput {
    /// Income of zero: DTI and loan-to-income become `+inf`, credit is forced to High risk.
    ZeroIncome,
    /// Collateral of zero: LTV becomes `+inf`, coverage is zero and insufficient.
    ZeroCollateral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreditRiskCategory {
    Low,
    Medium,
    High,
}

impl CreditRiskCategory {
    pub const fn label(self) -> &'static str {
        match self {
            CreditRiskCategory::Low => "Low",
            CreditRiskCategory::Medium => "Medium",
            CreditRiskCategory::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DtiCategory {
    Healthy,
    Moderate,
    High,
}

impl DtiCategory {
    pub const fn label(self) -> &'static str {
        match self {
            DtiCategory::Healthy => "healthy",
            DtiCategory::Moderate => "moderate",
            DtiCategory::High => "high",
        }
    }
}

/// Tenure-based stability bands, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmploymentStability {
    Excellent,
    Good,
    Acceptable,
    Concerning,
}

impl EmploymentStability {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentStability::Excellent => "Excellent",
            EmploymentStability::Good => "Good",
            EmploymentStability::Acceptable => "Acceptable",
            EmploymentStability::Concerning => "Concerning",
        }
    }

    pub const fn is_strong(self) -> bool {
        matches!(self, EmploymentStability::Excellent | EmploymentStability::Good)
    }
}

/// Whether the employer appears in the configured lookup set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployerStanding {
    Recognized,
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LtvCategory {
    Standard,
    Acceptable,
    High,
}

impl LtvCategory {
    pub const fn label(self) -> &'static str {
        match self {
            LtvCategory::Standard => "standard",
            LtvCategory::Acceptable => "acceptable",
            LtvCategory::High => "high",
        }
    }
}

/// Margin-adjusted coverage bands, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoverageCategory {
    LowRisk,
    Acceptable,
    Marginal,
    Insufficient,
}

impl CoverageCategory {
    pub const fn label(self) -> &'static str {
        match self {
            CoverageCategory::LowRisk => "low risk",
            CoverageCategory::Acceptable => "acceptable",
            CoverageCategory::Marginal => "marginal",
            CoverageCategory::Insufficient => "insufficient",
        }
    }
}

/// Semantic key of a computed fact. Facts are rendered into prose by the narrative layer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    CreditScore,
    RepaymentScore,
    ExistingLoans,
    DebtToIncome,
    LoanToIncome,
    EmploymentYears,
    EmploymentVerified,
    CompanyVerified,
    EmployerRecognized,
    CompanyRating,
    VerificationConfidence,
    CollateralValue,
    LoanToValue,
    MarginApplied,
    EffectiveCollateral,
    CoverageRatio,
    CollateralSurplus,
    CollateralShortfall,
}

/// Structured value carried by a fact so consumers never parse strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FactValue {
    Decimal(f64),
    /// A ratio; `+inf` marks a degenerate denominator.
    Ratio(f64),
    Money(f64),
    Count(u32),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub kind: FactKind,
    pub value: FactValue,
}

impl Fact {
    pub const fn new(kind: FactKind, value: FactValue) -> Self {
        Self { kind, value }
    }
}

/// Finds the first fact with the given key.
pub fn find_fact(facts: &[Fact], kind: FactKind) -> Option<FactValue> {
    facts
        .iter()
        .find(|fact| fact.kind == kind)
        .map(|fact| fact.value)
}
