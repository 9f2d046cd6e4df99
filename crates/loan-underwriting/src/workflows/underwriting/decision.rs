use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{DecisionPolicy, UnderwritingConfig};
use super::consistency::ConsistencyReport;
use super::domain::{CreditRiskCategory, DtiCategory};
use super::evaluators::{CollateralAssessment, CreditAssessment, EmploymentAssessment};

/// Binding outcome, ordered from most to least favorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DecisionCategory {
    Approved,
    Conditional,
    Rejected,
}

impl DecisionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionCategory::Approved => "APPROVED",
            DecisionCategory::Conditional => "CONDITIONAL",
            DecisionCategory::Rejected => "REJECTED",
        }
    }
}

/// Conditions attached to a conditional approval, or remediation advice for a rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Recommendation {
    ReduceDebtToIncome { ceiling: f64 },
    ProvideCreditReferences,
    VerifyEmploymentTenure { minimum_years: f64 },
    SubmitEmploymentDocumentation,
    IncreaseCollateral { shortfall_pct: f64 },
    AddCoSignerOrCollateral,
    ManualReview,
    ConsolidateDebt,
    CreditCounseling,
    ReapplyAfterTenure { minimum_years: f64 },
}

impl Recommendation {
    pub fn summary(&self) -> String {
        match self {
            Recommendation::ReduceDebtToIncome { ceiling } => {
                format!("reduce debt-to-income ratio below {:.0}%", ceiling * 100.0)
            }
            Recommendation::ProvideCreditReferences => {
                "provide additional credit references".to_string()
            }
            Recommendation::VerifyEmploymentTenure { minimum_years } => {
                format!("provide employment verification covering {minimum_years}+ years")
            }
            Recommendation::SubmitEmploymentDocumentation => {
                "submit additional employment documentation".to_string()
            }
            Recommendation::IncreaseCollateral { shortfall_pct } => {
                format!("increase collateral by {shortfall_pct:.0}%")
            }
            Recommendation::AddCoSignerOrCollateral => {
                "provide a co-signer or additional collateral".to_string()
            }
            Recommendation::ManualReview => {
                "complete manual review of the identified inconsistencies".to_string()
            }
            Recommendation::ConsolidateDebt => {
                "consider debt consolidation before reapplying".to_string()
            }
            Recommendation::CreditCounseling => {
                "seek credit counseling to improve the credit profile".to_string()
            }
            Recommendation::ReapplyAfterTenure { minimum_years } => {
                format!("reapply after {minimum_years}+ years with the current employer")
            }
        }
    }
}

/// Per-component contributions kept for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub credit: f64,
    pub dti: f64,
    pub employment: f64,
    pub collateral: f64,
    pub critique: f64,
    pub unclamped_total: f64,
    /// Debt service at or above the decline ratio forces the aggregate to 1.0.
    pub saturated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub category: DecisionCategory,
    pub aggregate_risk: f64,
    pub passed_count: usize,
    pub components: RiskBreakdown,
    pub requirements: Vec<Recommendation>,
}

impl Decision {
    pub fn summary(&self) -> String {
        let headline = format!(
            "{} (risk {:.2}%, {}/3 verifications passed)",
            self.category.label(),
            self.aggregate_risk * 100.0,
            self.passed_count
        );
        if self.requirements.is_empty() {
            headline
        } else {
            let requirements: Vec<String> = self
                .requirements
                .iter()
                .map(Recommendation::summary)
                .collect();
            format!("{headline}: {}", requirements.join(", "))
        }
    }
}

/// Barrier step that folds the three assessments and the consistency report into a decision.
pub struct DecisionSynthesizer {
    policy: DecisionPolicy,
    dti_ceiling: f64,
    minimum_tenure_years: f64,
}

impl DecisionSynthesizer {
    pub fn new(config: &UnderwritingConfig) -> Self {
        Self {
            policy: config.decision.clone(),
            dti_ceiling: config.credit.high_dti_min,
            minimum_tenure_years: config.employment.acceptable_min_years,
        }
    }

    pub fn risk_breakdown(
        &self,
        credit: &CreditAssessment,
        employment: &EmploymentAssessment,
        collateral: &CollateralAssessment,
        consistency: &ConsistencyReport,
    ) -> RiskBreakdown {
        let policy = &self.policy;

        let credit_component = match credit.risk_category {
            CreditRiskCategory::Low => policy.credit_low_weight,
            CreditRiskCategory::Medium => policy.credit_medium_weight,
            CreditRiskCategory::High => policy.credit_high_weight,
        };
        let dti_component = (credit.debt_to_income * policy.dti_multiplier).min(policy.dti_cap);

        let employment_component = if employment.passed {
            policy.employment_passed_weight
        } else if employment.employment_verified {
            policy.employment_verified_weight
        } else {
            policy.employment_failed_weight
        };

        let collateral_component = if collateral.passed {
            policy.collateral_passed_weight
        } else if collateral.sufficient {
            policy.collateral_sufficient_weight
        } else {
            policy.collateral_failed_weight
        };

        let critique_component = (1.0 - consistency.confidence_score) * policy.critique_weight;

        RiskBreakdown {
            credit: credit_component,
            dti: dti_component,
            employment: employment_component,
            collateral: collateral_component,
            critique: critique_component,
            unclamped_total: credit_component
                + dti_component
                + employment_component
                + collateral_component
                + critique_component,
            saturated: credit.debt_to_income >= policy.dti_decline_ratio,
        }
    }

    /// Collapses the breakdown into the score the decision rule reads.
    pub fn aggregate_risk(&self, components: &RiskBreakdown) -> f64 {
        if components.saturated {
            1.0
        } else if self.policy.clamp_risk {
            components.unclamped_total.min(1.0)
        } else {
            components.unclamped_total
        }
    }

    /// Ordered rule, first match wins. Monotonic in `aggregate_risk` for a fixed pass count.
    pub fn categorize(&self, aggregate_risk: f64, passed_count: usize) -> DecisionCategory {
        let policy = &self.policy;
        if aggregate_risk <= policy.approve_max_risk && passed_count >= policy.approve_min_passed {
            return DecisionCategory::Approved;
        }
        if aggregate_risk <= policy.conditional_max_risk
            && passed_count >= policy.conditional_min_passed
        {
            return DecisionCategory::Conditional;
        }
        DecisionCategory::Rejected
    }

    pub fn synthesize(
        &self,
        credit: &CreditAssessment,
        employment: &EmploymentAssessment,
        collateral: &CollateralAssessment,
        consistency: &ConsistencyReport,
    ) -> Decision {
        let components = self.risk_breakdown(credit, employment, collateral, consistency);
        let aggregate_risk = self.aggregate_risk(&components);
        let passed_count = [credit.passed, employment.passed, collateral.passed]
            .into_iter()
            .filter(|passed| *passed)
            .count();
        let category = self.categorize(aggregate_risk, passed_count);

        let requirements = match category {
            DecisionCategory::Approved => Vec::new(),
            DecisionCategory::Conditional => {
                self.conditions(credit, employment, collateral, consistency)
            }
            DecisionCategory::Rejected => {
                self.remediation(credit, employment, collateral, consistency)
            }
        };

        debug!(
            category = category.label(),
            aggregate_risk,
            passed_count,
            saturated = components.saturated,
            "decision synthesized"
        );

        Decision {
            category,
            aggregate_risk,
            passed_count,
            components,
            requirements,
        }
    }

    fn conditions(
        &self,
        credit: &CreditAssessment,
        employment: &EmploymentAssessment,
        collateral: &CollateralAssessment,
        consistency: &ConsistencyReport,
    ) -> Vec<Recommendation> {
        let mut conditions = Vec::new();

        if !credit.passed {
            if credit.dti_category == DtiCategory::High {
                conditions.push(Recommendation::ReduceDebtToIncome {
                    ceiling: self.dti_ceiling,
                });
            }
            if credit.risk_category == CreditRiskCategory::High {
                conditions.push(Recommendation::ProvideCreditReferences);
            }
        }

        if !employment.passed {
            if employment.years_employed < self.minimum_tenure_years {
                conditions.push(Recommendation::VerifyEmploymentTenure {
                    minimum_years: self.minimum_tenure_years,
                });
            }
            if !employment.company_verified {
                conditions.push(Recommendation::SubmitEmploymentDocumentation);
            }
        }

        if !collateral.passed {
            conditions.push(collateral_request(
                collateral.shortfall_pct(),
                self.policy.conditional_shortfall_pct,
            ));
        }

        if consistency.requires_review {
            conditions.push(Recommendation::ManualReview);
        }

        conditions
    }

    fn remediation(
        &self,
        credit: &CreditAssessment,
        employment: &EmploymentAssessment,
        collateral: &CollateralAssessment,
        consistency: &ConsistencyReport,
    ) -> Vec<Recommendation> {
        let mut advice = Vec::new();

        if !credit.passed {
            if credit.dti_category == DtiCategory::High {
                advice.push(Recommendation::ConsolidateDebt);
            }
            if credit.risk_category == CreditRiskCategory::High {
                advice.push(Recommendation::CreditCounseling);
            }
        }

        if !employment.passed {
            if employment.years_employed < self.minimum_tenure_years {
                advice.push(Recommendation::ReapplyAfterTenure {
                    minimum_years: self.minimum_tenure_years,
                });
            }
            if !employment.company_verified {
                advice.push(Recommendation::SubmitEmploymentDocumentation);
            }
        }

        if !collateral.passed {
            advice.push(collateral_request(
                collateral.shortfall_pct(),
                self.policy.rejected_shortfall_pct,
            ));
        }

        if consistency.requires_review {
            advice.push(Recommendation::ManualReview);
        }

        advice
    }
}

fn collateral_request(shortfall_pct: f64, threshold_pct: f64) -> Recommendation {
    if shortfall_pct > threshold_pct {
        Recommendation::IncreaseCollateral { shortfall_pct }
    } else {
        Recommendation::AddCoSignerOrCollateral
    }
}
