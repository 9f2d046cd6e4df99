use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::config::EmploymentPolicy;
use super::super::domain::{
    EmployerStanding, EmploymentStability, EvaluatorKind, Fact, FactKind, FactValue,
    LoanApplication,
};
use super::{Evaluator, EvaluatorFault};

/// Tenure and employer credibility. Employer lookup only ever lowers confidence; it never fails
/// verification on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentAssessment {
    pub stability: EmploymentStability,
    pub employer_standing: EmployerStanding,
    pub employment_verified: bool,
    pub company_verified: bool,
    pub verification_confidence: f64,
    pub company_rating: f64,
    pub years_employed: f64,
    pub passed: bool,
    pub facts: Vec<Fact>,
}

pub struct EmploymentEvaluator {
    policy: EmploymentPolicy,
}

impl EmploymentEvaluator {
    pub fn new(policy: EmploymentPolicy) -> Self {
        Self { policy }
    }

    pub fn stability(&self, employment_years: f64) -> EmploymentStability {
        if employment_years >= self.policy.excellent_min_years {
            EmploymentStability::Excellent
        } else if employment_years >= self.policy.good_min_years {
            EmploymentStability::Good
        } else if employment_years >= self.policy.acceptable_min_years {
            EmploymentStability::Acceptable
        } else {
            EmploymentStability::Concerning
        }
    }

    pub fn employer_standing(&self, company_name: &str) -> EmployerStanding {
        if self.policy.known_employers.recognizes(company_name) {
            EmployerStanding::Recognized
        } else {
            EmployerStanding::Unrecognized
        }
    }
}

impl Evaluator for EmploymentEvaluator {
    type Assessment = EmploymentAssessment;

    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Employment
    }

    fn evaluate(
        &self,
        application: &LoanApplication,
    ) -> Result<EmploymentAssessment, EvaluatorFault> {
        let years_employed = application.employment_years;
        let stability = self.stability(years_employed);
        let employer_standing = self.employer_standing(&application.company_name);

        let (verification_confidence, company_rating) = match employer_standing {
            EmployerStanding::Recognized => (
                self.policy.recognized_employer_confidence,
                self.policy.recognized_employer_rating,
            ),
            EmployerStanding::Unrecognized => (
                self.policy.unrecognized_employer_confidence,
                self.policy.unrecognized_employer_rating,
            ),
        };

        let employment_verified = years_employed >= self.policy.verified_min_years;
        // Verification is simulated; an unknown employer is still treated as real.
        let company_verified = true;
        let passed = employment_verified
            && company_verified
            && years_employed >= self.policy.acceptable_min_years;

        let facts = vec![
            Fact::new(FactKind::EmploymentYears, FactValue::Decimal(years_employed)),
            Fact::new(
                FactKind::EmploymentVerified,
                FactValue::Boolean(employment_verified),
            ),
            Fact::new(
                FactKind::CompanyVerified,
                FactValue::Boolean(company_verified),
            ),
            Fact::new(
                FactKind::EmployerRecognized,
                FactValue::Boolean(employer_standing == EmployerStanding::Recognized),
            ),
            Fact::new(FactKind::CompanyRating, FactValue::Decimal(company_rating)),
            Fact::new(
                FactKind::VerificationConfidence,
                FactValue::Decimal(verification_confidence),
            ),
        ];

        debug!(
            years_employed,
            stability = stability.label(),
            ?employer_standing,
            passed,
            "employment assessment complete"
        );

        Ok(EmploymentAssessment {
            stability,
            employer_standing,
            employment_verified,
            company_verified,
            verification_confidence,
            company_rating,
            years_employed,
            passed,
            facts,
        })
    }
}
