use crate::infra::{
    policy_or_default, read_application, InMemoryApplicationRepository, InMemoryNotifier,
};
use clap::Args;
use loan_underwriting::error::AppError;
use loan_underwriting::workflows::applications::{ApplicationRecord, LoanApplicationService};
use loan_underwriting::workflows::underwriting::{
    narrative, ExecutionMode, LoanApplication, PipelineCoordinator, UnderwritingReport,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding one application
    #[arg(long, conflicts_with_all = ["name", "income", "loan_amount"])]
    pub(crate) file: Option<PathBuf>,
    /// Applicant name when building the application from flags
    #[arg(long, default_value = "Command Line Applicant")]
    pub(crate) name: String,
    /// Annual income
    #[arg(long, required_unless_present = "file")]
    pub(crate) income: Option<f64>,
    /// Requested loan amount
    #[arg(long, required_unless_present = "file")]
    pub(crate) loan_amount: Option<f64>,
    /// Number of open loans
    #[arg(long, default_value_t = 0)]
    pub(crate) existing_loans: u32,
    /// Repayment history score in [0, 1]
    #[arg(long, default_value_t = 0.75)]
    pub(crate) repayment_score: f64,
    /// Years with the current employer
    #[arg(long, default_value_t = 0.0)]
    pub(crate) employment_years: f64,
    /// Current employer
    #[arg(long, default_value = "Unknown")]
    pub(crate) company: String,
    /// Appraised collateral value
    #[arg(long, default_value_t = 0.0)]
    pub(crate) collateral: f64,
    /// JSON policy overriding the default underwriting thresholds
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the full report as JSON instead of the narrative
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// JSON policy overriding the default underwriting thresholds
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Run the evaluators one after another instead of concurrently
    #[arg(long)]
    pub(crate) sequential: bool,
    /// Print each applicant's verification plan
    #[arg(long)]
    pub(crate) show_plan: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let policy = policy_or_default(args.policy.as_deref())?;
    let application = match args.file.as_deref() {
        Some(path) => read_application(path)?,
        None => application_from_flags(&args)?,
    };

    let pipeline = PipelineCoordinator::new(policy);
    let report = pipeline.evaluate(&application)?;

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        println!("Applicant: {}", application.applicant_name);
        render_report(&report, false);
    }
    Ok(())
}

fn application_from_flags(args: &EvaluateArgs) -> Result<LoanApplication, AppError> {
    let missing = |flag: &str| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("--{flag} is required without --file"),
        ))
    };

    Ok(LoanApplication {
        applicant_name: args.name.clone(),
        income: args.income.ok_or_else(|| missing("income"))?,
        loan_amount: args.loan_amount.ok_or_else(|| missing("loan-amount"))?,
        existing_loans: args.existing_loans,
        repayment_score: args.repayment_score,
        employment_years: args.employment_years,
        company_name: args.company.clone(),
        collateral_value: args.collateral,
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        policy,
        sequential,
        show_plan,
    } = args;

    let mut policy = policy_or_default(policy.as_deref())?;
    if sequential {
        policy.execution = ExecutionMode::Sequential;
    }

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let notifier = Arc::new(InMemoryNotifier::default());
    let service = LoanApplicationService::new(repository, notifier.clone(), policy);

    println!("Loan underwriting demo");
    for application in demo_applicants() {
        let record = service.submit_and_evaluate(application)?;
        render_record(&record, show_plan);
    }

    let history = service.history(10)?;
    println!("\nDecision history (most recent first)");
    for record in &history {
        println!(
            "- {} | {} | {}",
            record.id,
            record.application.applicant_name,
            record.decision_rationale()
        );
    }

    let events = notifier.events();
    println!("\nNotifications queued: {}", events.len());
    for event in &events {
        let decision = event
            .details
            .get("decision")
            .map(|value| format!(" ({value})"))
            .unwrap_or_default();
        println!(
            "- {} -> {}{}",
            event.template.label(),
            event.application_id,
            decision
        );
    }

    Ok(())
}

fn render_record(record: &ApplicationRecord, show_plan: bool) {
    println!(
        "\n=== {} [{}] {} ===",
        record.application.applicant_name,
        record.id,
        record.status.label()
    );
    if let Some(report) = &record.report {
        render_report(report, show_plan);
    }
}

fn render_report(report: &UnderwritingReport, show_plan: bool) {
    if show_plan {
        println!(
            "Verification plan: complexity {:.2}, {} effort ({})",
            report.plan.complexity,
            report.plan.effort.label(),
            report.plan.effort.estimated_duration()
        );
        for (index, step) in report.plan.steps.iter().enumerate() {
            println!("  {}. {}", index + 1, step.description);
        }
    }
    println!("{}", narrative::render(report));
}

pub(crate) fn demo_applicants() -> Vec<LoanApplication> {
    vec![
        LoanApplication {
            applicant_name: "Jordan Strong".to_string(),
            income: 120_000.0,
            loan_amount: 200_000.0,
            existing_loans: 1,
            repayment_score: 0.92,
            employment_years: 8.0,
            company_name: "Tech Corp".to_string(),
            collateral_value: 300_000.0,
        },
        LoanApplication {
            applicant_name: "Morgan Moderate".to_string(),
            income: 60_000.0,
            loan_amount: 180_000.0,
            existing_loans: 3,
            repayment_score: 0.72,
            employment_years: 3.5,
            company_name: "Innovation Labs".to_string(),
            collateral_value: 230_000.0,
        },
        LoanApplication {
            applicant_name: "Riley Weak".to_string(),
            income: 35_000.0,
            loan_amount: 250_000.0,
            existing_loans: 4,
            repayment_score: 0.45,
            employment_years: 1.0,
            company_name: "Startup".to_string(),
            collateral_value: 50_000.0,
        },
    ]
}
