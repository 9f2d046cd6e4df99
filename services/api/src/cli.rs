use crate::demo::{run_demo, run_evaluate, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_underwriting::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Underwriting",
    about = "Run the loan underwriting pipeline as an HTTP service or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Underwrite a single application from a JSON file or flags
    Evaluate(EvaluateArgs),
    /// Run the sample applicants through intake and print their decisions
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["loan-underwriting-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn evaluate_requires_file_or_income() {
        assert!(Cli::try_parse_from(["loan-underwriting-api", "evaluate"]).is_err());
        assert!(Cli::try_parse_from([
            "loan-underwriting-api",
            "evaluate",
            "--file",
            "application.json",
            "--json",
        ])
        .is_ok());
    }

    #[test]
    fn evaluate_rejects_file_with_flags() {
        let parsed = Cli::try_parse_from([
            "loan-underwriting-api",
            "evaluate",
            "--file",
            "application.json",
            "--income",
            "50000",
        ]);
        assert!(parsed.is_err());
    }
}
