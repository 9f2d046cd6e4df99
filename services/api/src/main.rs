use loan_underwriting_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("loan underwriting error: {err}");
        std::process::exit(1);
    }
}
