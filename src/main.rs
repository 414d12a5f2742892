use anyhow::Result;
use clap::Parser;
use workflow_reporter::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    tracing::info!("workflow-reporter starting");
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("report run finished"),
        Err(e) => tracing::error!(error = %e, "report run failed"),
    }
    result
}
