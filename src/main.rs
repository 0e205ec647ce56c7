use anyhow::Result;
use quizterm::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run_cli().await
}
