use std::process::ExitCode;

use anyhow::Result;
use medchat::cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    cli::run().await
}
