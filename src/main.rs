// model-forge: normalize model definitions into admin schemas
//
// This is the main entry point for the model-forge binary.

use anyhow::Result;
use model_forge::cli::commands::{handle_command, Command};
use model_forge::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let config = Config::load().unwrap_or_default();
    let output = handle_command(&command, &config).await?;
    println!("{}", output);

    Ok(())
}
