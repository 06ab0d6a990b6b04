use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    use clap::Parser;
    use device_identity::cli::{Cli, Commands};
    use device_identity::cli::{run_reset, run_resolve, run_show};

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve(cmd) => {
            return Ok(run_resolve(cmd).await?.into());
        }
        Commands::Show(cmd) => {
            run_show(cmd).await?;
        }
        Commands::Reset(cmd) => {
            run_reset(cmd).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
