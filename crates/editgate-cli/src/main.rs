//! editgate: inline-edit eligibility gate binary.

use clap::Parser;

mod cli;
mod cmd_check;
mod cmd_demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("EDITGATE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    match args.command {
        cli::Command::Check(opts) => {
            let exit_code = cmd_check::cmd_check(&opts)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        cli::Command::Demo(opts) => {
            cmd_demo::cmd_demo(&opts).await?;
        }
    }

    Ok(())
}
