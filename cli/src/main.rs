use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod notify;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = cli::Args::parse();
    match commands::dispatch(args).await {
        Ok(()) => Ok(()),
        Err(code) => std::process::exit(code),
    }
}
