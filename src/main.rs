use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

mod api_client;
mod client;
mod cmd;
mod config;
mod error;
mod f1;
mod format;
mod types;

use crate::cmd::Cmd;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    Cmd::parse().run().await
}
