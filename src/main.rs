use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use eat_where_la_client::config::Config;
use eat_where_la_client::controller;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    controller::run(config).await
}
