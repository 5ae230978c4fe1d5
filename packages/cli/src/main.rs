use clap::Parser;
use todolist_cli::{args::Cli, config::Config, logging::init_tracing, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);

    run_server(config).await
}
