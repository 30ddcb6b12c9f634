use anyhow::Result;
use clap::Parser;
use mindcheck::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG wins when set; otherwise log this crate at info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("mindcheck=info"))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    cli.run()
}
