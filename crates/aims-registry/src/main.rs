use std::net::SocketAddr;
use std::path::PathBuf;

use aims_logging::{AimsSubscriberBuilder, LogConfig};
use aims_registry::RegistryConfig;
use clap::Parser;

#[derive(Parser)]
#[command(name = "aims-registry", version, about = "Reference AIMS manifest registry")]
struct Args {
    /// Registry configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to listen on, overriding the configuration file
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Human-readable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    if let Some(bind) = args.bind {
        config = config.with_bind(bind);
    }
    if args.verbose {
        config = config.with_logging(LogConfig::development());
    }

    let _guard = AimsSubscriberBuilder::new()
        .with_config(config.logging.clone())
        .init()?;

    aims_registry::serve(config).await?;
    Ok(())
}
