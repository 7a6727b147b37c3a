use std::io::{self, Write};
use std::process::ExitCode;

use aims_logging::{AimsSubscriberBuilder, LogConfig};
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Command, DidCommand, ManifestCommand};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::cli();
    if cli.verbose {
        log_config.default_level = "debug".to_string();
    }
    let _guard = AimsSubscriberBuilder::new().with_config(log_config).init()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let ok = match &cli.command {
        Command::Did {
            command: DidCommand::Parse { did },
        } => commands::did_parse(did, &mut out)?,
        Command::Manifest { command } => match command {
            ManifestCommand::Init { did, output } => {
                commands::manifest_init(did, output.as_deref(), &mut out)?
            }
            ManifestCommand::Sign { path, key } => commands::manifest_sign(path, key, &mut out)?,
            ManifestCommand::Verify { path } => commands::manifest_verify(path, &mut out)?,
        },
        Command::Publish { path } => {
            let resolver = commands::build_resolver(&cli)?;
            commands::publish(&resolver, path, &mut out).await?
        }
        Command::Resolve { did, output } => {
            let resolver = commands::build_resolver(&cli)?;
            commands::resolve(&resolver, did, output.as_deref(), &mut out).await?
        }
        Command::Verify { did } => {
            let resolver = commands::build_resolver(&cli)?;
            commands::verify(&resolver, did, &mut out).await?
        }
    };

    out.flush()?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
