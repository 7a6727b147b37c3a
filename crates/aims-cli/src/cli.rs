use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Store used when neither `--store` nor `--config` is given
pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "aims", version, about = "AI Manifest Standard tool")]
pub struct Cli {
    /// Stores file (TOML) listing registries to consult
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Single registry URL, overriding the stores file
    #[arg(long, global = true)]
    pub store: Option<String>,
    /// Request timeout in seconds for `--store`
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect identifiers
    Did {
        #[command(subcommand)]
        command: DidCommand,
    },
    /// Work with local manifest files
    Manifest {
        #[command(subcommand)]
        command: ManifestCommand,
    },
    /// Publish a manifest file to the highest-priority store
    Publish {
        /// Manifest file (JSON)
        path: PathBuf,
    },
    /// Fetch a manifest by identifier
    Resolve {
        did: String,
        /// Write the manifest here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch a manifest and check its signature
    Verify { did: String },
}

#[derive(Debug, Subcommand)]
pub enum DidCommand {
    /// Parse an identifier and print its components
    Parse { did: String },
}

#[derive(Debug, Subcommand)]
pub enum ManifestCommand {
    /// Write an empty manifest for an identifier
    Init {
        did: String,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sign a manifest file in place
    Sign {
        path: PathBuf,
        #[command(flatten)]
        key: KeySource,
    },
    /// Validate a manifest file and report its trust state
    Verify { path: PathBuf },
}

/// Signing key material
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct KeySource {
    /// Key material given inline
    #[arg(long)]
    pub key: Option<String>,
    /// File holding the key material
    #[arg(long)]
    pub key_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_with_store() {
        let cli = Cli::try_parse_from([
            "aims",
            "resolve",
            "did:aims:web:example.com:agent",
            "--store",
            "http://localhost:9000",
        ])
        .unwrap();

        assert_eq!(cli.store.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.timeout, 30);
        assert!(matches!(cli.command, Command::Resolve { ref did, output: None } if did == "did:aims:web:example.com:agent"));
    }

    #[test]
    fn test_parse_nested_commands() {
        let cli = Cli::try_parse_from(["aims", "-v", "did", "parse", "did:aims:key:z6Mk:agent"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Did { command: DidCommand::Parse { .. } }));

        let cli = Cli::try_parse_from(["aims", "manifest", "init", "did:aims:web:a.com:b", "-o", "m.json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Manifest { command: ManifestCommand::Init { output: Some(_), .. } }
        ));
    }

    #[test]
    fn test_sign_requires_exactly_one_key_source() {
        assert!(Cli::try_parse_from(["aims", "manifest", "sign", "m.json"]).is_err());
        assert!(
            Cli::try_parse_from(["aims", "manifest", "sign", "m.json", "--key", "k", "--key-file", "f"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["aims", "manifest", "sign", "m.json", "--key-file", "key.bin"]).unwrap();
        match cli.command {
            Command::Manifest {
                command: ManifestCommand::Sign { key, .. },
            } => {
                assert!(key.key.is_none());
                assert_eq!(key.key_file, Some(PathBuf::from("key.bin")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
