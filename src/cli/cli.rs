use crate::cli::commands::{ResetCommand, ResolveCommand, ShowCommand};
use crate::config::ResolverConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(about = "Resolve this device's identity against an identity service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Resolve(ResolveCommand),
    Show(ShowCommand),
    Reset(ResetCommand),
}

/// Store location shared by every command
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// JSON file holding the persisted device id
    #[arg(long, env = "DEVICE_IDENTITY_STORE")]
    pub store: Option<PathBuf>,
}

impl StoreArgs {
    pub fn store_path(&self) -> PathBuf {
        self.store
            .clone()
            .unwrap_or_else(ResolverConfig::default_store_path)
    }
}

/// Connection settings for the identity service
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Base URL of the identity service
    #[arg(long, env = "DEVICE_IDENTITY_API_URL", default_value = crate::protocol::DEFAULT_API_BASE_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds (none by default)
    #[arg(long, env = "DEVICE_IDENTITY_TIMEOUT_SECS")]
    pub timeout: Option<u64>,
}

impl ServiceArgs {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_flags() {
        let cli = Cli::try_parse_from([
            "device-identity",
            "resolve",
            "--api-url",
            "http://127.0.0.1:9000/api/identities",
            "--store",
            "/tmp/ids.json",
            "--timeout",
            "3",
            "--fingerprint",
            "random",
            "--json",
        ])
        .unwrap();

        let Commands::Resolve(command) = cli.command else {
            panic!("expected resolve");
        };
        let config = command.config();
        assert_eq!(config.api_url, "http://127.0.0.1:9000/api/identities");
        assert_eq!(config.store_path, PathBuf::from("/tmp/ids.json"));
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.fingerprint, crate::config::FingerprintSource::Random);
    }

    #[test]
    fn test_show_and_reset_parse() {
        assert!(matches!(
            Cli::try_parse_from(["device-identity", "show"]).unwrap().command,
            Commands::Show(_)
        ));
        assert!(matches!(
            Cli::try_parse_from(["device-identity", "reset", "--store", "/tmp/x.json"])
                .unwrap()
                .command,
            Commands::Reset(_)
        ));
    }
}
