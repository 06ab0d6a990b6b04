use crate::cli::cli::{ServiceArgs, StoreArgs};
use crate::cli::ui::{display_error, display_snapshot};
use crate::config::{DefaultResolver, FingerprintSource, ResolverConfig};
use crate::core::{ProcessState, Snapshot, render};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "resolve", about = "Resolve or register this device's identity")]
pub struct ResolveCommand {
    #[command(flatten)]
    service: ServiceArgs,

    #[command(flatten)]
    store: StoreArgs,

    /// How to derive a device id when none is stored
    #[arg(long, value_enum, default_value_t = FingerprintSource::Host)]
    fingerprint: FingerprintSource,

    /// Print the identity record as JSON instead of the device id
    #[arg(short, long)]
    json: bool,

    /// Exit on failure instead of offering to retry
    #[arg(long)]
    no_retry: bool,
}

impl ResolveCommand {
    pub fn config(&self) -> ResolverConfig {
        ResolverConfig::default()
            .api_url(self.service.api_url.clone())
            .store_path(self.store.store_path())
            .timeout(self.service.timeout())
            .fingerprint(self.fingerprint)
    }
}

enum Outcome {
    Finished(Snapshot),
    Interrupted,
}

/// How a resolve invocation ended. Failures are already on screen by the
/// time this is returned, so they map to an exit code rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveStatus {
    Resolved,
    Failed,
    Interrupted,
}

impl ResolveStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Resolved => 0,
            Self::Failed => 1,
            // 128 + SIGINT
            Self::Interrupted => 130,
        }
    }
}

impl From<ResolveStatus> for ExitCode {
    fn from(status: ResolveStatus) -> Self {
        ExitCode::from(status.exit_code())
    }
}

fn settled_status(snapshot: &Snapshot) -> Option<ResolveStatus> {
    match snapshot.state {
        ProcessState::Success => Some(ResolveStatus::Resolved),
        ProcessState::Error => Some(ResolveStatus::Failed),
        _ => None,
    }
}

pub async fn execute(command: ResolveCommand) -> anyhow::Result<ResolveStatus> {
    let config = command.config();
    tracing::debug!("Resolving with {:?}", config);
    let resolver = config.resolver()?;
    let interactive = !command.no_retry && std::io::stdin().is_terminal();

    loop {
        let snapshot = match watch_run(&resolver, command.json).await {
            Outcome::Finished(snapshot) => snapshot,
            Outcome::Interrupted => {
                display_error("Interrupted");
                return Ok(ResolveStatus::Interrupted);
            }
        };

        match settled_status(&snapshot) {
            Some(ResolveStatus::Resolved) => {
                if command.json {
                    if let Some(record) = &snapshot.record {
                        println!("{}", serde_json::to_string_pretty(record)?);
                    }
                }
                return Ok(ResolveStatus::Resolved);
            }
            Some(status) => {
                // Retrying starts over from the stored id, like reloading the page
                if interactive && inquire::Confirm::new("Retry?").with_default(true).prompt()? {
                    continue;
                }
                return Ok(status);
            }
            None => anyhow::bail!("Identity resolution stopped while {}", snapshot.state),
        }
    }
}

/// Run one activation, printing each new status line until it ends
async fn watch_run(resolver: &DefaultResolver, quiet: bool) -> Outcome {
    let activation = resolver.activate();
    let mut receiver = activation.subscribe();
    let mut last_line = None;

    loop {
        let snapshot = receiver.borrow_and_update().clone();
        let line = render(&snapshot);
        if line != last_line {
            // JSON output keeps stdout clean apart from the record
            if !quiet || snapshot.state == ProcessState::Error {
                display_snapshot(&snapshot);
            }
            last_line = line;
        }
        if snapshot.is_terminal() {
            break;
        }

        tokio::select! {
            changed = receiver.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                activation.deactivate();
                return Outcome::Interrupted;
            }
        }
    }

    Outcome::Finished(activation.wait().await)
}
