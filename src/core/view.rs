use crate::core::state::ProcessState;
use crate::protocol::IdentityRecord;

/// Presentation state of one activation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub state: ProcessState,
    /// Set only in `Error`
    pub error: Option<String>,
    /// Set only in `Success`
    pub record: Option<IdentityRecord>,
}

impl Snapshot {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Resolved device id, once the run succeeded
    pub fn device_id(&self) -> Option<&str> {
        match self.state {
            ProcessState::Success => self.record.as_ref().map(|r| r.device_id.as_str()),
            _ => None,
        }
    }
}

/// Status line for a snapshot.
///
/// `None` when there is nothing to show, i.e. a success without a record.
pub fn render(snapshot: &Snapshot) -> Option<String> {
    let text = match snapshot.state {
        ProcessState::Init => "Initializing device...".to_string(),
        ProcessState::Generating => "Generating device fingerprint...".to_string(),
        ProcessState::Checking => "Checking device registration...".to_string(),
        ProcessState::Fetching => "Fetching identity...".to_string(),
        ProcessState::Creating => "Creating new identity...".to_string(),
        ProcessState::Success => snapshot.device_id()?.to_string(),
        ProcessState::Error => format!(
            "Error: {}",
            snapshot.error.as_deref().unwrap_or("unknown error")
        ),
    };
    Some(text)
}
