use crate::error::{IdentityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of one identity resolution.
///
/// Phases only move forward. `Success` and `Error` are terminal; a new run
/// starts again from `Init`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    /// Nothing done yet
    #[default]
    Init,

    /// No stored id, asking the fingerprinter for one
    Generating,

    /// Asking the backend whether the device is known
    Checking,

    /// Device known, loading its record
    Fetching,

    /// Device unknown, registering it
    Creating,

    Success,

    Error,
}

impl ProcessState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Generating => "generating",
            Self::Checking => "checking",
            Self::Fetching => "fetching",
            Self::Creating => "creating",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    pub fn can_transition_to(&self, next: ProcessState) -> bool {
        use ProcessState::*;

        matches!(
            (*self, next),
            (Init, Generating | Checking | Error)
                | (Generating, Checking | Error)
                | (Checking, Fetching | Creating | Error)
                | (Fetching | Creating, Success | Error)
        )
    }

    /// Move to `next`, rejecting any step the sequence never takes
    pub fn transition(self, next: ProcessState) -> Result<ProcessState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(IdentityError::invalid_state(format!(
                "cannot move from {} to {}",
                self, next
            )))
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
