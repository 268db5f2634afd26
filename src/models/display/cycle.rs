//! Validation cycle display model

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::session::CycleOutcome;

/// One validation cycle as shown by `check` and `watch`.
#[derive(Debug, Clone, Serialize)]
pub struct CycleDisplay {
    /// Completion time (RFC 3339)
    pub checked_at: String,

    /// valid, renewed, ended, already-checking
    pub outcome: String,

    /// Teardown reason when the session ended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CycleDisplay {
    pub fn new(outcome: CycleOutcome, at: DateTime<Local>) -> Self {
        let (label, reason) = match outcome {
            CycleOutcome::Valid => ("valid", None),
            CycleOutcome::Renewed => ("renewed", None),
            CycleOutcome::Ended(reason) => ("ended", Some(reason.to_string())),
            CycleOutcome::AlreadyChecking => ("already-checking", None),
        };
        Self {
            checked_at: at.to_rfc3339(),
            outcome: label.to_string(),
            reason,
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        match self.outcome.as_str() {
            "valid" => "Credentials are valid".to_string(),
            "renewed" => "Access token was rejected and has been renewed".to_string(),
            "ended" => format!(
                "Session ended: {}",
                self.reason.as_deref().unwrap_or("unknown reason")
            ),
            _ => "A check is already in progress".to_string(),
        }
    }
}
