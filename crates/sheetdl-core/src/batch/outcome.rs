//! Per-row outcome records and the run report.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::fetch::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum OutcomeStatus {
    Success { size: u64, sha256: String },
    Failed { error: String },
}

/// Result of attempting one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub url: String,
    /// Name resolved for the row (also recorded for failures).
    pub filename: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
    /// Tier of the error, for failures.
    #[serde(skip)]
    pub error_kind: Option<ErrorKind>,
}

impl Outcome {
    pub fn success(url: &str, filename: &str, size: u64, sha256: String) -> Self {
        Self {
            url: url.to_string(),
            filename: filename.to_string(),
            status: OutcomeStatus::Success { size, sha256 },
            error_kind: None,
        }
    }

    pub fn failed(url: &str, filename: &str, kind: ErrorKind, error: String) -> Self {
        Self {
            url: url.to_string(),
            filename: filename.to_string(),
            status: OutcomeStatus::Failed { error },
            error_kind: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success { .. })
    }

    pub fn size(&self) -> Option<u64> {
        match &self.status {
            OutcomeStatus::Success { size, .. } => Some(*size),
            OutcomeStatus::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Success { .. } => None,
            OutcomeStatus::Failed { error } => Some(error),
        }
    }
}

/// All outcomes of one run, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.successful()
    }

    /// Sum of sizes of successful rows.
    pub fn bytes(&self) -> u64 {
        self.outcomes.iter().filter_map(Outcome::size).sum()
    }

    /// Export the download log as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}
