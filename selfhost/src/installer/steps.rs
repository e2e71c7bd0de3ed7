//! Step log returned from project installs

use serde::Serialize;

use crate::deploy::runner::CommandOutcome;

/// Result of one install step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: String,
    pub ok: bool,
    pub out: String,
    pub err: String,
}

impl StepRecord {
    pub fn from_outcome(step: &str, outcome: CommandOutcome) -> Self {
        Self {
            step: step.to_string(),
            ok: outcome.success,
            out: outcome.stdout,
            err: outcome.stderr,
        }
    }
}

/// Ordered record of the steps one install ran
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StepLog {
    records: Vec<StepRecord>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and report whether the step succeeded
    pub fn push(&mut self, record: StepRecord) -> bool {
        let ok = record.ok;
        self.records.push(record);
        ok
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Body of a completed `/install` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<StepLog>,
}

impl InstallOutcome {
    pub fn succeeded(steps: Option<StepLog>) -> Self {
        Self { ok: true, steps }
    }

    pub fn aborted(steps: StepLog) -> Self {
        Self {
            ok: false,
            steps: Some(steps),
        }
    }
}
