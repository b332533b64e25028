//! Closed status enums for the inspection aggregate and the explicit
//! state-machine transition table for the inspection workflow.
//!
//! Statuses are stored as TEXT in the database; `as_str` / `parse` give the
//! canonical mapping. Handlers never compare raw strings; they parse into
//! these enums and go through [`transition`].

use serde::{Deserialize, Serialize};

/// Lifecycle status of an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

impl InspectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InspectionStatus::Scheduled => "scheduled",
            InspectionStatus::InProgress => "in_progress",
            InspectionStatus::Completed => "completed",
            InspectionStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(InspectionStatus::Scheduled),
            "in_progress" => Some(InspectionStatus::InProgress),
            "completed" => Some(InspectionStatus::Completed),
            "canceled" => Some(InspectionStatus::Canceled),
            _ => None,
        }
    }

    /// Terminal states accept no further workflow operations
    /// (a reinspection is a new aggregate, not a transition).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            InspectionStatus::Completed | InspectionStatus::Canceled
        )
    }
}

/// A workflow operation that moves an inspection between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOp {
    Start,
    Complete,
    Cancel,
}

impl WorkflowOp {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowOp::Start => "start",
            WorkflowOp::Complete => "complete",
            WorkflowOp::Cancel => "cancel",
        }
    }
}

/// The full transition table for the inspection state machine.
///
/// | From                   | Op       | To          |
/// |------------------------|----------|-------------|
/// | scheduled              | start    | in_progress |
/// | scheduled, in_progress | complete | completed   |
/// | scheduled, in_progress | cancel   | canceled    |
///
/// Everything else is rejected. Returns the target status on success and a
/// human-readable reason on failure.
pub fn transition(from: InspectionStatus, op: WorkflowOp) -> Result<InspectionStatus, String> {
    use InspectionStatus::*;
    use WorkflowOp::*;

    match (from, op) {
        (Scheduled, Start) => Ok(InProgress),
        (Scheduled | InProgress, Complete) => Ok(Completed),
        (Scheduled | InProgress, Cancel) => Ok(Canceled),
        _ => Err(format!(
            "Cannot {} an inspection in status '{}'",
            op.as_str(),
            from.as_str()
        )),
    }
}

/// Statuses from which `op` is a legal move.
///
/// Workflow writes use this as the compare set in their UPDATE predicate,
/// so a row that moved on after the handler's check is refused by the
/// statement itself rather than overwritten.
pub fn transition_sources(op: WorkflowOp) -> &'static [InspectionStatus] {
    use InspectionStatus::*;

    match op {
        WorkflowOp::Start => &[Scheduled],
        WorkflowOp::Complete | WorkflowOp::Cancel => &[Scheduled, InProgress],
    }
}

/// Score recorded against a single inspection item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemScore {
    Pass,
    Fail,
    Na,
}

impl ItemScore {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemScore::Pass => "pass",
            ItemScore::Fail => "fail",
            ItemScore::Na => "na",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(ItemScore::Pass),
            "fail" => Some(ItemScore::Fail),
            "na" => Some(ItemScore::Na),
            _ => None,
        }
    }
}

/// Lifecycle status of a corrective action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Open,
    InProgress,
    Resolved,
    Verified,
    Canceled,
}

impl ActionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionStatus::Open => "open",
            ActionStatus::InProgress => "in_progress",
            ActionStatus::Resolved => "resolved",
            ActionStatus::Verified => "verified",
            ActionStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(ActionStatus::Open),
            "in_progress" => Some(ActionStatus::InProgress),
            "resolved" => Some(ActionStatus::Resolved),
            "verified" => Some(ActionStatus::Verified),
            "canceled" => Some(ActionStatus::Canceled),
            _ => None,
        }
    }
}

/// Severity of a corrective action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSeverity {
    Critical,
    Major,
    Minor,
}

impl ActionSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionSeverity::Critical => "critical",
            ActionSeverity::Major => "major",
            ActionSeverity::Minor => "minor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(ActionSeverity::Critical),
            "major" => Some(ActionSeverity::Major),
            "minor" => Some(ActionSeverity::Minor),
            _ => None,
        }
    }
}

/// Who recorded a signoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerType {
    Supervisor,
    Client,
}

impl SignerType {
    pub fn as_str(self) -> &'static str {
        match self {
            SignerType::Supervisor => "supervisor",
            SignerType::Client => "client",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "supervisor" => Some(SignerType::Supervisor),
            "client" => Some(SignerType::Client),
            _ => None,
        }
    }
}
