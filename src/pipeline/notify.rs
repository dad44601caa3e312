use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Severity of a pipeline notification.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Non-blocking observation.
    Info,
    /// Lossy, approximate, or auto-corrected change the user must be told
    /// about; the run continues.
    Warning,
    /// Continued conversion is meaningless; the pipeline halts at the
    /// current stage.
    Error,
}

/// Single diagnostic record emitted by a stage.
///
/// Notifications are the sole observable trace of a run and serialize flat
/// for external reporting tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Id of the stage that emitted the record.
    pub stage: String,
    /// Record severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Optional free-form detail payload.
    #[serde(default)]
    pub details: Option<String>,
    /// Wall-clock creation time in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl Notification {
    /// Create a record with the current timestamp.
    pub fn new(severity: Severity, stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            severity,
            message: message.into(),
            details: None,
            timestamp_ms: now_ms(),
        }
    }

    /// Create an [`Severity::Info`] record.
    pub fn info(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, stage, message)
    }

    /// Create a [`Severity::Warning`] record.
    pub fn warning(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, stage, message)
    }

    /// Create an [`Severity::Error`] record.
    pub fn error(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, stage, message)
    }

    /// Attach a detail payload.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{level}] {}: {}", self.stage, self.message)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Outcome of a single stage execution: its ordered notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageReport {
    /// Notifications in emission order.
    pub notifications: Vec<Notification>,
}

impl StageReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// True when the report carries no [`Severity::Error`] record.
    pub fn success(&self) -> bool {
        !self
            .notifications
            .iter()
            .any(|n| n.severity == Severity::Error)
    }

    /// Whether the pipeline may proceed to the next stage.
    pub fn can_continue(&self) -> bool {
        self.success()
    }
}

/// Per-stage entry in a [`PipelineReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRun {
    /// Stage id.
    pub id: String,
    /// The stage's own report.
    pub report: StageReport,
}

/// Aggregated outcome of a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Reports of the stages that executed, in execution order.
    pub stages: Vec<StageRun>,
    /// Every notification of the run, in emission order.
    pub notifications: Vec<Notification>,
    /// Id of the stage that halted execution, if any.
    pub halted_at: Option<String>,
}

impl PipelineReport {
    /// True when every executed stage succeeded.
    pub fn success(&self) -> bool {
        self.halted_at.is_none()
    }

    /// The flat serializable record list for external reporting tooling.
    pub fn records(&self) -> &[Notification] {
        &self.notifications
    }

    /// Notifications at `severity`, in emission order.
    pub fn at_severity(&self, severity: Severity) -> impl Iterator<Item = &Notification> {
        self.notifications
            .iter()
            .filter(move |n| n.severity == severity)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/notify.rs"]
mod tests;
