//! `Diagnostic` — a non-fatal observation surfaced alongside a
//! `PipelineResult` (§6's output contract). Parallels the teacher's
//! `quality_log`/parse-quality reporting, generalized across every stage
//! instead of just the parse step.

use serde::Serialize;

use crate::model::entity::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Parse,
    Detect,
    Split,
    Normalize,
}

impl Stage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Detect => "detect",
            Self::Split => "split",
            Self::Normalize => "normalize",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: Severity, stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity,
            stage,
            message: message.into(),
            location: None,
        }
    }

    #[must_use]
    pub fn info(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, stage, message)
    }

    #[must_use]
    pub fn warn(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, stage, message)
    }

    #[must_use]
    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, stage, message)
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}
