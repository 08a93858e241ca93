//! Error types for pipeline operations
//!
//! Errors are classified by who can act on them:
//! - Validation: form input the user must correct (shown as a toast)
//! - NotFound: a stale id from the view layer, logged and ignored
//! - Config / Io / Json: settings and snapshot files on disk

use thiserror::Error;

/// Form validation failures. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Lead name is required")]
    LeadNameRequired,

    #[error("Deal title is required")]
    DealTitleRequired,

    #[error("Please select a lead")]
    LeadNotSelected,

    #[error("Please enter a valid deal value")]
    InvalidDealValue,

    #[error("Please enter a valid probability")]
    InvalidProbability,

    #[error("Probability must be between 0 and 100")]
    ProbabilityOutOfRange,

    #[error("Task title is required")]
    TaskTitleRequired,

    #[error("Please enter a valid due date")]
    InvalidDueDate,

    #[error("Note content is required")]
    NoteContentRequired,
}

/// Errors from pipeline mutations and settings persistence.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn not_found(kind: &'static str, id: &str) -> Self {
        PipelineError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns true if the message is meant for the user rather than the log
    pub fn is_user_facing(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

/// Transient notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Serializable toast for the view layer
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&PipelineError> for Notice {
    fn from(err: &PipelineError) -> Self {
        Notice::error(err.to_string())
    }
}
