use thiserror::Error;

/// Error for plan and session titles
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TitleError {
    #[error("Title must not be empty")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for study plan and study session operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid plan ID: {0}")]
    InvalidPlanId(String),

    #[error("Invalid session ID: {0}")]
    InvalidSessionId(String),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("Plan end date must not be before its start date")]
    InvalidDateRange,

    #[error("Session duration must be a positive number of minutes, got {0}")]
    InvalidDuration(i64),

    #[error("Invalid session status: {0} (expected todo, in_progress or done)")]
    InvalidStatus(String),

    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
