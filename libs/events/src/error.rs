//! Error types for event validation.

use thiserror::Error;

/// Business rule violations detected before an event is persisted.
///
/// Only the first failing rule is reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The title is empty once surrounding whitespace is removed.
    #[error("title is required")]
    TitleRequired,

    /// The trimmed title exceeds the maximum length.
    #[error("title is too long (100 characters tops)")]
    TitleTooLong,

    /// The event ends before it starts.
    #[error("end time must be after start time")]
    EndBeforeStart,
}

impl ValidationError {
    /// Human-readable reason, identical to the `Display` output.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::TitleRequired => "title is required",
            ValidationError::TitleTooLong => "title is too long (100 characters tops)",
            ValidationError::EndBeforeStart => "end time must be after start time",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_matches_display() {
        for err in [
            ValidationError::TitleRequired,
            ValidationError::TitleTooLong,
            ValidationError::EndBeforeStart,
        ] {
            assert_eq!(err.reason(), err.to_string());
        }
    }
}
