//! Business rules an event must satisfy before it is stored.

use crate::error::ValidationError;
use crate::model::NewEvent;

/// Maximum title length, in characters, after trimming.
pub const MAX_TITLE_CHARS: usize = 100;

/// Validate a new event.
///
/// Rules are checked in order and the first failure is returned:
/// 1. the trimmed title is non-empty
/// 2. the trimmed title has at most [`MAX_TITLE_CHARS`] characters
/// 3. `end_time` is not before `start_time`
pub fn validate_event(event: &NewEvent) -> Result<(), ValidationError> {
    let title = event.title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong);
    }

    if event.end_time < event.start_time {
        return Err(ValidationError::EndBeforeStart);
    }

    Ok(())
}
