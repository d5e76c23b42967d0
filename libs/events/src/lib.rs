//! # evtbook-events
//!
//! Event model, validation rules and the structured error envelope for evtbook.
//!
//! ## Design Principles
//!
//! - Events are created once and never updated or deleted
//! - The store is the sole authority for `id` and `created_at`
//! - Validation is a pure function; it never logs and never mutates its input
//! - Every error returned to an HTTP caller travels inside a [`StructuredError`]
//!
//! ## Wire Format
//!
//! Events serialize with `start_time`/`end_time` in snake_case and `createdAt`
//! in camelCase. Existing callers depend on that mix, so it is kept as-is.

mod envelope;
mod error;
mod model;
mod validation;

pub use envelope::{BoxError, JoinedCauses, StructuredError};
pub use error::ValidationError;
pub use model::{Event, NewEvent};
pub use validation::{validate_event, MAX_TITLE_CHARS};
