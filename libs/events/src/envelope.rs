//! Structured error envelope - the uniform body of every failed response.
//!
//! A [`StructuredError`] pairs a short summary with the ordered list of
//! underlying causes. On the wire it is `{"message": ..., "err": [...]}`
//! with empty fields omitted. In process it also keeps the original cause
//! values, so code holding an envelope can still ask "was this a not-found?"
//! by downcasting instead of matching strings.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Boxed, thread-safe error value.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// All causes of a [`StructuredError`] combined into a single error value.
///
/// `Display` joins the causes with newlines, in insertion order.
#[derive(Debug, Default)]
pub struct JoinedCauses {
    errors: Vec<BoxError>,
}

impl JoinedCauses {
    /// Number of causes.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether there are no causes.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the causes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn Error + Send + Sync + 'static)> {
        self.errors.iter().map(|e| &**e)
    }

    /// Find the first cause of type `E`, looking through each cause's source chain.
    pub fn find<E: Error + 'static>(&self) -> Option<&E> {
        self.downcast_all::<E>().next()
    }

    /// Every value of type `E` across all causes and their source chains, in order.
    fn downcast_all<E: Error + 'static>(&self) -> impl Iterator<Item = &E> {
        self.iter()
            .flat_map(|err| source_chain(err))
            .filter_map(|e| e.downcast_ref::<E>())
    }
}

/// `err` followed by each of its transitive sources.
fn source_chain<'a>(err: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

impl fmt::Display for JoinedCauses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl Error for JoinedCauses {}

/// A cause known only by its message, as read back from the wire.
#[derive(Debug)]
struct CauseMessage(String);

impl fmt::Display for CauseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for CauseMessage {}

/// Error envelope carrying a summary message and its ordered causes.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(from = "WireError")]
pub struct StructuredError {
    #[serde(skip_serializing_if = "String::is_empty")]
    message: String,

    #[serde(rename = "err", skip_serializing_if = "Vec::is_empty")]
    causes: Vec<String>,

    #[serde(skip)]
    sources: JoinedCauses,
}

#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    err: Vec<String>,
}

impl From<WireError> for StructuredError {
    fn from(wire: WireError) -> Self {
        let sources = JoinedCauses {
            errors: wire
                .err
                .iter()
                .map(|msg| Box::new(CauseMessage(msg.clone())) as BoxError)
                .collect(),
        };
        Self {
            message: wire.message,
            causes: wire.err,
            sources,
        }
    }
}

impl StructuredError {
    /// Create an envelope with no causes.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Append a cause.
    pub fn with_cause(self, cause: impl Into<BoxError>) -> Self {
        self.with_causes([Some(cause)])
    }

    /// Append several causes, skipping `None` entries.
    pub fn with_causes<I, E>(mut self, causes: I) -> Self
    where
        I: IntoIterator<Item = Option<E>>,
        E: Into<BoxError>,
    {
        for cause in causes.into_iter().flatten() {
            let cause = cause.into();
            self.causes.push(cause.to_string());
            self.sources.errors.push(cause);
        }
        self
    }

    /// The summary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Cause descriptions in insertion order.
    pub fn messages(&self) -> &[String] {
        &self.causes
    }

    /// All causes as one combined error, or `None` when there are none.
    pub fn unwrap_causes(&self) -> Option<&JoinedCauses> {
        if self.sources.is_empty() {
            None
        } else {
            Some(&self.sources)
        }
    }

    /// Find the first cause of type `E` anywhere in the cause chains.
    pub fn find_cause<E: Error + 'static>(&self) -> Option<&E> {
        self.sources.find::<E>()
    }

    /// Whether any cause matches `predicate` after downcasting to `E`.
    pub fn has_cause<E, F>(&self, predicate: F) -> bool
    where
        E: Error + 'static,
        F: Fn(&E) -> bool,
    {
        self.sources.downcast_all::<E>().any(predicate)
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str(&self.message),
        }
    }
}

impl Error for StructuredError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.unwrap_causes().map(|c| c as &(dyn Error + 'static))
    }
}

impl PartialEq for StructuredError {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.causes == other.causes
    }
}
