//! Failure type passed through the [`SearchClient`](crate::client::SearchClient)
//! boundary.
//!
//! The pipeline treats every [`SearchError`] as one opaque kind: it ends the
//! in-flight search, clears the in-flight flag and is otherwise swallowed. The
//! [`ErrorKind`] only exists so a front end or a log line can say something
//! useful about it.

use std::fmt;

/// Broad category of a failed search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The configured model id cannot be used to build a request.
    InvalidCarModel,
    /// The transport failed before a response arrived.
    UnableToComplete,
    /// The backend answered with a non-success status.
    InvalidResponse,
    /// The backend answered without a usable body.
    InvalidData,
    /// The request URL could not be built or parsed.
    InvalidUrl,
    /// The body could not be decoded.
    UnableToDecode,
}

impl ErrorKind {
    /// User-facing description of the failure category.
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::InvalidCarModel => "The selected car model is invalid",
            ErrorKind::UnableToComplete => {
                "We were unable to complete the task. Please try again."
            }
            ErrorKind::InvalidResponse => {
                "The response received was invalid. Please try again."
            }
            ErrorKind::InvalidData => {
                "The received data was invalid. Please try again or contact support for help."
            }
            ErrorKind::InvalidUrl => {
                "The URL used was invalid. Please check it and fix it if necessary."
            }
            ErrorKind::UnableToDecode => {
                "We could not read the received data to be shown. Please try again or contact support for help."
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A failed search, as reported by a [`SearchClient`](crate::client::SearchClient).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}{}", .info.as_ref().map(|i| format!(" ({i})")).unwrap_or_default())]
pub struct SearchError {
    pub kind: ErrorKind,
    /// Free-form detail from the transport or decoder, if any.
    pub info: Option<String>,
}

impl SearchError {
    pub fn new(kind: ErrorKind, info: impl Into<String>) -> Self {
        Self { kind, info: Some(info.into()) }
    }

    pub fn bare(kind: ErrorKind) -> Self {
        Self { kind, info: None }
    }
}

impl From<ErrorKind> for SearchError {
    fn from(kind: ErrorKind) -> Self {
        Self::bare(kind)
    }
}
