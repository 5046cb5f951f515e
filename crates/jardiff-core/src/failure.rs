//! Comparison-time failures
//!
//! Provides [`Failure`], the error value carried on one side of a comparison
//! when a projection could not be evaluated. Failures are data: they surface
//! as `ERR_LEFT` / `ERR_RIGHT` diffs, never as aborted comparisons.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Failure to evaluate one side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    message: Option<String>,
    cause: Option<Cause>,
}

/// Captured underlying error
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cause {
    message: Option<String>,
    type_name: &'static str,
}

impl Failure {
    /// Failure with a message
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: non_empty(message.into()),
            cause: None,
        }
    }

    /// Failure wrapping an underlying error
    #[must_use]
    pub fn from_error<E>(error: &E) -> Self
    where
        E: Error + 'static,
    {
        Self {
            message: None,
            cause: Some(Cause::of(error)),
        }
    }

    /// Failure with a message and an underlying error
    #[must_use]
    pub fn with_cause<E>(message: impl Into<String>, error: &E) -> Self
    where
        E: Error + 'static,
    {
        Self {
            message: non_empty(message.into()),
            cause: Some(Cause::of(error)),
        }
    }

    /// Own message, if any
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Human hint: the message, else the cause's message, else the cause's type
    #[must_use]
    pub fn hint(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        match &self.cause {
            Some(Cause {
                message: Some(message),
                ..
            }) => message.clone(),
            Some(Cause { type_name, .. }) => (*type_name).to_string(),
            None => "unknown failure".to_string(),
        }
    }
}

impl Cause {
    fn of<E: Error + 'static>(error: &E) -> Self {
        Self {
            message: non_empty(error.to_string()),
            type_name: std::any::type_name::<E>(),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hint())
    }
}

impl Error for Failure {}
