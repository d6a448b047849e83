//! Pluggable reactions to the three non-structural conditions of an
//! assertion pass: no accessor found, random generation failed, and
//! round-trip failed.

use std::fmt;
use std::sync::Arc;

use log::info;

use crate::error::AssertionError;

/// A single-invocation reaction to a message and an optional cause.
/// Behaviors are never retried and never invoked more than once per
/// condition.
#[derive(Clone)]
pub enum Behavior {
    /// Record the message to the log and continue.
    Log { include_cause: bool },
    /// Panic with the message, failing the surrounding test. This is how
    /// failures surface to the host test framework.
    Fail,
    /// Return the message as an [`AssertionError`], for embedding contexts
    /// that are not test frameworks.
    Raise,
    /// Caller-supplied callback.
    Custom(Arc<dyn Fn(&str, Option<&str>) + Send + Sync>),
}

impl Behavior {
    /// React to a condition. `Fail` panics; `Raise` returns an error that
    /// the caller is expected to propagate; the others return normally.
    pub fn behave(&self, message: &str, cause: Option<&str>) -> Result<(), AssertionError> {
        match self {
            Behavior::Log { include_cause } => {
                match cause.filter(|_| *include_cause) {
                    Some(cause) => info!("{} (cause: {})", message, cause),
                    None => info!("{}", message),
                }
                Ok(())
            }
            Behavior::Fail => panic!("{}", compose(message, cause)),
            Behavior::Raise => Err(match cause {
                Some(cause) => AssertionError::with_cause(message, cause),
                None => AssertionError::new(message),
            }),
            Behavior::Custom(callback) => {
                callback(message, cause);
                Ok(())
            }
        }
    }
}

fn compose(message: &str, cause: Option<&str>) -> String {
    match cause {
        Some(cause) => format!("{} due to: {}", message, cause),
        None => message.to_string(),
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Behavior::Log { include_cause } => f
                .debug_struct("Log")
                .field("include_cause", include_cause)
                .finish(),
            Behavior::Fail => write!(f, "Fail"),
            Behavior::Raise => write!(f, "Raise"),
            Behavior::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
