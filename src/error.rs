//! Error types for assertion passes and random value generation.

use std::any::Any;
use std::fmt;

use crate::config::ConfigError;

/// A fatal assertion failure surfaced from an assertion pass.
///
/// Produced by the `Raise` behavior; the `Fail` behavior panics with the
/// same composed message instead.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionError {
    message: String,
    cause: Option<AssertionCause>,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// An assertion failure with an underlying cause. The cause is folded
    /// into the displayed message and also surfaced through
    /// [`std::error::Error::source`].
    pub fn with_cause(message: impl Into<String>, cause: impl Into<String>) -> Self {
        let message = message.into();
        let cause = cause.into();
        Self {
            message: format!("{} due to: {}", message, cause),
            cause: Some(AssertionCause(cause)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_ref().map(|c| c.0.as_str())
    }
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AssertionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|c| c as &(dyn std::error::Error + 'static))
    }
}

/// The underlying cause of an [`AssertionError`], kept as its own error so
/// it can be walked through `source()` chains.
#[derive(Debug, Clone, PartialEq)]
struct AssertionCause(String);

impl fmt::Display for AssertionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for AssertionCause {}

/// A random value could not be produced for a requested type.
///
/// This is a non-fatal, policy-routed condition: the affected property is
/// skipped, not failed.
#[derive(Debug, Clone)]
pub enum GenerationError {
    /// No generator is registered for the requested type.
    NoGenerator {
        method: String,
        type_name: &'static str,
    },
    /// The registered generator declares an output type that is not
    /// equivalent to the requested type.
    TypeMismatch {
        method: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// The generator panicked while producing a value.
    Panicked {
        method: String,
        cause: Option<String>,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::NoGenerator { method, type_name } => {
                write!(
                    f,
                    "can't execute random method {}: no generator registered for {}",
                    method, type_name
                )
            }
            GenerationError::TypeMismatch {
                method,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "can't execute random method {}: returns {}, expected {}",
                    method, actual, expected
                )
            }
            GenerationError::Panicked { method, cause } => {
                write!(f, "random method {} panicked", method)?;
                if let Some(cause) = cause {
                    write!(f, ": {}", cause)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// Fatal construction-time errors from the asserter builder.
#[derive(Debug, Clone)]
pub enum BuildError {
    /// No target object was supplied.
    MissingTarget,
    /// No method table was supplied.
    MissingMethods,
    /// The default random source could not be constructed.
    Seed(ConfigError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingTarget => {
                write!(f, "cannot build a PropertyAsserter without a target")
            }
            BuildError::MissingMethods => {
                write!(f, "cannot build a PropertyAsserter without a method table")
            }
            BuildError::Seed(err) => write!(f, "cannot construct the default random source: {}", err),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Seed(err) => Some(err),
            _ => None,
        }
    }
}

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some((*s).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}
