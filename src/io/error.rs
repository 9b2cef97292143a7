//! SerialError: failures while reading or writing a serialized stream.
//!
//! Every error carries a [`SerialErrorKind`] plus a chain of context lines.
//! Each layer of the reader that sees an error on its way out appends one
//! line, innermost first, so the rendered message reads like a stack of
//! "while ..." notes under the root cause.

use crate::mesh_error::MeshError;
use std::fmt;
use thiserror::Error;

/// Root cause of a [`SerialError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerialErrorKind {
    /// A stream or object marker did not match.
    #[error("bad marker \"{found}\" (expected \"{expected}\")")]
    BadMarker {
        expected: &'static str,
        found: String,
    },
    /// The buffer ended before a complete value could be read.
    #[error("unexpected end of buffer reading {what}: need {needed} bytes, {available} left")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },
    /// The object count in a stream header was negative.
    #[error("corrupt data (number of objects is negative: {0})")]
    NegativeCount(i32),
    /// No conversion is registered for this `type:version` key.
    #[error("unrecognized type \"{0}\"")]
    UnrecognizedType(String),
    /// The payload decoded but does not describe a valid object.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    /// A conversion with this key is already in the registry.
    #[error("conversion \"{0}\" is already registered")]
    DuplicateRegistration(String),
}

/// Serialization error with a chain of context lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}{}", ContextLines(.context))]
pub struct SerialError {
    kind: SerialErrorKind,
    context: Vec<String>,
}

impl SerialError {
    pub fn new(kind: SerialErrorKind) -> Self {
        Self {
            kind,
            context: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> &SerialErrorKind {
        &self.kind
    }

    /// Context lines, innermost first.
    #[inline]
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Append one line of context.
    pub fn add_context(mut self, line: impl Into<String>) -> Self {
        self.context.push(line.into());
        self
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SerialErrorKind::InvalidPayload(msg.into()).into()
    }
}

impl From<SerialErrorKind> for SerialError {
    fn from(kind: SerialErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<MeshError> for SerialError {
    fn from(err: MeshError) -> Self {
        Self::invalid(err.to_string())
    }
}

struct ContextLines<'a>(&'a [String]);

impl fmt::Display for ContextLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.0 {
            write!(f, "\n    ({line})")?;
        }
        Ok(())
    }
}

/// Attach context to the error side of a `Result`.
pub trait ResultExt<T> {
    fn context(self, line: impl Into<String>) -> Result<T, SerialError>;

    /// Like [`context`](Self::context), building the line only on error.
    fn with_context<F, S>(self, line: F) -> Result<T, SerialError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: Into<SerialError>> ResultExt<T> for Result<T, E> {
    fn context(self, line: impl Into<String>) -> Result<T, SerialError> {
        self.map_err(|e| e.into().add_context(line))
    }

    fn with_context<F, S>(self, line: F) -> Result<T, SerialError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.into().add_context(line()))
    }
}
