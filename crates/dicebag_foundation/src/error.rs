//! Error types for dicebag.
//!
//! Every core operation returns either success or exactly one [`ErrorKind`].
//! None of them are fatal to the process; the command layer decides what to
//! do with a failure.

use std::fmt;

use thiserror::Error;

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for dicebag operations.
#[derive(Debug, Error)]
#[error("{kind}{}", context_suffix(.context.as_ref()))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

fn context_suffix(context: Option<&ErrorContext>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => format!(" ({ctx})"),
        _ => String::new(),
    }
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName(name.into()))
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound(name.into()))
    }

    /// Creates a null reference error.
    #[must_use]
    pub fn null_reference(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::NullReference(what.into()))
    }

    /// Creates a self containment error.
    #[must_use]
    pub fn self_containment(collection: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(ErrorKind::SelfContainment {
            collection: collection.into(),
            target: target.into(),
        })
    }

    /// Creates a last face error.
    #[must_use]
    pub fn last_face(die: impl Into<String>) -> Self {
        Self::new(ErrorKind::LastFace(die.into()))
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates a dangling reference error.
    #[must_use]
    pub fn dangling_reference(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DanglingReference {
            collection: collection.into(),
            name: name.into(),
        })
    }

    /// Creates an I/O failure error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoFailure(message.into()))
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// An entity with this name already exists.
    #[error("name already in use: {0}")]
    DuplicateName(String),

    /// No entity, face, or content entry matched.
    #[error("object does not exist: {0}")]
    NotFound(String),

    /// The operation was given no valid target.
    #[error("no valid target: {0}")]
    NullReference(String),

    /// Adding the target would make a collection contain itself.
    #[error("collections cannot contain themselves: {target} into {collection}")]
    SelfContainment {
        /// The collection being added to.
        collection: String,
        /// The entity that was being added.
        target: String,
    },

    /// Attempted to remove the only remaining face of a die.
    #[error("can't remove last face of die {0}")]
    LastFace(String),

    /// Malformed numeric or text input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Persisted data names an entity that was never defined.
    #[error("dangling reference: {collection} contains unknown object {name}")]
    DanglingReference {
        /// The collection whose contents could not be resolved.
        collection: String,
        /// The unresolved name.
        name: String,
    },

    /// Reading or writing the backing store failed.
    #[error("i/o failure: {0}")]
    IoFailure(String),

    /// Persisted bytes could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (terminal or editor failure).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The command line step that was executing.
    pub command: Option<String>,
    /// The file involved, if any.
    pub path: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the command step.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Sets the file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns true if no context fields are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.command.is_none() && self.path.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.command, &self.path) {
            (Some(cmd), Some(path)) => write!(f, "in '{cmd}' at {path}"),
            (Some(cmd), None) => write!(f, "in '{cmd}'"),
            (None, Some(path)) => write!(f, "at {path}"),
            (None, None) => Ok(()),
        }
    }
}
