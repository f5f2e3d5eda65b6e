//! Error types for reflective access
//!
//! Every fallible operation in the crate surfaces a [`MirrorError`].
//! Failures thrown by registered method and constructor bodies travel as
//! [`NativeError`] and are re-surfaced as the `source` of
//! [`MirrorError::Invocation`], never swallowed.

/// Result type for reflective operations
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Reflective access errors
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// No exact or similar member match after full resolution
    #[error("no matching member `{member}` on `{target}`")]
    MemberNotFound {
        /// The requested member name (with signature hint where useful)
        member: String,
        /// Name of the type the lookup started from
        target: String,
    },

    /// Capability token insufficient to escalate for the declaring type
    #[error("access denied: module `{origin}` may not open `{class}` for deep reflection")]
    AccessDenied {
        /// Name of the declaring class that refused escalation
        class: String,
        /// Origin module of the capability token
        origin: String,
    },

    /// The target member body failed during execution
    #[error("invocation of `{member}` failed")]
    Invocation {
        /// The invoked member name
        member: String,
        /// The original failure raised by the member body
        #[source]
        source: NativeError,
    },

    /// Incompatible types given to a cast-style operation
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the operation required
        expected: String,
        /// What it was given
        found: String,
    },

    /// A required construction input was null or absent
    #[error("missing required value: {0}")]
    MissingValue(&'static str),

    /// Field navigation or a value-capturing call produced a null value
    #[error("`{member}` resolved to a null value")]
    NullResult {
        /// The member whose value was null
        member: String,
    },

    /// A class id or name that is not present in the registry
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// A class definition that cannot be registered
    #[error("invalid class definition: {0}")]
    Definition(String),
}

/// Errors raised by registered method and constructor bodies
#[derive(Debug, Clone, thiserror::Error)]
pub enum NativeError {
    /// A null value was dereferenced or rejected by the body
    #[error("null pointer")]
    NullPointer,

    /// An argument the body could not work with
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Body-specific failure message
    #[error("{0}")]
    Message(String),
}

impl From<String> for NativeError {
    fn from(s: String) -> Self {
        NativeError::Message(s)
    }
}

impl From<&str> for NativeError {
    fn from(s: &str) -> Self {
        NativeError::Message(s.to_string())
    }
}
