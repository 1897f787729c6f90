use thiserror::Error;

/// Errors that can occur while preparing, sending or resolving an Agent call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AgentError {
    /// A field failed its presence or primitive-type check before serialization.
    #[error("field check failed: '{field}': {message}")]
    Validation { field: String, message: String },

    /// The request tree could not be emitted as well-formed XML.
    /// `partial_xml` carries the best-effort document for diagnostics.
    #[error("building the request XML failed: {message}")]
    Serialization {
        message: String,
        partial_xml: Option<String>,
    },

    /// More attachments than the service accepts (5).
    #[error("cannot attach {count} files, the service accepts at most 5")]
    AttachmentLimitExceeded { count: usize },

    /// A referenced attachment path could not be read at call time.
    #[error("attachment not found: {path}")]
    AttachmentNotFound { path: String },

    /// The service signaled a system-maintenance condition.
    #[error("the Számlázz.hu system is down for maintenance")]
    ServiceUnavailable,

    /// The response carried no headers at all.
    #[error("the response carried no headers")]
    MalformedResponse,

    /// A body was expected but the response had none.
    #[error("the response carried no body")]
    EmptyResponse,

    /// The service answered but reported a business error.
    #[error("the service reported an error: [{code}] {message}")]
    RemoteOperationFailed { code: String, message: String },

    /// HTTP-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// Outcome could not be rendered as JSON.
    #[error("JSON encoding failed: {0}")]
    Json(String),
}

impl AgentError {
    /// Shorthand for a validation failure on a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
