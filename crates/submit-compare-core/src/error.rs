//! Block error types.
//!
//! Every failure the block can produce is local to one request. Handlers in
//! [`crate::handlers`] turn the user-facing variants into structured JSON
//! results; nothing here is meant to abort the host.

use thiserror::Error;

/// Errors raised while reading the question XML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The document is not well-formed XML.
    #[error("malformed question XML: {0}")]
    Malformed(String),

    /// The root element is not `submit_and_compare`.
    #[error("unexpected root element <{0}>, expected <submit_and_compare>")]
    UnexpectedRoot(String),

    /// A required section is missing under the root.
    #[error("section <{0}> not found")]
    SectionNotFound(String),

    /// A section that must be unique occurs more than once.
    #[error("section <{0}> occurs more than once")]
    DuplicateSection(String),
}

/// Errors raised by a [`crate::traits::FieldStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed to read or write.
    #[error("field store error: {0}")]
    Backend(String),

    /// A stored value does not have the field's type.
    #[error("field '{field}' holds an invalid value: {message}")]
    Decode { field: String, message: String },
}

/// Errors raised by block operations.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error(transparent)]
    Content(#[from] ContentError),

    /// The learner already used every allowed attempt.
    #[error("user has already used {count} of {max} allowed attempts")]
    AttemptsExhausted { count: u32, max: u32 },

    /// A required key is missing from a request payload.
    #[error("Missing {0} in JSON data")]
    MissingField(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BlockError {
    /// Returns `true` if the error is caused by the request rather than by
    /// the host, and should be reported back to the caller as a result.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            BlockError::Content(_)
                | BlockError::AttemptsExhausted { .. }
                | BlockError::MissingField(_)
        )
    }
}

/// Errors raised while dispatching a JSON handler call.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("unknown handler: {0}")]
    UnknownHandler(String),

    /// The request body could not be decoded into the handler's request type.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Block(#[from] BlockError),
}
