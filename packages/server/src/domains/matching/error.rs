use thiserror::Error;

use crate::common::{MatchId, SportId, UserId};

/// Coarse failure category, for mapping onto a transport status
///
/// `NotFound`, `Forbidden`, `Conflict` and `InvalidState` cover the match
/// lifecycle. `InvalidRequest` is for input that can never succeed whatever
/// the stored state (a request to yourself, a sport the pair has not added,
/// a malformed id), so clients can tell it apart from a stale `InvalidState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Conflict,
    InvalidState,
    InvalidRequest,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code surfaced to API clients
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Errors raised by discovery and the match lifecycle
#[derive(Error, Debug)]
pub enum MatchingError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Profile not found for user: {0}")]
    ProfileNotFound(UserId),

    #[error("Sport not found: {0}")]
    SportNotFound(SportId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("A match between these users for this sport already exists")]
    Conflict { existing: Option<MatchId> },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl MatchingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchingError::UserNotFound(_)
            | MatchingError::ProfileNotFound(_)
            | MatchingError::SportNotFound(_)
            | MatchingError::MatchNotFound(_) => ErrorKind::NotFound,
            MatchingError::Forbidden(_) => ErrorKind::Forbidden,
            MatchingError::Conflict { .. } => ErrorKind::Conflict,
            MatchingError::InvalidState(_) => ErrorKind::InvalidState,
            MatchingError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            MatchingError::Storage(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn already_processed() -> Self {
        MatchingError::InvalidState("match request has already been processed".to_string())
    }
}

impl From<sqlx::Error> for MatchingError {
    fn from(e: sqlx::Error) -> Self {
        MatchingError::Storage(e.into())
    }
}

impl MatchingError {
    /// GraphQL error carrying `extensions.code`
    ///
    /// Storage failures are logged here and reported without detail.
    pub fn into_field_error(self) -> juniper::FieldError {
        let kind = self.kind();
        let message = if kind == ErrorKind::Internal {
            tracing::error!(error = %self, "Matching operation failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let mut extensions = juniper::Object::with_capacity(1);
        extensions.add_field("code", juniper::Value::scalar(kind.code().to_string()));
        juniper::FieldError::new(message, juniper::Value::Object(extensions))
    }
}
