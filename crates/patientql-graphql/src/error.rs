//! Error types for GraphQL operations.
//!
//! Resolver failures are converted into `async_graphql::Error` values whose
//! extensions carry a stable `code`, so they surface as entries in the
//! response `errors` array instead of failing the request.

use std::fmt;

use async_graphql::ErrorExtensions;
use patientql_storage::{ErrorCategory, PatientId, StorageError};

/// Errors that can occur during GraphQL operations.
#[derive(Debug)]
pub enum GraphQLError {
    /// Schema build failed.
    SchemaBuildFailed(String),

    /// The HTTP request could not be turned into a GraphQL request.
    InvalidRequest(String),

    /// An argument was missing or out of range.
    BadUserInput(String),

    /// No patient with the given id.
    NotFound {
        /// Patient id.
        id: PatientId,
    },

    /// A uniqueness constraint was violated.
    Conflict(String),

    /// The storage backend could not be reached.
    StorageUnavailable(String),

    /// Internal server error.
    Internal(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::InvalidRequest(msg) => {
                write!(f, "Invalid GraphQL request: {msg}")
            }
            Self::BadUserInput(msg) => {
                write!(f, "Invalid argument: {msg}")
            }
            Self::NotFound { id } => {
                write!(f, "patient {id} not found")
            }
            Self::Conflict(msg) => {
                write!(f, "Conflict: {msg}")
            }
            Self::StorageUnavailable(msg) => {
                write!(f, "Storage unavailable: {msg}")
            }
            Self::Internal(msg) => {
                write!(f, "Internal error: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphQLError {}

impl GraphQLError {
    /// Returns the HTTP status code for errors raised outside execution.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SchemaBuildFailed(_) | Self::Internal(_) => 500,
            Self::InvalidRequest(_) | Self::BadUserInput(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Conflict(_) => 409,
            Self::StorageUnavailable(_) => 503,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::BadUserInput(_) => "BAD_USER_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the error category for execution failures. Request-level
    /// errors (bad input, bad request, schema build) have none.
    fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::NotFound { .. } => Some(ErrorCategory::NotFound),
            Self::Conflict(_) => Some(ErrorCategory::Conflict),
            Self::StorageUnavailable(_) => Some(ErrorCategory::Infrastructure),
            Self::Internal(_) => Some(ErrorCategory::Internal),
            Self::SchemaBuildFailed(_) | Self::InvalidRequest(_) | Self::BadUserInput(_) => None,
        }
    }

    /// Converts this error into a resolver error with `code` (and `category`
    /// when there is one) in its extensions.
    #[must_use]
    pub fn into_field_error(self) -> async_graphql::Error {
        let code = self.error_code();
        let category = self.category();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", code);
            if let Some(category) = category {
                e.set("category", category.to_string());
            }
        })
    }
}

impl From<StorageError> for GraphQLError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { id } => Self::NotFound { id },
            StorageError::Conflict { message } => Self::Conflict(message),
            StorageError::ConnectionError { message } => Self::StorageUnavailable(message),
            StorageError::Internal { message } => Self::Internal(message),
        }
    }
}

/// Converts a storage error straight into a resolver error.
pub(crate) fn storage_error_to_graphql(error: StorageError) -> async_graphql::Error {
    GraphQLError::from(error).into_field_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extension(err: &async_graphql::Error, key: &str) -> Option<async_graphql::Value> {
        err.extensions.as_ref().and_then(|e| e.get(key).cloned())
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GraphQLError::InvalidRequest("x".into()).status_code(), 400);
        assert_eq!(GraphQLError::NotFound { id: 1 }.status_code(), 404);
        assert_eq!(GraphQLError::Conflict("x".into()).status_code(), 409);
        assert_eq!(
            GraphQLError::StorageUnavailable("x".into()).status_code(),
            503
        );
    }

    #[test]
    fn test_storage_error_mapping() {
        assert!(matches!(
            GraphQLError::from(StorageError::not_found(3)),
            GraphQLError::NotFound { id: 3 }
        ));
        assert!(matches!(
            GraphQLError::from(StorageError::duplicate_email("a@b.c")),
            GraphQLError::Conflict(_)
        ));
        assert!(matches!(
            GraphQLError::from(StorageError::connection_error("down")),
            GraphQLError::StorageUnavailable(_)
        ));
        assert!(matches!(
            GraphQLError::from(StorageError::internal("boom")),
            GraphQLError::Internal(_)
        ));
    }

    #[test]
    fn test_field_error_extensions() {
        let err = storage_error_to_graphql(StorageError::not_found(9));
        assert_eq!(err.message, "patient 9 not found");
        assert_eq!(
            extension(&err, "code"),
            Some(async_graphql::Value::from("NOT_FOUND"))
        );
        assert_eq!(
            extension(&err, "category"),
            Some(async_graphql::Value::from("not_found"))
        );

        let err = GraphQLError::BadUserInput("id".into()).into_field_error();
        assert_eq!(
            extension(&err, "code"),
            Some(async_graphql::Value::from("BAD_USER_INPUT"))
        );
        assert_eq!(extension(&err, "category"), None);
    }

    #[test]
    fn test_storage_internal_error_keeps_category() {
        let err = storage_error_to_graphql(StorageError::internal("row decode failed"));
        assert_eq!(
            extension(&err, "code"),
            Some(async_graphql::Value::from("INTERNAL_ERROR"))
        );
        assert_eq!(
            extension(&err, "category"),
            Some(async_graphql::Value::from("internal"))
        );
    }
}
