#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

use std::fmt;

/// Result type with custom Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error information
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Error {
    /// Type of error and additional information
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub error_type: ErrorType,

    /// Where this error occurred
    pub location: String,
}

/// Possible error types
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    /// This error was not labeled :(
    LabelMe,

    // ? Session related errors
    NotAuthenticated,
    NotOwner,

    // ? Event request related errors
    UnknownEvent,
    UnknownRequest,
    VotePending,
    RequestClosed,

    // ? Client-side validation
    FailedValidation {
        field: String,
        error: String,
    },

    // ? Remote errors
    NetworkError {
        reason: String,
    },
    DatabaseError {
        operation: String,
        collection: String,
    },
    InvalidRecord {
        collection: String,
        reason: String,
    },
    MissingCollection {
        collection: String,
    },

    // ? General errors
    InternalError,
    NotFound,
    NoEffect,
}

/// How a failure should be presented to the person who triggered it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Remote or unexpected failure, shown as a dismissible banner with retry
    Remote,
    /// The action needs a signed-in user, route to the sign-in prompt
    AuthRequired,
    /// Caught before any network call, shown inline next to the form
    Validation,
}

impl ErrorType {
    /// Classify this error for presentation
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorType::NotAuthenticated => ErrorCategory::AuthRequired,
            ErrorType::FailedValidation { .. } => ErrorCategory::Validation,
            _ => ErrorCategory::Remote,
        }
    }
}

impl Error {
    /// Classify this error for presentation
    pub fn category(&self) -> ErrorCategory {
        self.error_type.category()
    }

    /// Whether repeating the same call could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.error_type,
            ErrorType::NetworkError { .. } | ErrorType::DatabaseError { .. }
        )
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::LabelMe => write!(f, "Something went wrong"),
            ErrorType::NotAuthenticated => write!(f, "You must be signed in to do that"),
            ErrorType::NotOwner => write!(f, "Only the creator can do that"),
            ErrorType::UnknownEvent => write!(f, "Event not found"),
            ErrorType::UnknownRequest => write!(f, "Request not found"),
            ErrorType::VotePending => write!(f, "A vote is already being saved"),
            ErrorType::RequestClosed => write!(f, "This request is no longer open"),
            ErrorType::FailedValidation { error, .. } => write!(f, "{error}"),
            ErrorType::NetworkError { reason } => write!(f, "Network error: {reason}"),
            ErrorType::DatabaseError {
                operation,
                collection,
            } => write!(f, "Failed to {operation} on {collection}"),
            ErrorType::InvalidRecord { collection, reason } => {
                write!(f, "Malformed {collection} record: {reason}")
            }
            ErrorType::MissingCollection { collection } => {
                write!(f, "Backend has no {collection} collection")
            }
            ErrorType::InternalError => write!(f, "Internal error"),
            ErrorType::NotFound => write!(f, "Not found"),
            ErrorType::NoEffect => write!(f, "Nothing changed"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error_type, self.location)
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! create_error {
    ( $error: ident $( $tt:tt )? ) => {
        $crate::Error {
            error_type: $crate::ErrorType::$error $( $tt )?,
            location: format!("{}:{}:{}", file!(), line!(), column!()),
        }
    };
}

#[macro_export]
macro_rules! create_database_error {
    ( $operation: expr, $collection: expr ) => {
        $crate::create_error!(DatabaseError {
            operation: $operation.to_string(),
            collection: $collection.to_string()
        })
    };
}

#[macro_export]
macro_rules! create_validation_error {
    ( $field: expr, $error: expr ) => {
        $crate::create_error!(FailedValidation {
            field: $field.to_string(),
            error: $error.to_string()
        })
    };
}
