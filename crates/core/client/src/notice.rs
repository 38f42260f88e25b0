use clubhub_result::{Error, ErrorCategory, ErrorType};

/// What a front-end should show after a failed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Dismissible banner, with a retry button when `retry` is set
    Error { message: String, retry: bool },
    /// Route the viewer to the sign-in prompt
    SignInRequired,
    /// Inline message next to a form field
    Invalid { field: String, message: String },
}

impl From<&Error> for Notice {
    fn from(error: &Error) -> Notice {
        match (error.category(), &error.error_type) {
            (ErrorCategory::AuthRequired, _) => Notice::SignInRequired,
            (ErrorCategory::Validation, ErrorType::FailedValidation { field, error: message }) => {
                Notice::Invalid {
                    field: field.clone(),
                    message: message.clone(),
                }
            }
            (_, error_type) => Notice::Error {
                message: error_type.to_string(),
                retry: !matches!(
                    error_type,
                    ErrorType::NotOwner
                        | ErrorType::UnknownEvent
                        | ErrorType::UnknownRequest
                        | ErrorType::RequestClosed
                        | ErrorType::VotePending
                        | ErrorType::NotFound
                        | ErrorType::NoEffect
                ),
            },
        }
    }
}

impl From<Error> for Notice {
    fn from(error: Error) -> Notice {
        Notice::from(&error)
    }
}
