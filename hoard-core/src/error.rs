use serde::Deserialize;
use thiserror::Error;

use crate::PrimaryKey;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// How a failed request is classified. Every failure is exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The session is missing or no longer valid
    #[error("Unauthorized")]
    Unauthorized,
    /// The resource doesn't exist, or doesn't belong to the user
    #[error("Resource not found")]
    NotFound,
    /// The server refused the input, with messages meant for the user
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    /// A server error, an unrecognized status, or a transport failure
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Decides which 422 responses are real validation errors.
///
/// The API sometimes answers 422 for failures the user can't fix. Those are
/// recognized by messages that don't start with a known attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Every 422 is a validation error
    Any,
    /// Every message's first word must be one of these
    Attributes(&'static [&'static str]),
}

impl ValidationPolicy {
    pub fn accepts(&self, messages: &[String]) -> bool {
        match self {
            Self::Any => true,
            Self::Attributes(attributes) => messages.iter().all(|message| {
                message
                    .split_whitespace()
                    .next()
                    .map(|word| attributes.contains(&word))
                    .unwrap_or(false)
            }),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Classifies a non-success response.
pub fn classify(status: u16, body: &[u8], policy: ValidationPolicy) -> ApiError {
    match status {
        401 => ApiError::Unauthorized,
        404 => ApiError::NotFound,
        422 => {
            let messages = serde_json::from_slice::<ErrorBody>(body)
                .map(|b| b.errors)
                .unwrap_or_default();

            if !messages.is_empty() && policy.accepts(&messages) {
                ApiError::Validation(messages)
            } else {
                ApiError::Unexpected(format!(
                    "Unprocessable entity: {}",
                    String::from_utf8_lossy(body)
                ))
            }
        }
        status => ApiError::Unexpected(format!(
            "Status {}: {}",
            status,
            String::from_utf8_lossy(body)
        )),
    }
}

/// Local state didn't line up with a server response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("Collection has regular lists but no aggregate list")]
    MissingAggregate,
    #[error("Collection has more than one aggregate list")]
    DuplicateAggregate,
    #[error("List {0} is not in the collection")]
    ListNotFound(PrimaryKey),
    #[error("Item {0} is not on any list in the collection")]
    ItemNotFound(PrimaryKey),
    #[error("Item {0} can't hold a larger quantity")]
    QuantityOutOfRange(PrimaryKey),
}
