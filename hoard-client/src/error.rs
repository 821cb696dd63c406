use hoard_core::{ApiError, ReconcileError};
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The request failed, the user has already been told or redirected
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The response did not fit local state
    #[error("Local state is out of sync: {0}")]
    Reconcile(#[from] ReconcileError),
    /// The store was unmounted, so the response was ignored
    #[error("Store was unmounted")]
    Cancelled,
}

impl StoreError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }

    /// Messages the server refused the input with, if that is what happened
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            Self::Api(ApiError::Validation(messages)) => Some(messages),
            _ => None,
        }
    }
}
