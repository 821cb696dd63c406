/// Shown for every failure that can't be explained to the user.
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "Something unexpected happened. We're sorry! Try refreshing the page, or come back later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

/// A message for the user, shown once after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub header: Option<String>,
    pub messages: Vec<String>,
}

impl Flash {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            header: None,
            messages: vec![message.into()],
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            header: None,
            messages: vec![message.into()],
        }
    }

    /// Validation messages from the server, shown verbatim under a header with the count
    pub fn validation(model: &str, messages: Vec<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            header: Some(format!(
                "{} error(s) prevented your {} from being saved:",
                messages.len(),
                model
            )),
            messages,
        }
    }

    pub fn unexpected() -> Self {
        Self::error(UNEXPECTED_ERROR_MESSAGE)
    }
}
