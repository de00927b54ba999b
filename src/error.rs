//! Machine-readable error codes.

/// Implemented by every error that can cross the HTTP boundary. The code is a
/// stable, grep-able string (`E_ZONE_NOT_FOUND`); the `Display` output is the
/// human-readable message.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body of every non-2xx HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    #[must_use]
    pub fn from_error(err: &impl ErrorCode) -> Self {
        Self { code: err.error_code().to_owned(), message: err.to_string() }
    }
}
