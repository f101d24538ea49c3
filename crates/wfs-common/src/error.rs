//! Error types for WFS output encoding.

use thiserror::Error;

/// Result type alias using WfsError.
pub type WfsResult<T> = Result<T, WfsError>;

/// Primary error type for feature encoding.
#[derive(Debug, Error)]
pub enum WfsError {
    // === Request Errors ===
    #[error("Unknown authority code: {0}")]
    UnknownAuthorityCode(String),

    #[error("Invalid callback function name: '{0}'")]
    InvalidCallbackName(String),

    #[error("Invalid value for format option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    #[error("Requested format not supported: {0}")]
    UnsupportedFormat(String),

    // === Feature Errors ===
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Feature {0} has no geometry")]
    MissingGeometry(String),

    #[error("Unsupported value for attribute '{attribute}': {message}")]
    UnsupportedAttributeType { attribute: String, message: String },

    // === Output Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WfsError {
    /// Build an `InvalidOption` error.
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        WfsError::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Get the OGC exception code for this error.
    pub fn exception_code(&self) -> &'static str {
        match self {
            WfsError::UnknownAuthorityCode(_)
            | WfsError::InvalidCallbackName(_)
            | WfsError::InvalidOption { .. } => "InvalidParameterValue",
            WfsError::UnsupportedFormat(_) => "InvalidFormat",
            _ => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WfsError::UnknownAuthorityCode(_)
            | WfsError::InvalidCallbackName(_)
            | WfsError::InvalidOption { .. }
            | WfsError::UnsupportedFormat(_) => 400,

            _ => 500,
        }
    }

    /// True for failures confined to a single feature. The caller may skip
    /// the feature and keep encoding the rest of the collection.
    pub fn is_feature_local(&self) -> bool {
        matches!(
            self,
            WfsError::InvalidGeometry(_)
                | WfsError::MissingGeometry(_)
                | WfsError::UnsupportedAttributeType { .. }
        )
    }
}
