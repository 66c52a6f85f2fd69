//! Internal error types for McM operations.
//!
//! These errors are internal to `fragcheck-mcm` and are mapped to core port
//! errors at the boundary.

use thiserror::Error;

/// Result type alias for McM operations.
pub type McmResult<T> = Result<T, McmError>;

#[derive(Debug, Error)]
pub enum McmError {
    /// API request failed with an HTTP error status.
    #[error("McM request failed with status {status}: {url}")]
    ApiRequestFailed { status: u16, url: String },

    /// The service answered but `results` was missing or empty.
    #[error("{kind} '{id}' not found in McM")]
    EmptyResults { kind: &'static str, id: String },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from McM: {message}")]
    InvalidResponse { message: String },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_failed_error_message() {
        let error = McmError::ApiRequestFailed {
            status: 502,
            url: "https://cms-pdmv.cern.ch/mcm/public/restapi/requests/get/X".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("cms-pdmv.cern.ch"));
    }

    #[test]
    fn test_empty_results_error_message() {
        let error = McmError::EmptyResults {
            kind: "ticket",
            id: "HIG-2018Oct01-00001".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "ticket 'HIG-2018Oct01-00001' not found in McM"
        );
    }
}
