//! Error types for agentlens-core
//!
//! Every failure mode of a fetch cycle collapses into one of these variants;
//! the coordinator treats them uniformly because all three endpoints are
//! required for a complete snapshot.

use thiserror::Error;

/// Core error type for agentlens operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Fetch Errors
    // ===================
    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid trailing window: {days} days (expected 7, 30 or 90)")]
    InvalidWindow { days: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidWindow { days: 14 };
        assert_eq!(
            err.to_string(),
            "Invalid trailing window: 14 days (expected 7, 30 or 90)"
        );
    }
}
