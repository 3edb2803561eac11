/// Structured error types for roomctl-core.
///
/// Library crates return these; the `roomctl` binary wraps them with `anyhow`
/// context at the command boundary.
use thiserror::Error;

/// Main error type for roomctl-core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A status column or request field held a value outside its enum
    #[error("invalid {kind} status '{value}'")]
    InvalidStatus { kind: &'static str, value: String },

    /// Environment variable present but unusable
    #[error("invalid value for {var}: '{value}' ({reason})")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Unknown runtime environment name
    #[error("unknown environment '{0}' (expected development, production or test)")]
    UnknownEnvironment(String),
}

/// Result type alias for roomctl-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an invalid status error
    pub fn invalid_status(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidStatus {
            kind,
            value: value.into(),
        }
    }

    /// Create an invalid environment variable error
    pub fn invalid_env(var: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidEnv {
            var,
            value: value.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_status("booking", "tentative");
        assert_eq!(err.to_string(), "invalid booking status 'tentative'");

        let err = CoreError::invalid_env("DB_PORT", "abc", "expected a port number");
        assert!(err.to_string().contains("DB_PORT"));
        assert!(err.to_string().contains("abc"));
    }
}
