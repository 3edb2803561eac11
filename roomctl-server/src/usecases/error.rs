//! Use-case error type

use crate::db::DbError;

/// Failure of an application-level operation
#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Input rejected by a rule that needs stored state to check
    #[error("{0}")]
    Invalid(String),

    #[error("{message}")]
    Conflict {
        resource: &'static str,
        message: String,
    },

    /// Storage failed; the underlying error is kept as the source
    #[error("failed to {action}")]
    Repository {
        action: &'static str,
        #[source]
        source: DbError,
    },
}

impl UseCaseError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn conflict(resource: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            resource,
            message: message.into(),
        }
    }
}

/// Attach the failing action to repository errors.
pub(crate) trait RepoResultExt<T> {
    fn during(self, resource: &'static str, action: &'static str) -> Result<T, UseCaseError>;
}

impl<T> RepoResultExt<T> for Result<T, DbError> {
    fn during(self, resource: &'static str, action: &'static str) -> Result<T, UseCaseError> {
        self.map_err(|e| match e {
            DbError::NotFound { resource, id } => UseCaseError::NotFound { resource, id },
            e if e.is_unique_violation() => {
                UseCaseError::conflict(resource, format!("{} already exists", resource))
            }
            e if e.is_foreign_key_violation() => {
                UseCaseError::conflict(resource, format!("{} references a missing row", resource))
            }
            source => UseCaseError::Repository { action, source },
        })
    }
}
