//! Database error type shared by repositories

use std::str::FromStr;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("unexpected value '{value}' in column {column}")]
    Decode { column: &'static str, value: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// A unique constraint rejected the write.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }

    /// A foreign key pointed at a missing row.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(e)) => e.is_foreign_key_violation(),
            _ => false,
        }
    }
}

/// Parse a text status column into its enum.
pub(crate) fn decode_status<T: FromStr>(value: String) -> Result<T, DbError> {
    value.parse().map_err(|_| DbError::Decode {
        column: "status",
        value,
    })
}
