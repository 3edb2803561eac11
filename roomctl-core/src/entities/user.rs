use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROLE: &str = "user";

status_enum!(
    /// Account lifecycle state
    UserStatus, "user", default = Active,
    {
        Active => "active",
        Inactive => "inactive",
        Pending => "pending",
        Blocked => "blocked",
        Deleted => "deleted",
    }
);

/// Application user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Stored credential; never serialized back out.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub status: UserStatus,
}

/// Partial update for a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<UserStatus>,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}
