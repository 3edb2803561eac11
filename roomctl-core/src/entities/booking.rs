use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

status_enum!(
    /// Booking lifecycle state
    BookingStatus, "booking", default = Confirmed,
    {
        Confirmed => "confirmed",
        Cancelled => "cancelled",
        InProgress => "in_progress",
        Completed => "completed",
    }
);

/// A reservation made by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub user_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_uses_snake_case() {
        assert_eq!(BookingStatus::InProgress.as_str(), "in_progress");
        let parsed: BookingStatus = serde_json::from_str(r#""in_progress""#).unwrap();
        assert_eq!(parsed, BookingStatus::InProgress);
    }

    #[test]
    fn new_booking_defaults_to_confirmed() {
        let input: NewBooking = serde_json::from_str(
            r#"{
                "user_id": 2,
                "title": "Team Sync",
                "start_time": "2024-01-01T10:00:00Z",
                "end_time": "2024-01-01T11:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(input.status, BookingStatus::Confirmed);
        assert!(input.description.is_none());
    }
}
