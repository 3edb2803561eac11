use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

status_enum!(
    /// Whether a room can currently be booked
    RoomStatus, "room", default = Available,
    {
        Available => "available",
        Maintenance => "maintenance",
        OutOfService => "out_of_service",
    }
);

/// A bookable conference room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub capacity: i32,
    pub description: Option<String>,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub capacity: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: RoomStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPatch {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub description: Option<String>,
    pub status: Option<RoomStatus>,
}
