use std::sync::Arc;

use roomctl_core::{NewRoom, Room, RoomPatch};

use super::error::RepoResultExt;
use super::{Result, UseCaseError};
use crate::db::RoomRepository;

const RESOURCE: &str = "room";

/// Room operations
#[derive(Clone)]
pub struct RoomService {
    repo: Arc<dyn RoomRepository>,
}

impl RoomService {
    pub fn new(repo: Arc<dyn RoomRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, room: NewRoom) -> Result<Room> {
        let created = self.repo.create(room).await.during(RESOURCE, "create room")?;
        tracing::info!(room_id = created.id, "room created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Room> {
        self.repo
            .find_by_id(id)
            .await
            .during(RESOURCE, "find room")?
            .ok_or_else(|| UseCaseError::not_found(RESOURCE, id))
    }

    pub async fn find_all(&self) -> Result<Vec<Room>> {
        self.repo.find_all().await.during(RESOURCE, "list rooms")
    }

    pub async fn update(&self, id: i32, patch: RoomPatch) -> Result<Room> {
        self.find_by_id(id).await?;
        self.repo.update(id, patch).await.during(RESOURCE, "update room")
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.find_by_id(id).await?;
        self.repo.delete(id).await.during(RESOURCE, "delete room")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory::MemoryStore;
    use roomctl_core::RoomStatus;

    #[tokio::test]
    async fn create_then_take_out_of_service() {
        let rooms = RoomService::new(Arc::new(MemoryStore::<Room>::new()));
        let room = rooms
            .create(NewRoom {
                name: "Board Room".into(),
                capacity: 12,
                description: None,
                status: RoomStatus::Available,
            })
            .await
            .unwrap();

        let updated = rooms
            .update(
                room.id,
                RoomPatch {
                    status: Some(RoomStatus::OutOfService),
                    ..RoomPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, RoomStatus::OutOfService);
        assert_eq!(updated.capacity, 12);

        rooms.delete(room.id).await.unwrap();
        assert!(rooms.find_all().await.unwrap().is_empty());
    }
}
