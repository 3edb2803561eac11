use std::sync::Arc;

use uuid::Uuid;

use roomctl_core::{Equipment, EquipmentPatch, EquipmentStatus, NewEquipment};

use super::error::RepoResultExt;
use super::{Result, UseCaseError};
use crate::db::EquipmentRepository;

const RESOURCE: &str = "equipment";

/// Equipment operations
#[derive(Clone)]
pub struct EquipmentService {
    repo: Arc<dyn EquipmentRepository>,
}

impl EquipmentService {
    pub fn new(repo: Arc<dyn EquipmentRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, equipment: NewEquipment) -> Result<Equipment> {
        let created = self
            .repo
            .create(equipment)
            .await
            .during(RESOURCE, "create equipment")?;
        tracing::info!(equipment_id = %created.id, "equipment created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Equipment> {
        self.repo
            .find_by_id(id)
            .await
            .during(RESOURCE, "find equipment")?
            .ok_or_else(|| UseCaseError::not_found(RESOURCE, id))
    }

    pub async fn find_all(&self) -> Result<Vec<Equipment>> {
        self.repo.find_all().await.during(RESOURCE, "list equipment")
    }

    pub async fn find_by_status(&self, status: EquipmentStatus) -> Result<Vec<Equipment>> {
        self.repo
            .find_by_status(status)
            .await
            .during(RESOURCE, "list equipment")
    }

    pub async fn update(&self, id: Uuid, patch: EquipmentPatch) -> Result<Equipment> {
        self.find_by_id(id).await?;
        self.repo
            .update(id, patch)
            .await
            .during(RESOURCE, "update equipment")
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.find_by_id(id).await?;
        self.repo
            .delete(id)
            .await
            .during(RESOURCE, "delete equipment")
    }
}
