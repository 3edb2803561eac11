use std::sync::Arc;

use chrono::{DateTime, Utc};

use roomctl_core::{Booking, BookingPatch, NewBooking};

use super::error::RepoResultExt;
use super::{Result, UseCaseError};
use crate::db::BookingRepository;

const RESOURCE: &str = "booking";

/// Booking operations
///
/// Overlapping bookings are not detected.
#[derive(Clone)]
pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, booking: NewBooking) -> Result<Booking> {
        ensure_time_order(&booking.start_time, &booking.end_time)?;
        let created = self
            .repo
            .create(booking)
            .await
            .during(RESOURCE, "create booking")?;
        tracing::info!(booking_id = created.id, user_id = created.user_id, "booking created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Booking> {
        self.repo
            .find_by_id(id)
            .await
            .during(RESOURCE, "find booking")?
            .ok_or_else(|| UseCaseError::not_found(RESOURCE, id))
    }

    /// A user's bookings; empty when there are none.
    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Booking>> {
        self.repo
            .find_by_user_id(user_id)
            .await
            .during(RESOURCE, "find bookings")
    }

    pub async fn find_all(&self) -> Result<Vec<Booking>> {
        self.repo.find_all().await.during(RESOURCE, "list bookings")
    }

    /// Partial update; the resulting time range must still end after it
    /// starts.
    pub async fn update(&self, id: i32, patch: BookingPatch) -> Result<Booking> {
        let current = self.find_by_id(id).await?;
        ensure_time_order(
            patch.start_time.as_ref().unwrap_or(&current.start_time),
            patch.end_time.as_ref().unwrap_or(&current.end_time),
        )?;
        self.repo
            .update(id, patch)
            .await
            .during(RESOURCE, "update booking")
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.find_by_id(id).await?;
        self.repo
            .delete(id)
            .await
            .during(RESOURCE, "delete booking")
    }
}

fn ensure_time_order(start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<()> {
    if end <= start {
        return Err(UseCaseError::Invalid(
            "end_time must be after start_time".to_string(),
        ));
    }
    Ok(())
}
