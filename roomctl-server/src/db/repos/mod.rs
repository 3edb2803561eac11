//! Repository layer - one trait and one PostgreSQL implementation per entity
//!
//! Traits are object-safe (`async_trait`) so use cases can hold
//! `Arc<dyn ...Repository>` and tests can substitute in-memory stores.

pub mod bookings;
pub mod employees;
pub mod equipment;
pub mod rooms;
pub mod users;

pub use bookings::{BookingRepository, PgBookingRepo};
pub use employees::{EmployeeRepository, PgEmployeeRepo};
pub use equipment::{EquipmentRepository, PgEquipmentRepo};
pub use rooms::{PgRoomRepo, RoomRepository};
pub use users::{PgUserRepo, UserRepository};
