//! Use cases - one service per entity
//!
//! Thin wrappers over the repositories adding existence and uniqueness
//! checks. Services hold `Arc<dyn Repository>` so the HTTP layer and tests
//! can swap storage.

mod bookings;
mod employees;
mod equipment;
mod error;
mod rooms;
mod users;

pub use bookings::BookingService;
pub use employees::EmployeeService;
pub use equipment::EquipmentService;
pub use error::UseCaseError;
pub use rooms::RoomService;
pub use users::UserService;

pub type Result<T> = std::result::Result<T, UseCaseError>;
