//! Route handlers organized by resource

pub mod bookings;
pub mod employees;
pub mod equipment;
pub mod health;
pub mod rooms;
pub mod users;
