//! Domain entities.
//!
//! Plain records owned by the database. Each entity has a `New*` input for
//! creation and a `*Patch` input where every field is optional; unset patch
//! fields keep their stored value.

/// Declares a text-backed status enum with its wire/column representation.
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Column / wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::error::CoreError::invalid_status($kind, other)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod booking;
pub mod employee;
pub mod equipment;
pub mod room;
pub mod user;

pub use booking::{Booking, BookingPatch, BookingStatus, NewBooking};
pub use employee::{Employee, EmployeePatch, NewEmployee};
pub use equipment::{Equipment, EquipmentPatch, EquipmentStatus, NewEquipment};
pub use room::{NewRoom, Room, RoomPatch, RoomStatus};
pub use user::{NewUser, User, UserPatch, UserStatus};
