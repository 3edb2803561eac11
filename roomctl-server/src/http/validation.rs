//! Request validation at the HTTP boundary

use std::fmt;

use roomctl_core::{
    BookingPatch, EmployeePatch, EquipmentPatch, NewBooking, NewEmployee, NewEquipment, NewRoom,
    NewUser, RoomPatch, UserPatch,
};

/// Validation error for request bodies and path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// String doesn't match required format
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Number outside its allowed range
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },

    /// Body or query could not be decoded
    Malformed(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::OutOfRange { field, reason } => write!(f, "{} {}", field, reason),
            Self::Malformed(detail) => write!(f, "malformed request: {}", detail),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks applied to a decoded request body before it reaches a use case.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
    non_empty("email", value)?;
    if !value.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "must contain '@'",
        });
    }
    Ok(())
}

fn capacity(value: i32) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::OutOfRange {
            field: "capacity",
            reason: "must be positive",
        });
    }
    Ok(())
}

/// Run `check` on the value when the patch sets it.
fn if_set<T: ?Sized>(
    value: Option<&T>,
    check: impl FnOnce(&T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), check)
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        email(&self.email)?;
        non_empty("password", &self.password)?;
        non_empty("role", &self.role)
    }
}

impl Validate for UserPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if_set(self.email.as_deref(), email)?;
        if_set(self.password.as_deref(), |v| non_empty("password", v))?;
        if_set(self.role.as_deref(), |v| non_empty("role", v))
    }
}

impl Validate for NewEmployee {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        non_empty("last_name", &self.last_name)?;
        email(&self.email)
    }
}

impl Validate for EmployeePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if_set(self.name.as_deref(), |v| non_empty("name", v))?;
        if_set(self.last_name.as_deref(), |v| non_empty("last_name", v))?;
        if_set(self.email.as_deref(), email)
    }
}

impl Validate for NewBooking {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        if self.end_time <= self.start_time {
            return Err(ValidationError::OutOfRange {
                field: "end_time",
                reason: "must be after start_time",
            });
        }
        Ok(())
    }
}

impl Validate for BookingPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if_set(self.title.as_deref(), |v| non_empty("title", v))?;
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err(ValidationError::OutOfRange {
                    field: "end_time",
                    reason: "must be after start_time",
                });
            }
        }
        Ok(())
    }
}

impl Validate for NewEquipment {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        non_empty("type", &self.equipment_type)
    }
}

impl Validate for EquipmentPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if_set(self.name.as_deref(), |v| non_empty("name", v))?;
        if_set(self.equipment_type.as_deref(), |v| non_empty("type", v))
    }
}

impl Validate for NewRoom {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        capacity(self.capacity)
    }
}

impl Validate for RoomPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if_set(self.name.as_deref(), |v| non_empty("name", v))?;
        if_set(self.capacity.as_ref(), |v| capacity(*v))
    }
}
