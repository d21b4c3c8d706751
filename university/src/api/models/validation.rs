//! Input shape checks applied to request bodies and path parameters before they reach
//! the services. Failures become `400 Bad Request` with the given message.

use crate::errors::{Error, Result};

pub fn positive_id(id: i32) -> Result<()> {
    positive(id, "Id should be positive")
}

pub fn positive(value: i32, message: &str) -> Result<()> {
    if value > 0 { Ok(()) } else { Err(Error::bad_request(message)) }
}

pub fn not_blank(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::bad_request(message))
    } else {
        Ok(())
    }
}

/// Apply `check` to an optional field only when it is present
pub fn when_present<T>(value: Option<&T>, check: impl FnOnce(&T) -> Result<()>) -> Result<()>
where
    T: ?Sized,
{
    value.map_or(Ok(()), check)
}
