use crate::error::model_error::ModelError;
use crate::{ErrorLocation, Location};

use std::panic::Location as PanicLocation;

/// Builder for validated [`Location`] values.
///
/// The search UI hands over free-form strings; the builder trims them and
/// refuses to produce a location without both a name and an address.
#[derive(Debug, Default)]
pub struct LocationBuilder {
    name: Option<String>,
    address: Option<String>,
}

impl LocationBuilder {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[track_caller]
    pub fn build(self) -> Result<Location, ModelError> {
        let name = required(self.name, "Restaurant name")?;
        let address = required(self.address, "Address")?;

        Ok(Location { name, address })
    }
}

#[track_caller]
fn required(value: Option<String>, field: &str) -> Result<String, ModelError> {
    let value = value.ok_or_else(|| ModelError::Validation {
        message: format!("{field} is required"),
        location: ErrorLocation::from(PanicLocation::caller()),
    })?;

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation {
            message: format!("{field} cannot be empty"),
            location: ErrorLocation::from(PanicLocation::caller()),
        });
    }

    Ok(trimmed.to_string())
}
