use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// API-facing system. `system_id` is `None` until the store assigns one.
///
/// Missing fields deserialize to their defaults so that validation, not decoding,
/// decides whether a payload is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(default)]
    pub system_id: Option<i32>,
    #[serde(default)]
    pub name: String,
}

impl System {
    pub fn new(name: impl Into<String>) -> Self {
        Self { system_id: None, name: name.into() }
    }

    /// Field constraints shared by create and update.
    pub fn validate(&self) -> Result<(), ServiceError> {
        models::system::validate_name(&self.name)?;
        Ok(())
    }
}
