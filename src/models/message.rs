use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A stored message as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Raw body of a save request; nothing is required at this layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageInput {
    pub name: Option<String>,
    pub message: Option<String>,
}

/// A message that passed schema validation and can be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub name: String,
    pub message: String,
}

impl MessageInput {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
        }
    }

    /// Both `name` and `message` are required paths
    pub fn validate(self) -> Result<NewMessage, StoreError> {
        let missing: Vec<&str> = [("name", &self.name), ("message", &self.message)]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(path, _)| path)
            .collect();

        match (self.name, self.message) {
            (Some(name), Some(message)) => Ok(NewMessage { name, message }),
            _ => Err(StoreError::Validation(format!(
                "path `{}` is required",
                missing.join("`, `")
            ))),
        }
    }
}
