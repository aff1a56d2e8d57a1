use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Displayable;

/// Signed-in account as exposed by the auth collaborator. Never carries credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub metadata: UserMetadata,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, metadata: UserMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
}

impl Displayable for User {
    fn display_label(&self) -> String {
        if self.metadata.name.is_empty() {
            self.email.clone()
        } else {
            format!("{} <{}>", self.metadata.name, self.email)
        }
    }
}
