use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Displayable;

/// A recipient organisation selectable as a donation's destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ngo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Free-form tags such as `children` or `animals`.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub verification: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_founded: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Ngo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            categories: Vec::new(),
            location: None,
            wallet_address: None,
            verification: VerificationStatus::Pending,
            rating: None,
            year_founded: None,
            website: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_category(mut self, tag: impl Into<String>) -> Self {
        self.categories.push(tag.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_wallet(mut self, address: impl Into<String>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }

    pub fn verified(mut self) -> Self {
        self.verification = VerificationStatus::Verified;
        self
    }

    pub fn is_verified(&self) -> bool {
        self.verification == VerificationStatus::Verified
    }

    pub fn has_category(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.categories
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive substring match over name, description, tags and location.
    /// A blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        contains(&self.name)
            || contains(&self.description)
            || self.categories.iter().any(|tag| contains(tag.as_str()))
            || self.location.as_deref().map(contains).unwrap_or(false)
    }
}

impl Displayable for Ngo {
    fn display_label(&self) -> String {
        let badge = if self.is_verified() { " [verified]" } else { "" };
        format!("{}{}", self.name, badge)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum VerificationStatus {
    Verified,
    #[default]
    Pending,
}
