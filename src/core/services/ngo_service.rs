use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Ngo;
use crate::errors::DonationError;
use crate::storage::{seed, NgoDirectory};

use super::ServiceResult;

/// Directory filters applied on top of the free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgoQuery {
    pub text: String,
    pub verified_only: bool,
    pub category: Option<String>,
}

impl NgoQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn matches(&self, ngo: &Ngo) -> bool {
        ngo.matches_query(&self.text)
            && (!self.verified_only || ngo.is_verified())
            && self
                .category
                .as_deref()
                .map(|tag| ngo.has_category(tag))
                .unwrap_or(true)
    }
}

pub struct NgoService {
    directory: Arc<dyn NgoDirectory>,
}

impl NgoService {
    pub fn new(directory: Arc<dyn NgoDirectory>) -> Self {
        Self { directory }
    }

    /// Every NGO ordered by name. An empty directory is seeded with the sample list first.
    pub async fn list(&self) -> ServiceResult<Vec<Ngo>> {
        let ngos = self.directory.list_ngos().await?;
        if !ngos.is_empty() {
            return Ok(ngos);
        }
        tracing::info!("ngo directory empty; inserting sample organisations");
        for ngo in seed::sample_ngos() {
            self.directory.upsert_ngo(ngo).await?;
        }
        Ok(self.directory.list_ngos().await?)
    }

    pub async fn search(&self, query: &NgoQuery) -> ServiceResult<Vec<Ngo>> {
        let ngos = self.list().await?;
        Ok(ngos.into_iter().filter(|ngo| query.matches(ngo)).collect())
    }

    /// Resolves a full id, an id prefix of at least four characters, or a name.
    pub async fn find(&self, reference: &str) -> ServiceResult<Ngo> {
        let reference = reference.trim();
        let ngos = self.list().await?;
        if let Ok(id) = Uuid::parse_str(reference) {
            if let Some(ngo) = ngos.iter().find(|ngo| ngo.id == id) {
                return Ok(ngo.clone());
            }
        }
        if let Some(ngo) = ngos
            .iter()
            .find(|ngo| ngo.name.eq_ignore_ascii_case(reference))
        {
            return Ok(ngo.clone());
        }
        if reference.len() >= 4 {
            let prefix = reference.to_ascii_lowercase();
            let mut matches = ngos
                .iter()
                .filter(|ngo| ngo.id.to_string().starts_with(&prefix));
            if let (Some(ngo), None) = (matches.next(), matches.next()) {
                return Ok(ngo.clone());
            }
        }
        Err(DonationError::NotFound(format!("NGO `{}` not found", reference)))
    }
}
