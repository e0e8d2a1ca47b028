//! In-memory profile repository. Each trait call is atomic under one
//! lock, so readers never observe a half-applied derived update; two
//! overlapping pipeline runs for the same natural key remain
//! last-writer-wins.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use kindred_common::types::{Gender, Profile, ProcessingStatus};

use crate::traits::{DerivedUpdate, ProfileStore};

#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn get_by_handle(&self, handle: &str) -> Result<Option<Profile>> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|p| p.twitter_handle.as_deref() == Some(handle))
            .cloned())
    }

    async fn upsert(&self, mut profile: Profile) -> Result<Profile> {
        profile.updated_at = Utc::now();
        self.profiles
            .write()
            .await
            .insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        error_message: Option<String>,
    ) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("Profile {id} not found"))?;
        profile.processing_status = status;
        profile.error_message = error_message;
        profile.updated_at = Utc::now();
        Ok(())
    }

    async fn update_derived(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        update: DerivedUpdate,
    ) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("Profile {id} not found"))?;
        profile.processing_status = status;
        profile.twitter_data = update.twitter_data;
        profile.linkedin_data = update.linkedin_data;
        profile.website_data = update.website_data;
        profile.other_links_data = update.other_links_data;
        profile.stringified_data = update.stringified_data;
        profile.embedding = update.embedding;
        profile.error_message = update.error_message;
        profile.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_by_handle(&self, handle: &str) -> Result<bool> {
        let mut profiles = self.profiles.write().await;
        let id = profiles
            .values()
            .find(|p| p.twitter_handle.as_deref() == Some(handle))
            .map(|p| p.id);
        Ok(match id {
            Some(id) => profiles.remove(&id).is_some(),
            None => false,
        })
    }

    async fn completed_with_embedding(&self, gender: Gender) -> Result<Vec<Profile>> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .filter(|p| p.gender == gender && p.is_matchable())
            .cloned()
            .collect())
    }
}
