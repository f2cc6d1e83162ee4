//! In-memory style store

use crate::{style_store::sort_oldest_first, Result, StoreError, StyleStore};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use style_model::StyleProfile;
use uuid::Uuid;

/// Profiles held in a map for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryStyleStore {
    profiles: RwLock<HashMap<Uuid, StyleProfile>>,
}

impl MemoryStyleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StyleStore for MemoryStyleStore {
    fn create(&self, profile: StyleProfile) -> Result<StyleProfile> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        if profiles.contains_key(&profile.id) {
            return Err(StoreError::AlreadyExists(profile.id));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn get(&self, id: &Uuid) -> Result<StyleProfile> {
        self.profiles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    fn list(&self) -> Result<Vec<StyleProfile>> {
        let mut profiles: Vec<StyleProfile> = self
            .profiles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        sort_oldest_first(&mut profiles);
        Ok(profiles)
    }

    fn update(&self, mut profile: StyleProfile) -> Result<StyleProfile> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        let Some(existing) = profiles.get_mut(&profile.id) else {
            return Err(StoreError::NotFound(profile.id));
        };
        profile.created_at = existing.created_at;
        profile.updated_at = Utc::now();
        *existing = profile.clone();
        Ok(profile)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        self.profiles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(*id))
    }
}
