//! Directory-backed style store
//!
//! Each profile lives in `<dir>/<id>.json` as pretty-printed JSON. The
//! directory is created on first write.

use crate::{style_store::sort_oldest_first, Result, StoreError, StyleStore};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use style_model::StyleProfile;
use uuid::Uuid;

const PROFILE_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct JsonStyleStore {
    dir: PathBuf,
}

impl JsonStyleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}.{}", id, PROFILE_EXTENSION))
    }

    fn read_profile(path: &Path) -> Result<StyleProfile> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_profile(&self, profile: &StyleProfile) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(profile)?;
        std::fs::write(self.path_for(&profile.id), json)?;
        Ok(())
    }
}

/// Map a missing file to `NotFound` for `id`
fn not_found_as(id: &Uuid, e: StoreError) -> StoreError {
    match e {
        StoreError::Io(io) if io.kind() == ErrorKind::NotFound => StoreError::NotFound(*id),
        other => other,
    }
}

impl StyleStore for JsonStyleStore {
    fn create(&self, profile: StyleProfile) -> Result<StyleProfile> {
        if self.path_for(&profile.id).exists() {
            return Err(StoreError::AlreadyExists(profile.id));
        }
        self.write_profile(&profile)?;
        tracing::debug!("Created style profile {} ({})", profile.id, profile.name);
        Ok(profile)
    }

    fn get(&self, id: &Uuid) -> Result<StyleProfile> {
        Self::read_profile(&self.path_for(id)).map_err(|e| not_found_as(id, e))
    }

    /// Unreadable or malformed files are skipped with a warning
    fn list(&self) -> Result<Vec<StyleProfile>> {
        let mut profiles = Vec::new();
        if !self.dir.exists() {
            return Ok(profiles);
        }

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != PROFILE_EXTENSION) {
                continue;
            }
            match Self::read_profile(&path) {
                Ok(profile) => profiles.push(profile),
                Err(e) => tracing::warn!("Skipping style profile {}: {}", path.display(), e),
            }
        }

        sort_oldest_first(&mut profiles);
        Ok(profiles)
    }

    fn update(&self, mut profile: StyleProfile) -> Result<StyleProfile> {
        let existing = self.get(&profile.id)?;
        profile.created_at = existing.created_at;
        profile.updated_at = Utc::now();
        self.write_profile(&profile)?;
        Ok(profile)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        std::fs::remove_file(self.path_for(id)).map_err(|e| not_found_as(id, e.into()))?;
        tracing::debug!("Deleted style profile {}", id);
        Ok(())
    }
}
