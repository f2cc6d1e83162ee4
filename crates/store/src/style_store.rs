//! Style store interface

use crate::Result;
use style_model::StyleProfile;
use uuid::Uuid;

/// CRUD access to style profiles by id
pub trait StyleStore: Send + Sync {
    /// Insert a new profile; fails if its id is already stored
    fn create(&self, profile: StyleProfile) -> Result<StyleProfile>;

    fn get(&self, id: &Uuid) -> Result<StyleProfile>;

    /// All profiles, oldest first
    fn list(&self) -> Result<Vec<StyleProfile>>;

    /// Replace a stored profile, stamping its update time
    fn update(&self, profile: StyleProfile) -> Result<StyleProfile>;

    fn delete(&self, id: &Uuid) -> Result<()>;
}

pub(crate) fn sort_oldest_first(profiles: &mut [StyleProfile]) {
    profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
}
