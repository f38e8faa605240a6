use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{ChildProfile, ProfileId, Sensitivities};

/// Oldest age a profile may carry; the scoring bands stop well before it.
pub const MAX_PROFILE_AGE: u8 = 18;

/// Storage abstraction for child profiles so callers receive it by injection.
pub trait ProfileStore: Send + Sync {
    fn list(&self) -> Result<Vec<ChildProfile>, ProfileStoreError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<ChildProfile>, ProfileStoreError>;
    fn create(&self, fields: ProfileFields) -> Result<ChildProfile, ProfileStoreError>;
    fn update(&self, id: &ProfileId, fields: ProfileFields) -> Result<(), ProfileStoreError>;
    fn delete(&self, id: &ProfileId) -> Result<(), ProfileStoreError>;
}

/// Caller supplied profile fields for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub sensitivities: Sensitivities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProfileFields {
    pub fn validate(&self) -> Result<(), ProfileStoreError> {
        if self.name.trim().is_empty() {
            return Err(ProfileStoreError::InvalidProfile(
                "name must not be empty".to_string(),
            ));
        }
        if self.age > MAX_PROFILE_AGE {
            return Err(ProfileStoreError::InvalidProfile(format!(
                "age {} exceeds maximum {MAX_PROFILE_AGE}",
                self.age
            )));
        }
        Ok(())
    }

    /// Build a new stored profile with a fresh identifier and creation stamp.
    pub fn into_profile(self) -> Result<ChildProfile, ProfileStoreError> {
        self.validate()?;
        Ok(ChildProfile {
            id: next_profile_id(),
            name: self.name.trim().to_string(),
            age: self.age,
            sensitivities: self.sensitivities,
            notes: normalize_notes(self.notes),
            created_at: Some(Utc::now()),
        })
    }

    /// Overwrite the mutable fields of an existing profile, keeping id and creation stamp.
    pub fn apply_to(self, profile: &mut ChildProfile) -> Result<(), ProfileStoreError> {
        self.validate()?;
        profile.name = self.name.trim().to_string();
        profile.age = self.age;
        profile.sensitivities = self.sensitivities;
        profile.notes = normalize_notes(self.notes);
        Ok(())
    }
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}

static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_profile_id() -> ProfileId {
    let sequence = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfileId(format!("{}-{sequence}", Utc::now().timestamp_millis()))
}

/// Error enumeration for profile store failures.
#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("profile not found")]
    NotFound,
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}
