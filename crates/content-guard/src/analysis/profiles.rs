use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::domain::{ChildProfile, ProfileId};
use super::repository::{ProfileFields, ProfileStore, ProfileStoreError};

/// Profile store persisting the whole list as one JSON array after every mutation.
#[derive(Debug)]
pub struct JsonFileProfileStore {
    path: PathBuf,
    profiles: Mutex<Vec<ChildProfile>>,
}

impl JsonFileProfileStore {
    /// Open the store, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ProfileStoreError> {
        let path = path.into();
        let profiles = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Vec::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|err| {
                ProfileStoreError::Unavailable(format!(
                    "failed to parse {}: {err}",
                    path.display()
                ))
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(ProfileStoreError::Unavailable(format!(
                    "failed to read {}: {err}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), count = profiles.len(), "loaded child profiles");
        Ok(Self {
            path,
            profiles: Mutex::new(profiles),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, profiles: &[ChildProfile]) -> Result<(), ProfileStoreError> {
        let payload = serde_json::to_vec_pretty(profiles)
            .map_err(|err| ProfileStoreError::Unavailable(err.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| unavailable(&self.path, err))?;
        }

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(|err| unavailable(&staging, err))?;
        fs::rename(&staging, &self.path).map_err(|err| unavailable(&self.path, err))
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> ProfileStoreError {
    ProfileStoreError::Unavailable(format!("failed to write {}: {err}", path.display()))
}

impl ProfileStore for JsonFileProfileStore {
    fn list(&self) -> Result<Vec<ChildProfile>, ProfileStoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.clone())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ChildProfile>, ProfileStoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.iter().find(|profile| &profile.id == id).cloned())
    }

    fn create(&self, fields: ProfileFields) -> Result<ChildProfile, ProfileStoreError> {
        let profile = fields.into_profile()?;
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        let mut next = guard.clone();
        next.push(profile.clone());
        self.persist(&next)?;
        *guard = next;
        Ok(profile)
    }

    fn update(&self, id: &ProfileId, fields: ProfileFields) -> Result<(), ProfileStoreError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        let mut next = guard.clone();
        let profile = next
            .iter_mut()
            .find(|profile| &profile.id == id)
            .ok_or(ProfileStoreError::NotFound)?;
        fields.apply_to(profile)?;
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn delete(&self, id: &ProfileId) -> Result<(), ProfileStoreError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        if !guard.iter().any(|profile| &profile.id == id) {
            return Err(ProfileStoreError::NotFound);
        }
        let next: Vec<ChildProfile> = guard
            .iter()
            .filter(|profile| &profile.id != id)
            .cloned()
            .collect();
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }
}
