//! Active patient profile and onboarding state.
//!
//! Exactly one profile is active per persisted session. When nothing is stored under the
//! `userProfile` key the store hands out [`UserProfile::default`] and reports a first login.

use crate::constants::USER_PROFILE_KEY;
use crate::models::{UserProfile, UserProfilePatch};
use crate::storage::{load_json, persist_json, LocalStorage};
use crate::StoreResult;
use careportal_types::StorageKey;
use std::sync::Arc;

#[derive(Debug)]
pub struct UserProfileStore {
    storage: Arc<dyn LocalStorage>,
    key: StorageKey,
    profile: UserProfile,
    first_login: bool,
}

impl UserProfileStore {
    /// Loads the persisted profile, or the default empty profile if none is usable.
    ///
    /// The first-login flag is decided here, once: it is true when no profile was persisted
    /// or the persisted one had not completed onboarding. Nothing is written back.
    pub fn hydrate(storage: Arc<dyn LocalStorage>) -> StoreResult<Self> {
        let key = StorageKey::new(USER_PROFILE_KEY)?;

        let profile = load_json::<UserProfile>(storage.as_ref(), &key)
            .loaded()
            .unwrap_or_default();
        let first_login = !profile.has_completed_onboarding;

        tracing::info!(
            "hydrated user profile (first login: {})",
            if first_login { "yes" } else { "no" }
        );

        Ok(Self {
            storage,
            key,
            profile,
            first_login,
        })
    }

    pub fn get(&self) -> &UserProfile {
        &self.profile
    }

    /// Whether this session started without a completed profile.
    ///
    /// Fixed at hydration; only [`complete_onboarding`](Self::complete_onboarding) clears it.
    pub fn is_first_login(&self) -> bool {
        self.first_login
    }

    /// Merges `patch` into the profile and persists it.
    pub fn update(&mut self, patch: UserProfilePatch) -> StoreResult<&UserProfile> {
        patch.apply(&mut self.profile);
        tracing::debug!("updated user profile {}", self.profile.id);
        self.persist()?;
        Ok(&self.profile)
    }

    /// Marks onboarding complete and clears the first-login flag.
    pub fn complete_onboarding(&mut self) -> StoreResult<&UserProfile> {
        self.profile.has_completed_onboarding = true;
        self.first_login = false;
        self.persist()?;
        Ok(&self.profile)
    }

    /// Forgets the persisted profile (logout) and resets to the default shape.
    ///
    /// The first-login flag for the running session is left as it is.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.profile = UserProfile::default();
        self.storage.remove_item(&self.key)
    }

    fn persist(&self) -> StoreResult<()> {
        persist_json(self.storage.as_ref(), &self.key, &self.profile)
    }
}
