//! Application context.
//!
//! [`AppContext`] owns the three stores. It is built once at startup and handed to consumers
//! by reference; there is no global instance, so code that needs a store must be given the
//! context (or the store) explicitly.

use crate::config::CoreConfig;
use crate::constants::{APPOINTMENTS_KEY, ARTICLES_KEY, USER_PROFILE_KEY};
use crate::storage::{Fallback, FileStorage, LocalStorage, MemoryStorage};
use crate::stores::{AppointmentStore, ArticleStore, UserProfileStore};
use crate::StoreResult;
use careportal_types::StorageKey;
use std::sync::Arc;

#[derive(Debug)]
pub struct AppContext {
    storage: Arc<dyn LocalStorage>,
    pub articles: ArticleStore,
    pub appointments: AppointmentStore,
    pub profile: UserProfileStore,
}

impl AppContext {
    /// Hydrates every store from `storage`, writing fallback data back.
    pub fn hydrate(storage: Arc<dyn LocalStorage>, seed_sample_data: bool) -> StoreResult<Self> {
        Self::hydrate_with(storage, seed_sample_data, Fallback::WriteBack)
    }

    pub fn hydrate_with(
        storage: Arc<dyn LocalStorage>,
        seed_sample_data: bool,
        fallback: Fallback,
    ) -> StoreResult<Self> {
        let articles = ArticleStore::hydrate_with(storage.clone(), seed_sample_data, fallback)?;
        let appointments =
            AppointmentStore::hydrate_with(storage.clone(), seed_sample_data, fallback)?;
        let profile = UserProfileStore::hydrate(storage.clone())?;

        Ok(Self {
            storage,
            articles,
            appointments,
            profile,
        })
    }

    /// Hydrates from file storage under the configured data directory.
    pub fn open(cfg: &CoreConfig) -> StoreResult<Self> {
        Self::open_with(cfg, Fallback::WriteBack)
    }

    /// Like [`open`](Self::open). With [`Fallback::InMemory`] a fresh data directory stays
    /// empty until something is mutated, which suits read-only commands.
    pub fn open_with(cfg: &CoreConfig, fallback: Fallback) -> StoreResult<Self> {
        let storage = FileStorage::open(cfg.data_dir())?;
        tracing::info!("using data directory {}", storage.dir().display());
        Self::hydrate_with(Arc::new(storage), cfg.seed_sample_data(), fallback)
    }

    /// Hydrates from a fresh in-memory storage. Nothing outlives the context.
    pub fn ephemeral(seed_sample_data: bool) -> StoreResult<Self> {
        Self::hydrate(Arc::new(MemoryStorage::new()), seed_sample_data)
    }

    pub fn storage(&self) -> &Arc<dyn LocalStorage> {
        &self.storage
    }

    /// Removes every store's persisted document.
    ///
    /// The in-memory stores are left untouched; the next hydration starts from scratch.
    pub fn reset_storage(storage: &dyn LocalStorage) -> StoreResult<()> {
        for name in [ARTICLES_KEY, APPOINTMENTS_KEY, USER_PROFILE_KEY] {
            storage.remove_item(&StorageKey::new(name)?)?;
        }
        tracing::info!("cleared persisted stores");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{sample_appointments, sample_articles};
    use tempfile::TempDir;

    #[test]
    fn test_ephemeral_context_is_seeded() {
        let ctx = AppContext::ephemeral(true).unwrap();

        assert_eq!(ctx.articles.len(), sample_articles().len());
        assert_eq!(ctx.appointments.len(), sample_appointments().len());
        assert!(ctx.profile.is_first_login());
    }

    #[test]
    fn test_open_writes_store_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::with_data_dir(temp_dir.path().join("data")).unwrap();

        let _ctx = AppContext::open(&cfg).expect("open should succeed");

        assert!(temp_dir.path().join("data/articles.json").is_file());
        assert!(temp_dir.path().join("data/appointments.json").is_file());
        assert!(
            !temp_dir.path().join("data/userProfile.json").exists(),
            "profile is only written once it changes"
        );
    }

    #[test]
    fn test_open_in_memory_fallback_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::with_data_dir(temp_dir.path().join("data")).unwrap();

        let ctx = AppContext::open_with(&cfg, Fallback::InMemory).expect("open should succeed");

        assert_eq!(ctx.articles.len(), sample_articles().len());
        assert_eq!(ctx.appointments.len(), sample_appointments().len());
        assert!(ctx.storage().keys().unwrap().is_empty());
        assert!(!temp_dir.path().join("data/articles.json").exists());
    }

    #[test]
    fn test_reset_storage_removes_everything() {
        let mut ctx = AppContext::ephemeral(true).unwrap();
        ctx.profile.complete_onboarding().unwrap();
        let storage = ctx.storage().clone();

        AppContext::reset_storage(storage.as_ref()).unwrap();

        assert!(storage.keys().unwrap().is_empty());
        let fresh = AppContext::hydrate(storage, false).unwrap();
        assert!(fresh.articles.is_empty());
        assert!(fresh.profile.is_first_login());
    }
}
