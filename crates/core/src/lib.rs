//! # CarePortal Core
//!
//! Data layer for the CarePortal patient/doctor/admin application.
//!
//! This crate contains the stores and their persistence:
//! - Articles, appointments and the active user profile, each hydrated once from local storage
//!   (or built-in sample data) and written back in full after every mutation
//! - A [`LocalStorage`] abstraction with in-memory and file-backed implementations
//! - Timer-driven simulations (notifications, medicine order tracking) under [`realtime`]
//!
//! **No UI concerns**: rendering, routing and role-based navigation belong to the front end.
//! Consumers receive the stores through an [`AppContext`] built at startup; there is no global
//! instance.

pub mod config;
pub mod constants;
pub mod context;
mod error;
pub mod models;
pub mod realtime;
pub mod seed;
pub mod storage;
pub mod stores;

pub use config::CoreConfig;
pub use context::AppContext;
pub use error::{StoreError, StoreResult};
pub use storage::{Fallback, FileStorage, LocalStorage, MemoryStorage};
pub use stores::{
    AppointmentFilter, AppointmentStore, ArticleFilter, ArticleStore, UserProfileStore,
};

pub use careportal_ids::{EventId, TimestampId};
pub use careportal_types::{NonEmptyText, StorageKey};
