//! Constants used throughout the CarePortal core crate.
//!
//! Storage key names are part of the persisted layout: renaming one orphans existing data.

/// Storage key holding the full article collection.
pub const ARTICLES_KEY: &str = "articles";

/// Storage key holding the full appointment collection.
pub const APPOINTMENTS_KEY: &str = "appointments";

/// Storage key holding the active patient profile.
pub const USER_PROFILE_KEY: &str = "userProfile";

/// Default directory for file-backed storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "careportal_data";

/// File extension used by the file-backed storage.
pub const STORE_FILE_EXTENSION: &str = "json";

/// Default period between simulation ticks, in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 30_000;

/// Default maximum number of notifications kept by the feed.
pub const DEFAULT_FEED_CAP: usize = 50;
