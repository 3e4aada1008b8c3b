#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read store file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write store file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to remove store file: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize store '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("store '{key}' schema mismatch at {path}: {message}")]
    Deserialization {
        key: String,
        path: String,
        message: String,
    },
    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("invalid text: {0}")]
    Text(#[from] careportal_types::TextError),
    #[error("invalid identifier: {0}")]
    Id(#[from] careportal_ids::IdError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
