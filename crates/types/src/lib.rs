//! Validated text primitives shared across the CarePortal crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input is not usable as a storage key
    #[error("Invalid storage key '{0}': must not contain path separators or start with '.'")]
    InvalidKey(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Name of a slot in local storage.
///
/// Keys double as file stems for the file-backed storage, so they may not contain path
/// separators, may not start with a dot, and may not be blank.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageKey(NonEmptyText);

impl StorageKey {
    /// Validates and wraps a storage key.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let text = NonEmptyText::new(input)?;
        let raw = text.as_str();
        if raw.starts_with('.') || raw.contains(['/', '\\']) || raw.contains(char::is_whitespace) {
            return Err(TextError::InvalidKey(raw.to_owned()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::str::FromStr for StorageKey {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKey::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  cardiology  ").unwrap();
        assert_eq!(text.as_str(), "cardiology");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   \t"), Err(TextError::Empty));
    }

    #[test]
    fn test_non_empty_text_deserialize_rejects_empty() {
        let err = serde_json::from_str::<NonEmptyText>("\"  \"");
        assert!(err.is_err());

        let ok: NonEmptyText = serde_json::from_str("\"heart\"").unwrap();
        assert_eq!(ok.as_str(), "heart");
    }

    #[test]
    fn test_storage_key_accepts_store_names() {
        for name in ["articles", "appointments", "userProfile"] {
            let key = StorageKey::new(name).unwrap();
            assert_eq!(key.as_str(), name);
        }
    }

    #[test]
    fn test_storage_key_rejects_paths() {
        assert!(matches!(
            StorageKey::new("../etc/passwd"),
            Err(TextError::InvalidKey(_))
        ));
        assert!(matches!(
            StorageKey::new("a\\b"),
            Err(TextError::InvalidKey(_))
        ));
        assert!(matches!(
            StorageKey::new(".hidden"),
            Err(TextError::InvalidKey(_))
        ));
        assert!(matches!(
            StorageKey::new("two words"),
            Err(TextError::InvalidKey(_))
        ));
        assert_eq!(StorageKey::new(""), Err(TextError::Empty));
    }
}
