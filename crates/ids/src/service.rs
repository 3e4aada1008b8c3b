//! Internal implementation of the identifier types.

use crate::{IdError, IdResult};
use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

/// Millisecond timestamp identifier.
///
/// Displayed and persisted as the plain decimal number of milliseconds since the Unix epoch.
/// Ordering follows creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimestampId(i64);

impl TimestampId {
    /// Builds an id from an instant, truncated to milliseconds.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }

    /// Milliseconds since the Unix epoch.
    pub fn millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TimestampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TimestampId {
    type Err = IdError;

    /// Parses a decimal millisecond count. Signs, whitespace and empty input are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidInput(format!(
                "Timestamp id must be a non-empty run of decimal digits, got: '{}'",
                s
            )));
        }
        s.parse::<i64>().map(Self).map_err(|e| {
            IdError::InvalidInput(format!("Timestamp id '{}' out of range: {}", s, e))
        })
    }
}

/// Hands out strictly increasing [`TimestampId`]s.
///
/// If the clock reads at or before the previous id, the next id is the previous one plus one
/// millisecond. A previous id of `i64::MAX` cannot be bumped, so the generator falls back to the
/// clock; callers that need uniqueness against persisted ids must still check for collisions.
/// One generator lives inside each store for the whole session.
#[derive(Clone, Debug, Default)]
pub struct TimestampIdGenerator {
    last: Option<TimestampId>,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id based on the current wall clock.
    pub fn next_id(&mut self) -> TimestampId {
        self.next_id_at(Utc::now())
    }

    /// Next id as if the clock read `now`.
    pub fn next_id_at(&mut self, now: DateTime<Utc>) -> TimestampId {
        let candidate = TimestampId::from_datetime(now);
        let id = match self.last {
            // Once the previous id cannot be bumped, restart from the clock.
            Some(prev) if candidate <= prev => {
                prev.0.checked_add(1).map_or(candidate, TimestampId)
            }
            _ => candidate,
        };
        self.last = Some(id);
        id
    }

    /// Records an id minted elsewhere (for example one loaded from storage) so later ids
    /// sort after it.
    pub fn observe(&mut self, id: TimestampId) {
        if self.last.map_or(true, |prev| id > prev) {
            self.last = Some(id);
        }
    }

    /// The most recent id handed out or observed.
    pub fn last(&self) -> Option<TimestampId> {
        self.last
    }
}

/// Random identifier for simulated events (notifications, medicine orders).
///
/// Always rendered in canonical form: 32 lowercase hex characters, no hyphens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventId(uuid::Uuid);

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl EventId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parses an id that must already be in canonical form.
    pub fn parse(input: &str) -> IdResult<Self> {
        let canonical = input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !canonical {
            return Err(IdError::InvalidInput(format!(
                "Event id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        uuid::Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| IdError::InvalidInput(e.to_string()))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for EventId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EventId::parse(&s).map_err(serde::de::Error::custom)
    }
}
