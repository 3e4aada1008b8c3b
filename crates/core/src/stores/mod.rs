//! The three data stores.
//!
//! Each store owns an in-memory collection, hydrates it once from [`LocalStorage`] when it is
//! constructed, and writes the whole collection back after every successful mutation.
//!
//! - [`ArticleStore`]: health articles written by doctors and admins.
//! - [`AppointmentStore`]: bookings between patients and doctors.
//! - [`UserProfileStore`]: the single active patient profile and onboarding state.
//!
//! Mutations that target an unknown id are no-ops and report it through their return value
//! (`None` / `false`), never through an error. Errors only come from the storage backend.
//!
//! [`LocalStorage`]: crate::storage::LocalStorage

pub mod appointments;
pub mod articles;
pub mod profile;

pub use appointments::{AppointmentFilter, AppointmentStore};
pub use articles::{ArticleFilter, ArticleStore};
pub use profile::UserProfileStore;

use careportal_ids::{TimestampId, TimestampIdGenerator};
use chrono::{DateTime, Duration, Utc};

/// Allocates an id that `taken` does not report as in use.
///
/// The generator is monotonic, so the loop only repeats when a previously persisted record
/// happens to hold the exact id the clock produced.
pub(crate) fn allocate_id(
    generator: &mut TimestampIdGenerator,
    taken: impl Fn(&str) -> bool,
) -> String {
    loop {
        let candidate = generator.next_id().to_string();
        if !taken(&candidate) {
            return candidate;
        }
        tracing::debug!("id {} already in use, allocating another", candidate);
    }
}

/// Primes `generator` with every persisted id that is a timestamp id.
pub(crate) fn observe_ids<'a>(
    generator: &mut TimestampIdGenerator,
    ids: impl IntoIterator<Item = &'a str>,
) {
    for id in ids {
        if let Ok(parsed) = id.parse::<TimestampId>() {
            generator.observe(parsed);
        }
    }
}

/// Modification time for a record last modified at `previous`.
///
/// Always strictly after `previous`, even when the clock has not advanced.
pub(crate) fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_id_skips_taken_ids() {
        let mut generator = TimestampIdGenerator::new();
        let first = allocate_id(&mut generator, |_| false);

        let next_expected: i64 = first.parse::<i64>().unwrap() + 1;
        let blocked = next_expected.to_string();
        let second = allocate_id(&mut generator, |id| id == blocked);

        assert_ne!(second, first);
        assert_ne!(second, blocked);
    }

    #[test]
    fn test_observe_ids_ignores_foreign_ids() {
        let mut generator = TimestampIdGenerator::new();
        observe_ids(&mut generator, ["apt-7", "9999999999999", "12"]);

        assert_eq!(generator.last().map(|id| id.millis()), Some(9_999_999_999_999));
    }

    #[test]
    fn test_touch_is_strictly_later() {
        let future = Utc::now() + Duration::hours(1);
        assert!(touch(future) > future);

        let past = Utc::now() - Duration::hours(1);
        assert!(touch(past) > past);
    }
}
