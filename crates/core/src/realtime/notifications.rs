//! Simulated notification feed.
//!
//! Every tick appends one notification picked from a fixed set of templates. The feed keeps at
//! most `cap` entries, newest first; the oldest entry is dropped when the cap is exceeded.

use crate::realtime::PeriodicJob;
use careportal_ids::EventId;
use chrono::{DateTime, Utc};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    AppointmentReminder,
    OrderUpdate,
    ArticlePublished,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EventId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

const TEMPLATES: &[(NotificationKind, &str, &str)] = &[
    (
        NotificationKind::AppointmentReminder,
        "Appointment reminder",
        "You have an appointment tomorrow. Please arrive 10 minutes early.",
    ),
    (
        NotificationKind::AppointmentReminder,
        "Appointment confirmed",
        "Your doctor has confirmed your upcoming appointment.",
    ),
    (
        NotificationKind::OrderUpdate,
        "Order update",
        "Your medicine order status has changed.",
    ),
    (
        NotificationKind::OrderUpdate,
        "Prescription ready",
        "A prescription is ready to be ordered from the pharmacy.",
    ),
    (
        NotificationKind::ArticlePublished,
        "New health article",
        "A new article has been published in your areas of interest.",
    ),
    (
        NotificationKind::System,
        "Profile reminder",
        "Keep your allergies and medications up to date.",
    ),
];

#[derive(Clone, Debug)]
pub struct NotificationFeed {
    notifications: Vec<Notification>,
    cap: usize,
}

impl NotificationFeed {
    /// Empty feed holding at most `cap` notifications (at least one).
    pub fn new(cap: usize) -> Self {
        Self {
            notifications: Vec::new(),
            cap: cap.max(1),
        }
    }

    /// Newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Adds a notification at the front of the feed.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> &Notification {
        self.notifications.insert(
            0,
            Notification {
                id: EventId::new(),
                kind,
                title: title.into(),
                message: message.into(),
                created_at: Utc::now(),
                read: false,
            },
        );
        self.notifications.truncate(self.cap);
        &self.notifications[0]
    }

    /// Returns false if no notification has that id.
    pub fn mark_read(&mut self, id: &EventId) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == *id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    /// Marks everything read and returns how many were unread.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        changed
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

impl PeriodicJob for NotificationFeed {
    fn name(&self) -> &str {
        "notifications"
    }

    fn tick(&mut self, rng: &mut dyn RngCore) {
        let (kind, title, message) = TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
        let notification = self.push(kind, title, message);
        tracing::info!("notification: {}", notification.title);
    }
}
