//! Timer-driven simulations of live updates: notifications and medicine order tracking.
//!
//! Jobs never touch the stores; they own their own state and are driven by the [`Scheduler`].

pub mod notifications;
pub mod orders;
pub mod scheduler;

pub use notifications::{Notification, NotificationFeed, NotificationKind};
pub use orders::{MedicineOrder, OrderItem, OrderStatus, OrderTracker};
pub use scheduler::{JobHandle, PeriodicJob, Scheduler};
