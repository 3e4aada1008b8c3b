//! Record types persisted by the stores.
//!
//! Each record has a `New*` shape (what a caller supplies on add) and a `*Patch` shape
//! (partial update, every field optional). Wire names are camelCase.

pub mod appointment;
pub mod article;
pub mod profile;

pub use appointment::{
    Appointment, AppointmentPatch, AppointmentStatus, AppointmentType, NewAppointment,
};
pub use article::{Article, ArticlePatch, ArticleStatus, AuthorType, NewArticle};
pub use profile::{UserProfile, UserProfilePatch};
