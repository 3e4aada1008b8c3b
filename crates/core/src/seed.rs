//! Built-in sample data.
//!
//! Used when a store has nothing persisted (or what was persisted could not be read) and
//! sample seeding is enabled. All people and content here are fictional.

use crate::models::{
    Appointment, AppointmentStatus, AppointmentType, Article, ArticleStatus, AuthorType,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::BTreeSet;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Sample articles, in display order.
pub fn sample_articles() -> Vec<Article> {
    vec![
        Article {
            id: "1".into(),
            title: "Understanding Heart Health: Prevention Tips".into(),
            content: "Cardiovascular disease remains a leading cause of death. Regular \
                      exercise, a balanced diet low in saturated fat, not smoking and \
                      keeping blood pressure in range all reduce risk."
                .into(),
            author_id: "doc-1".into(),
            author_name: "Dr. Sarah Johnson".into(),
            author_type: AuthorType::Doctor,
            created_at: at(2025, 1, 15, 10, 0),
            updated_at: at(2025, 1, 15, 10, 0),
            status: ArticleStatus::Published,
            category: "Cardiology".into(),
            tags: tags(&["heart", "prevention", "lifestyle"]),
            image_url: Some("/images/articles/heart-health.jpg".into()),
        },
        Article {
            id: "2".into(),
            title: "Managing Seasonal Allergies".into(),
            content: "Pollen counts peak in spring. Antihistamines, nasal sprays and \
                      keeping windows closed on high-count days help most people."
                .into(),
            author_id: "doc-2".into(),
            author_name: "Dr. Michael Chen".into(),
            author_type: AuthorType::Doctor,
            created_at: at(2025, 2, 3, 14, 30),
            updated_at: at(2025, 2, 4, 9, 15),
            status: ArticleStatus::Published,
            category: "Allergy".into(),
            tags: tags(&["allergies", "seasonal"]),
            image_url: None,
        },
        Article {
            id: "3".into(),
            title: "Mental Health in the Workplace".into(),
            content: "Burnout is common and treatable. Recognising early signs such as \
                      fatigue and withdrawal makes it easier to ask for support."
                .into(),
            author_id: "doc-3".into(),
            author_name: "Dr. Emily Rodriguez".into(),
            author_type: AuthorType::Doctor,
            created_at: at(2025, 2, 20, 8, 45),
            updated_at: at(2025, 2, 20, 8, 45),
            status: ArticleStatus::Draft,
            category: "Mental Health".into(),
            tags: tags(&["stress", "burnout", "work"]),
            image_url: None,
        },
        Article {
            id: "4".into(),
            title: "New Online Pharmacy Ordering".into(),
            content: "Prescriptions can now be ordered from the Medicines page and tracked \
                      until delivery."
                .into(),
            author_id: "admin-1".into(),
            author_name: "CarePortal Admin".into(),
            author_type: AuthorType::Admin,
            created_at: at(2025, 3, 1, 12, 0),
            updated_at: at(2025, 3, 1, 12, 0),
            status: ArticleStatus::Published,
            category: "Announcements".into(),
            tags: tags(&["pharmacy", "orders"]),
            image_url: None,
        },
    ]
}

/// Sample appointments, in display order.
pub fn sample_appointments() -> Vec<Appointment> {
    let booked = at(2025, 3, 1, 9, 0);
    vec![
        Appointment {
            id: "1".into(),
            patient_id: "patient-1".into(),
            patient_name: "John Doe".into(),
            doctor_id: "doc-1".into(),
            doctor_name: "Dr. Sarah Johnson".into(),
            doctor_specialty: "Cardiology".into(),
            doctor_image: "/images/doctors/sarah-johnson.jpg".into(),
            date: date(2025, 3, 20),
            time: "10:00 AM".into(),
            appointment_type: AppointmentType::InPerson,
            status: AppointmentStatus::Confirmed,
            reason: "Annual heart check".into(),
            notes: "Bring previous ECG results".into(),
            image: None,
            created_at: booked,
            updated_at: booked,
        },
        Appointment {
            id: "2".into(),
            patient_id: "patient-1".into(),
            patient_name: "John Doe".into(),
            doctor_id: "doc-2".into(),
            doctor_name: "Dr. Michael Chen".into(),
            doctor_specialty: "Dermatology".into(),
            doctor_image: "/images/doctors/michael-chen.jpg".into(),
            date: date(2025, 3, 25),
            time: "2:30 PM".into(),
            appointment_type: AppointmentType::VideoCall,
            status: AppointmentStatus::Scheduled,
            reason: "Skin rash follow-up".into(),
            notes: String::new(),
            image: None,
            created_at: booked,
            updated_at: booked,
        },
        Appointment {
            id: "3".into(),
            patient_id: "patient-2".into(),
            patient_name: "Jane Smith".into(),
            doctor_id: "doc-1".into(),
            doctor_name: "Dr. Sarah Johnson".into(),
            doctor_specialty: "Cardiology".into(),
            doctor_image: "/images/doctors/sarah-johnson.jpg".into(),
            date: date(2025, 2, 10),
            time: "11:15 AM".into(),
            appointment_type: AppointmentType::FollowUp,
            status: AppointmentStatus::Completed,
            reason: "Blood pressure review".into(),
            notes: "Medication dose adjusted".into(),
            image: None,
            created_at: at(2025, 1, 28, 16, 0),
            updated_at: at(2025, 2, 10, 12, 0),
        },
        Appointment {
            id: "4".into(),
            patient_id: "patient-2".into(),
            patient_name: "Jane Smith".into(),
            doctor_id: "doc-3".into(),
            doctor_name: "Dr. Emily Rodriguez".into(),
            doctor_specialty: "Psychiatry".into(),
            doctor_image: "/images/doctors/emily-rodriguez.jpg".into(),
            date: date(2025, 4, 2),
            time: "9:00 AM".into(),
            appointment_type: AppointmentType::Consultation,
            status: AppointmentStatus::Upcoming,
            reason: "Initial consultation".into(),
            notes: String::new(),
            image: None,
            created_at: booked,
            updated_at: booked,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let article_ids: HashSet<_> = sample_articles().into_iter().map(|a| a.id).collect();
        assert_eq!(article_ids.len(), sample_articles().len());

        let appointment_ids: HashSet<_> =
            sample_appointments().into_iter().map(|a| a.id).collect();
        assert_eq!(appointment_ids.len(), sample_appointments().len());
    }

    #[test]
    fn test_seed_timestamps_are_real_dates() {
        for article in sample_articles() {
            assert!(article.created_at.timestamp() > 0);
            assert!(article.updated_at >= article.created_at);
        }
        for appointment in sample_appointments() {
            assert!(appointment.date > NaiveDate::default());
        }
    }
}
