//! Appointment booking records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::StoreError;

/// Kind of visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    InPerson,
    VideoCall,
    FollowUp,
    Consultation,
    CheckUp,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 5] = [
        AppointmentType::InPerson,
        AppointmentType::VideoCall,
        AppointmentType::FollowUp,
        AppointmentType::Consultation,
        AppointmentType::CheckUp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentType::InPerson => "in-person",
            AppointmentType::VideoCall => "video-call",
            AppointmentType::FollowUp => "follow-up",
            AppointmentType::Consultation => "consultation",
            AppointmentType::CheckUp => "check-up",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| StoreError::InvalidInput(format!("unknown appointment type '{s}'")))
    }
}

/// Booking lifecycle state.
///
/// Transitions are not enforced; any status may be set through an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
    Upcoming,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 7] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Rescheduled,
        AppointmentStatus::Upcoming,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in-progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Rescheduled => "rescheduled",
            AppointmentStatus::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| StoreError::InvalidInput(format!("unknown appointment status '{s}'")))
    }
}

/// A booking between a patient and a doctor, persisted under the `appointments` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub doctor_image: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Display time such as `10:30 AM`.
    pub time: String,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub reason: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller when booking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub doctor_image: String,
    pub date: NaiveDate,
    pub time: String,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub reason: String,
    pub notes: String,
    pub image: Option<String>,
}

impl NewAppointment {
    pub(crate) fn into_appointment(self, id: String, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            doctor_id: self.doctor_id,
            doctor_name: self.doctor_name,
            doctor_specialty: self.doctor_specialty,
            doctor_image: self.doctor_image,
            date: self.date,
            time: self.time,
            appointment_type: self.appointment_type,
            status: self.status,
            reason: self.reason,
            notes: self.notes,
            image: self.image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for an appointment. Every field except the id is mutable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub doctor_id: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_specialty: Option<String>,
    pub doctor_image: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub appointment_type: Option<AppointmentType>,
    pub status: Option<AppointmentStatus>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub image: Option<Option<String>>,
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, appointment: &mut Appointment) {
        if let Some(v) = self.patient_id {
            appointment.patient_id = v;
        }
        if let Some(v) = self.patient_name {
            appointment.patient_name = v;
        }
        if let Some(v) = self.doctor_id {
            appointment.doctor_id = v;
        }
        if let Some(v) = self.doctor_name {
            appointment.doctor_name = v;
        }
        if let Some(v) = self.doctor_specialty {
            appointment.doctor_specialty = v;
        }
        if let Some(v) = self.doctor_image {
            appointment.doctor_image = v;
        }
        if let Some(v) = self.date {
            appointment.date = v;
        }
        if let Some(v) = self.time {
            appointment.time = v;
        }
        if let Some(v) = self.appointment_type {
            appointment.appointment_type = v;
        }
        if let Some(v) = self.status {
            appointment.status = v;
        }
        if let Some(v) = self.reason {
            appointment.reason = v;
        }
        if let Some(v) = self.notes {
            appointment.notes = v;
        }
        if let Some(v) = self.image {
            appointment.image = v;
        }
    }
}
