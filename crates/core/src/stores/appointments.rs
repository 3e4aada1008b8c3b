//! Appointment store.
//!
//! Persists the full booking list under the `appointments` key. No overlap checks are made:
//! the same doctor, date and time may be booked any number of times.

use crate::constants::APPOINTMENTS_KEY;
use crate::models::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};
use crate::seed::sample_appointments;
use crate::storage::{load_json, persist_json, Fallback, Hydrated, LocalStorage};
use crate::stores::{allocate_id, observe_ids, touch};
use crate::StoreResult;
use careportal_ids::TimestampIdGenerator;
use careportal_types::StorageKey;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// Criteria for [`AppointmentStore::filter`]. Unset criteria match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.patient_id
            .as_ref()
            .map_or(true, |id| *id == appointment.patient_id)
            && self
                .doctor_id
                .as_ref()
                .map_or(true, |id| *id == appointment.doctor_id)
            && self.status.map_or(true, |s| s == appointment.status)
    }
}

#[derive(Debug)]
pub struct AppointmentStore {
    storage: Arc<dyn LocalStorage>,
    key: StorageKey,
    appointments: Vec<Appointment>,
    ids: TimestampIdGenerator,
}

impl AppointmentStore {
    /// Loads persisted appointments, falling back to the sample bookings (or nothing when
    /// `seed_sample_data` is false).
    pub fn hydrate(storage: Arc<dyn LocalStorage>, seed_sample_data: bool) -> StoreResult<Self> {
        Self::hydrate_with(storage, seed_sample_data, Fallback::WriteBack)
    }

    /// Like [`hydrate`](Self::hydrate), with explicit control over writing the fallback back.
    pub fn hydrate_with(
        storage: Arc<dyn LocalStorage>,
        seed_sample_data: bool,
        fallback: Fallback,
    ) -> StoreResult<Self> {
        let key = StorageKey::new(APPOINTMENTS_KEY)?;

        let hydrated = load_json::<Vec<Appointment>>(storage.as_ref(), &key);
        let from_storage = matches!(hydrated, Hydrated::Loaded(_));
        let appointments = match hydrated.loaded() {
            Some(appointments) => appointments,
            None if seed_sample_data => sample_appointments(),
            None => Vec::new(),
        };

        let mut ids = TimestampIdGenerator::new();
        observe_ids(&mut ids, appointments.iter().map(|a| a.id.as_str()));

        let store = Self {
            storage,
            key,
            appointments,
            ids,
        };

        if !from_storage && fallback == Fallback::WriteBack {
            if let Err(e) = store.persist() {
                tracing::warn!("failed to write initial appointments: {}", e);
            }
        }
        tracing::info!("hydrated {} appointments", store.appointments.len());

        Ok(store)
    }

    pub fn list(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn filter(&self, filter: &AppointmentFilter) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| filter.matches(a))
            .collect()
    }

    pub fn by_patient(&self, patient_id: &str) -> Vec<&Appointment> {
        self.filter(&AppointmentFilter {
            patient_id: Some(patient_id.to_string()),
            ..AppointmentFilter::default()
        })
    }

    pub fn by_doctor(&self, doctor_id: &str) -> Vec<&Appointment> {
        self.filter(&AppointmentFilter {
            doctor_id: Some(doctor_id.to_string()),
            ..AppointmentFilter::default()
        })
    }

    pub fn by_status(&self, status: AppointmentStatus) -> Vec<&Appointment> {
        self.filter(&AppointmentFilter {
            status: Some(status),
            ..AppointmentFilter::default()
        })
    }

    /// Books a new appointment. The id is generated here and never reused.
    pub fn add(&mut self, new_appointment: NewAppointment) -> StoreResult<Appointment> {
        let appointments = &self.appointments;
        let id = allocate_id(&mut self.ids, |candidate| {
            appointments.iter().any(|a| a.id == candidate)
        });

        let appointment = new_appointment.into_appointment(id, Utc::now());
        tracing::debug!(
            "booking {} with {} on {} at {}",
            appointment.id,
            appointment.doctor_name,
            appointment.date,
            appointment.time
        );
        self.appointments.push(appointment.clone());
        self.persist()?;

        Ok(appointment)
    }

    /// Merges `patch` and refreshes `updatedAt`. `Ok(None)` if the id is unknown.
    pub fn update(
        &mut self,
        id: &str,
        patch: AppointmentPatch,
    ) -> StoreResult<Option<Appointment>> {
        let Some(appointment) = self.appointments.iter_mut().find(|a| a.id == id) else {
            tracing::debug!("update ignored, no appointment {}", id);
            return Ok(None);
        };

        patch.apply(appointment);
        appointment.updated_at = touch(appointment.updated_at);
        let updated = appointment.clone();
        self.persist()?;

        Ok(Some(updated))
    }

    pub fn cancel(&mut self, id: &str) -> StoreResult<Option<Appointment>> {
        self.update(id, AppointmentPatch::status(AppointmentStatus::Cancelled))
    }

    /// Moves a booking to a new slot and marks it rescheduled.
    pub fn reschedule(
        &mut self,
        id: &str,
        date: NaiveDate,
        time: impl Into<String>,
    ) -> StoreResult<Option<Appointment>> {
        self.update(
            id,
            AppointmentPatch {
                date: Some(date),
                time: Some(time.into()),
                status: Some(AppointmentStatus::Rescheduled),
                ..AppointmentPatch::default()
            },
        )
    }

    /// Removes the appointment with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.appointments.len();
        self.appointments.retain(|a| a.id != id);
        if self.appointments.len() == before {
            return Ok(false);
        }
        tracing::debug!("deleted appointment {}", id);
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> StoreResult<()> {
        persist_json(self.storage.as_ref(), &self.key, &self.appointments)
    }
}
