//! The active patient's profile.

use serde::{Deserialize, Serialize};

/// Patient profile persisted under the `userProfile` key.
///
/// `Default` is the empty shape handed out before anything has been persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD`, or empty when not yet provided.
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub emergency_contact: String,
    pub blood_type: String,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub conditions: Vec<String>,
    pub family_history: Vec<String>,
    pub has_completed_onboarding: bool,
}

impl UserProfile {
    /// `"First Last"`, skipping blank parts.
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Partial update for the profile. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserProfilePatch {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub medications: Option<Vec<String>>,
    pub conditions: Option<Vec<String>>,
    pub family_history: Option<Vec<String>>,
    pub has_completed_onboarding: Option<bool>,
}

impl UserProfilePatch {
    pub(crate) fn apply(self, profile: &mut UserProfile) {
        let UserProfilePatch {
            id,
            first_name,
            last_name,
            email,
            phone,
            date_of_birth,
            gender,
            address,
            emergency_contact,
            blood_type,
            allergies,
            medications,
            conditions,
            family_history,
            has_completed_onboarding,
        } = self;

        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut profile.id, id);
        set(&mut profile.first_name, first_name);
        set(&mut profile.last_name, last_name);
        set(&mut profile.email, email);
        set(&mut profile.phone, phone);
        set(&mut profile.date_of_birth, date_of_birth);
        set(&mut profile.gender, gender);
        set(&mut profile.address, address);
        set(&mut profile.emergency_contact, emergency_contact);
        set(&mut profile.blood_type, blood_type);
        set(&mut profile.allergies, allergies);
        set(&mut profile.medications, medications);
        set(&mut profile.conditions, conditions);
        set(&mut profile.family_history, family_history);
        set(&mut profile.has_completed_onboarding, has_completed_onboarding);
    }
}
