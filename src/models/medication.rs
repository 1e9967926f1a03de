use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::Frequency;
use crate::db::StoreError;

/// Maximum number of daily time slots per medication.
pub const MAX_TIMES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: Frequency,
    /// `HH:MM`, 24-hour, in the order the user entered them.
    pub times: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub prescription_image: Option<String>,
    #[serde(default)]
    pub last_taken: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Creation input, as filled in by the add-medication form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: Frequency,
    pub times: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub prescription_image: Option<String>,
}

impl NewMedication {
    /// Caller-side checks before handing the record to the repository.
    pub fn validate(&self) -> Result<(), StoreError> {
        require_text("name", &self.name)?;
        require_text("dosage", &self.dosage)?;
        validate_times(&self.times)
    }
}

/// Partial update. `None` leaves a field untouched; for the clearable
/// fields, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationPatch {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<Frequency>,
    pub times: Option<Vec<String>>,
    pub notes: Option<Option<String>>,
    pub prescription_image: Option<Option<String>>,
}

impl MedicationPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(dosage) = &self.dosage {
            require_text("dosage", dosage)?;
        }
        if let Some(times) = &self.times {
            validate_times(times)?;
        }
        Ok(())
    }

    /// Merge the set fields onto `medication`. Identity and timestamps are
    /// the repository's business and never touched here.
    pub fn apply_to(&self, medication: &mut Medication) {
        if let Some(name) = &self.name {
            medication.name = name.clone();
        }
        if let Some(dosage) = &self.dosage {
            medication.dosage = dosage.clone();
        }
        if let Some(frequency) = self.frequency {
            medication.frequency = frequency;
        }
        if let Some(times) = &self.times {
            medication.times = times.clone();
        }
        if let Some(notes) = &self.notes {
            medication.notes = notes.clone();
        }
        if let Some(image) = &self.prescription_image {
            medication.prescription_image = image.clone();
        }
    }
}

/// Parse a strict `HH:MM` 24-hour slot. Returns `None` for anything else,
/// including single-digit hours.
pub fn parse_time_slot(slot: &str) -> Option<NaiveTime> {
    let bytes = slot.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(slot, "%H:%M").ok()
}

fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn validate_times(times: &[String]) -> Result<(), StoreError> {
    if times.is_empty() || times.len() > MAX_TIMES {
        return Err(StoreError::Validation(format!(
            "between 1 and {MAX_TIMES} times are required, got {}",
            times.len()
        )));
    }
    if let Some(bad) = times.iter().find(|t| parse_time_slot(t).is_none()) {
        return Err(StoreError::Validation(format!(
            "time '{bad}' is not a 24-hour HH:MM value"
        )));
    }
    Ok(())
}
