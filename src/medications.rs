//! Medication list — view types and read-side helpers.
//!
//! Card shaping for the list screen (next dose, taken-today accent,
//! frequency label), name search, and the prescription scan stub that
//! pre-fills the add form.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::{parse_time_slot, Medication, NewMedication};

// ═══════════════════════════════════════════
// View types — serialised to frontend
// ═══════════════════════════════════════════

/// A medication card for the list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationCard {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency_label: String,
    pub times: Vec<String>,
    pub next_time: Option<String>,
    pub taken_today: bool,
    pub has_prescription_image: bool,
}

/// Fields a prescription scan can suggest for the add form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSuggestion {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub notes: Option<String>,
}

// ═══════════════════════════════════════════
// Query functions
// ═══════════════════════════════════════════

/// Case-insensitive substring match on the name. A blank query matches
/// everything.
pub fn search_by_name(medications: &[Medication], query: &str) -> Vec<Medication> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return medications.to_vec();
    }
    medications
        .iter()
        .filter(|m| m.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Minutes since midnight.
pub fn minutes_of_day(at: NaiveDateTime) -> u32 {
    at.hour() * 60 + at.minute()
}

/// Next dose slot after `now_minutes_of_day`, as `HH:MM`.
///
/// Takes the earliest slot strictly later than now; when every slot has
/// passed, wraps to the earliest slot (tomorrow's first dose). `None` only
/// when the medication has no usable slots.
pub fn next_occurrence(medication: &Medication, now_minutes_of_day: u32) -> Option<String> {
    let mut offsets: Vec<u32> = medication
        .times
        .iter()
        .filter_map(|t| parse_time_slot(t))
        .map(|t| t.hour() * 60 + t.minute())
        .collect();
    offsets.sort_unstable();
    offsets.dedup();

    let next = offsets
        .iter()
        .copied()
        .find(|&offset| offset > now_minutes_of_day)
        .or_else(|| offsets.first().copied())?;
    Some(format!("{:02}:{:02}", next / 60, next % 60))
}

/// Whether the last recorded dose falls on `date`.
pub fn taken_on(medication: &Medication, date: NaiveDate) -> bool {
    medication
        .last_taken
        .is_some_and(|taken| taken.date() == date)
}

pub fn build_card(medication: &Medication, now: NaiveDateTime) -> MedicationCard {
    MedicationCard {
        id: medication.id.clone(),
        name: medication.name.clone(),
        dosage: medication.dosage.clone(),
        frequency_label: medication.frequency.label().into(),
        times: medication.times.clone(),
        next_time: next_occurrence(medication, minutes_of_day(now)),
        taken_today: taken_on(medication, now.date()),
        has_prescription_image: medication.prescription_image.is_some(),
    }
}

// ═══════════════════════════════════════════
// Prescription scan
// ═══════════════════════════════════════════

/// Fixed result standing in for OCR on a captured prescription photo.
pub fn stub_scan() -> ScanSuggestion {
    ScanSuggestion {
        name: Some("Lisinopril".into()),
        dosage: Some("10mg".into()),
        notes: Some("Take once daily with water.".into()),
    }
}

impl NewMedication {
    /// Copy the non-empty suggested fields into the form; others keep
    /// whatever the user already typed.
    pub fn apply_suggestion(&mut self, suggestion: &ScanSuggestion) {
        if let Some(name) = non_empty(&suggestion.name) {
            self.name = name.to_string();
        }
        if let Some(dosage) = non_empty(&suggestion.dosage) {
            self.dosage = dosage.to_string();
        }
        if let Some(notes) = non_empty(&suggestion.notes) {
            self.notes = Some(notes.to_string());
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
