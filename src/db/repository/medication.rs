use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::{has_collection, load_collection, save_collection, seed_medications};
use crate::clock::Clock;
use crate::db::{KeyValueStore, StoreError, MEDICATIONS_KEY};
use crate::models::{Medication, MedicationPatch, NewMedication};

/// CRUD over the `medications` document.
///
/// Mutations run under one lock so that two read-modify-write cycles on
/// the same document cannot interleave.
pub struct MedicationRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    writer: Mutex<()>,
}

impl MedicationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            writer: Mutex::new(()),
        }
    }

    /// Write the default set if no medication document exists yet.
    /// Returns true when the seed was written.
    pub fn initialize(&self) -> Result<bool, StoreError> {
        let _guard = self.lock_writer()?;
        if has_collection(self.store.as_ref(), MEDICATIONS_KEY)? {
            return Ok(false);
        }
        let seed = seed_medications(self.clock.now());
        save_collection(self.store.as_ref(), MEDICATIONS_KEY, &seed)?;
        tracing::info!(count = seed.len(), "Seeded default medications");
        Ok(true)
    }

    /// All medications in insertion order.
    pub fn list(&self) -> Result<Vec<Medication>, StoreError> {
        load_collection(self.store.as_ref(), MEDICATIONS_KEY)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Medication>, StoreError> {
        Ok(self.list()?.into_iter().find(|m| m.id == id))
    }

    /// Append a new medication with a fresh id and creation stamp.
    pub fn add(&self, data: NewMedication) -> Result<Medication, StoreError> {
        let _guard = self.lock_writer()?;
        let mut medications = self.list()?;

        let medication = Medication {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            dosage: data.dosage,
            frequency: data.frequency,
            times: data.times,
            notes: data.notes,
            prescription_image: data.prescription_image,
            last_taken: None,
            created_at: Some(self.clock.now()),
            updated_at: None,
        };
        medications.push(medication.clone());
        self.save(&medications)?;

        tracing::debug!(id = %medication.id, "Medication added");
        Ok(medication)
    }

    /// Merge `patch` onto the stored record and stamp `updated_at`.
    pub fn update(&self, id: &str, patch: &MedicationPatch) -> Result<Medication, StoreError> {
        self.modify(id, |medication, now| {
            patch.apply_to(medication);
            medication.updated_at = Some(now);
        })
    }

    /// Record that a dose was taken at `at`.
    pub fn mark_taken(&self, id: &str, at: NaiveDateTime) -> Result<Medication, StoreError> {
        self.modify(id, |medication, _| {
            medication.last_taken = Some(at);
        })
    }

    /// Remove the medication. Unknown ids are not an error.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock_writer()?;
        let medications: Vec<Medication> = self
            .list()?
            .into_iter()
            .filter(|m| m.id != id)
            .collect();
        self.save(&medications)
    }

    fn modify<F>(&self, id: &str, change: F) -> Result<Medication, StoreError>
    where
        F: FnOnce(&mut Medication, NaiveDateTime),
    {
        let _guard = self.lock_writer()?;
        let mut medications = self.list()?;
        let medication = medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found("Medication", id))?;

        change(medication, self.clock.now());
        let updated = medication.clone();
        self.save(&medications)?;
        Ok(updated)
    }

    fn save(&self, medications: &[Medication]) -> Result<(), StoreError> {
        save_collection(self.store.as_ref(), MEDICATIONS_KEY, medications)
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.writer.lock().map_err(|_| StoreError::LockPoisoned)
    }
}
