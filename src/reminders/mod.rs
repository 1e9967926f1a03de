//! Reminder derivation engine.
//!
//! The derived set is persisted under the `reminders` key and is the
//! canonical answer for every read until it is cleared. There is no
//! background re-evaluation: a pending slot stays pending after its time
//! passes until someone updates it.

mod derive;
mod status;
pub mod view;

pub use derive::*;
pub use status::*;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::clock::Clock;
use crate::db::repository::{has_collection, load_collection, save_collection};
use crate::db::{KeyValueStore, MedicationRepository, StoreError, REMINDERS_KEY};
use crate::models::{Reminder, ReminderStatus};

pub struct ReminderEngine {
    store: Arc<dyn KeyValueStore>,
    medications: Arc<MedicationRepository>,
    clock: Arc<dyn Clock>,
    source: Mutex<Box<dyn StatusSource>>,
    writer: Mutex<()>,
}

impl ReminderEngine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        medications: Arc<MedicationRepository>,
        clock: Arc<dyn Clock>,
        source: Box<dyn StatusSource>,
    ) -> Self {
        Self {
            store,
            medications,
            clock,
            source: Mutex::new(source),
            writer: Mutex::new(()),
        }
    }

    /// The persisted reminder set, derived once if nothing is stored.
    pub fn list_all(&self) -> Result<Vec<Reminder>, StoreError> {
        let _guard = self.lock_writer()?;
        self.load_or_derive()
    }

    /// Reminders for one medication, in stored order.
    pub fn list_by_medication(&self, medication_id: &str) -> Result<Vec<Reminder>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|r| r.medication_id == medication_id)
            .collect())
    }

    pub fn update_status(
        &self,
        reminder_id: &str,
        status: ReminderStatus,
    ) -> Result<Reminder, StoreError> {
        let _guard = self.lock_writer()?;
        let mut reminders = self.load_or_derive()?;
        let reminder = reminders
            .iter_mut()
            .find(|r| r.id == reminder_id)
            .ok_or_else(|| StoreError::not_found("Reminder", reminder_id))?;

        reminder.status = status;
        let updated = reminder.clone();
        save_collection(self.store.as_ref(), REMINDERS_KEY, &reminders)?;
        Ok(updated)
    }

    /// Drop the stored set so the next read derives a fresh one.
    pub fn invalidate(&self) -> Result<(), StoreError> {
        let _guard = self.lock_writer()?;
        self.store.set_item(REMINDERS_KEY, "")?;
        tracing::info!("Reminder set invalidated");
        Ok(())
    }

    /// Derive and persist a fresh set now, replacing whatever was stored.
    pub fn regenerate(&self) -> Result<Vec<Reminder>, StoreError> {
        let _guard = self.lock_writer()?;
        self.derive_and_save()
    }

    fn load_or_derive(&self) -> Result<Vec<Reminder>, StoreError> {
        if has_collection(self.store.as_ref(), REMINDERS_KEY)? {
            return load_collection(self.store.as_ref(), REMINDERS_KEY);
        }
        self.derive_and_save()
    }

    fn derive_and_save(&self) -> Result<Vec<Reminder>, StoreError> {
        let medications = self.medications.list()?;
        let now = self.clock.now();
        let reminders = {
            let mut source = self.source.lock().map_err(|_| StoreError::LockPoisoned)?;
            derive_reminders(&medications, now, source.as_mut())
        };
        save_collection(self.store.as_ref(), REMINDERS_KEY, &reminders)?;

        tracing::info!(
            medications = medications.len(),
            reminders = reminders.len(),
            "Derived reminder set"
        );
        Ok(reminders)
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.writer.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::db::MemoryStore;
    use crate::models::{MedicationPatch, NewMedication};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn nine_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<FixedClock>,
        medications: Arc<MedicationRepository>,
        engine: ReminderEngine,
    }

    fn fixture(source: Box<dyn StatusSource>) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(nine_am()));
        let medications = Arc::new(MedicationRepository::new(store.clone(), clock.clone()));
        medications.initialize().unwrap();
        let engine = ReminderEngine::new(
            store.clone(),
            Arc::clone(&medications),
            clock.clone(),
            source,
        );
        Fixture {
            store,
            clock,
            medications,
            engine,
        }
    }

    fn simulated() -> Box<dyn StatusSource> {
        Box::new(SimulatedStatus::seeded(11, 0.7))
    }

    #[test]
    fn list_all_derives_once_and_persists() {
        let f = fixture(simulated());
        assert!(!has_collection(f.store.as_ref(), REMINDERS_KEY).unwrap());

        let first = f.engine.list_all().unwrap();
        assert_eq!(first.len(), 12);
        assert!(has_collection(f.store.as_ref(), REMINDERS_KEY).unwrap());
    }

    #[test]
    fn repeated_reads_are_identical() {
        let f = fixture(simulated());
        let first = f.engine.list_all().unwrap();
        let raw_first = f.store.get_item(REMINDERS_KEY).unwrap();

        f.clock.advance(Duration::hours(10));
        let second = f.engine.list_all().unwrap();
        let raw_second = f.store.get_item(REMINDERS_KEY).unwrap();

        assert_eq!(first, second);
        assert_eq!(raw_first, raw_second);
    }

    #[test]
    fn status_is_frozen_at_generation() {
        let f = fixture(simulated());
        let before = f.engine.list_all().unwrap();
        let evening = before
            .iter()
            .find(|r| r.scheduled_time == nine_am().date().and_hms_opt(20, 0, 0).unwrap())
            .unwrap()
            .clone();
        assert_eq!(evening.status, ReminderStatus::Pending);

        f.clock.advance(Duration::hours(14));
        let after = f.engine.list_all().unwrap();
        let same = after.iter().find(|r| r.id == evening.id).unwrap();
        assert_eq!(same.status, ReminderStatus::Pending);
    }

    #[test]
    fn update_status_changes_only_target() {
        let f = fixture(simulated());
        let before = f.engine.list_all().unwrap();

        let updated = f.engine.update_status("2", ReminderStatus::Completed).unwrap();
        assert_eq!(updated.status, ReminderStatus::Completed);

        let after = f.engine.list_all().unwrap();
        for (old, new) in before.iter().zip(&after) {
            if old.id == "2" {
                assert_eq!(new.status, ReminderStatus::Completed);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn update_status_unknown_id_is_not_found() {
        let f = fixture(simulated());
        let err = f.engine.update_status("999", ReminderStatus::Missed).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn list_by_medication_filters_in_order() {
        let f = fixture(simulated());
        let metformin = f.engine.list_by_medication("3").unwrap();
        assert_eq!(metformin.len(), 6);
        assert!(metformin.iter().all(|r| r.medication_name == "Metformin"));

        let ids: Vec<usize> = metformin.iter().map(|r| r.id.parse().unwrap()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);

        assert!(f.engine.list_by_medication("unknown").unwrap().is_empty());
    }

    #[test]
    fn stored_set_goes_stale_until_invalidated() {
        let f = fixture(simulated());
        f.engine.list_all().unwrap();

        f.medications
            .update(
                "2",
                &MedicationPatch {
                    name: Some("Lipitor".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        let stale = f.engine.list_by_medication("2").unwrap();
        assert!(stale.iter().all(|r| r.medication_name == "Atorvastatin"));

        f.engine.invalidate().unwrap();
        let fresh = f.engine.list_by_medication("2").unwrap();
        assert!(fresh.iter().all(|r| r.medication_name == "Lipitor"));
    }

    #[test]
    fn regenerate_replaces_manual_updates() {
        let f = fixture(Box::new(LastTakenStatus));
        f.engine.update_status("5", ReminderStatus::Completed).unwrap();

        let fresh = f.engine.regenerate().unwrap();
        let five = fresh.iter().find(|r| r.id == "5").unwrap();
        assert_eq!(five.status, ReminderStatus::Pending);
    }

    #[test]
    fn empty_medication_set_persists_empty_reminders() {
        let f = fixture(simulated());
        for id in ["1", "2", "3"] {
            f.medications.delete(id).unwrap();
        }
        assert!(f.engine.list_all().unwrap().is_empty());
        assert_eq!(
            f.store.get_item(REMINDERS_KEY).unwrap().as_deref(),
            Some("[]")
        );

        f.medications
            .add(NewMedication {
                name: "Aspirin".into(),
                dosage: "81mg".into(),
                times: vec!["10:00".into()],
                ..Default::default()
            })
            .unwrap();
        assert!(f.engine.list_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_reminder_document_is_storage_failure() {
        let f = fixture(simulated());
        f.store.set_item(REMINDERS_KEY, "[{").unwrap();
        assert!(f.engine.list_all().unwrap_err().is_storage_failure());
    }
}
