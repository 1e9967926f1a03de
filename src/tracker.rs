//! Host-facing entry point.
//!
//! `Tracker` owns the medication repository and the reminder engine over
//! one store. It validates input before it reaches the repository and
//! clears the derived reminder set whenever the medication set changes,
//! so reminders never outlive or misname their medication.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{BackfillMode, TrackerConfig};
use crate::db::{FileStore, KeyValueStore, MedicationRepository, StoreError};
use crate::medications::{build_card, search_by_name, MedicationCard};
use crate::models::{Medication, MedicationPatch, NewMedication, Reminder, ReminderStatus};
use crate::reminders::view::{build_board, ReminderBoard};
use crate::reminders::{LastTakenStatus, ReminderEngine, SimulatedStatus, StatusSource};

pub struct Tracker {
    medications: Arc<MedicationRepository>,
    reminders: ReminderEngine,
    clock: Arc<dyn Clock>,
}

impl Tracker {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, backfill: BackfillMode) -> Self {
        let medications = Arc::new(MedicationRepository::new(
            Arc::clone(&store),
            Arc::clone(&clock),
        ));
        let reminders = ReminderEngine::new(
            store,
            Arc::clone(&medications),
            Arc::clone(&clock),
            status_source(backfill),
        );
        Self {
            medications,
            reminders,
            clock,
        }
    }

    /// File-backed tracker on the host clock.
    pub fn open(config: &TrackerConfig) -> Result<Self, StoreError> {
        let store = FileStore::open(&config.store_dir)?;
        tracing::info!(dir = %config.store_dir.display(), "Opened medication store");
        Ok(Self::new(
            Arc::new(store),
            Arc::new(SystemClock),
            config.backfill,
        ))
    }

    /// One-time startup step: seed the default medications on first run.
    pub fn initialize(&self) -> Result<bool, StoreError> {
        self.medications.initialize()
    }

    // ── Medications ──────────────────────────────────────

    pub fn medications(&self) -> Result<Vec<Medication>, StoreError> {
        self.medications.list()
    }

    pub fn medication(&self, id: &str) -> Result<Option<Medication>, StoreError> {
        self.medications.get_by_id(id)
    }

    pub fn search_medications(&self, query: &str) -> Result<Vec<Medication>, StoreError> {
        Ok(search_by_name(&self.medications.list()?, query))
    }

    pub fn medication_cards(&self, query: &str) -> Result<Vec<MedicationCard>, StoreError> {
        let now = self.clock.now();
        Ok(self
            .search_medications(query)?
            .iter()
            .map(|m| build_card(m, now))
            .collect())
    }

    /// Validate and store a new medication, then clear the reminder set.
    ///
    /// The two writes are not atomic. An `Err` after the medication write
    /// means only the invalidation failed: the medication is stored and the
    /// old reminder set is still in place until the next successful
    /// add/update/delete or `refresh_reminders`.
    pub fn add_medication(&self, data: NewMedication) -> Result<Medication, StoreError> {
        data.validate()?;
        let medication = self.medications.add(data)?;
        tracing::info!(id = %medication.id, "Medication added");
        self.invalidate_reminders(&medication.id)?;
        Ok(medication)
    }

    /// Apply a patch. An empty patch changes no field, so the reminder set
    /// is kept. Same partial-failure contract as
    /// [`Tracker::add_medication`].
    pub fn update_medication(
        &self,
        id: &str,
        patch: &MedicationPatch,
    ) -> Result<Medication, StoreError> {
        patch.validate()?;
        let medication = self.medications.update(id, patch)?;
        if !patch.is_empty() {
            self.invalidate_reminders(id)?;
        }
        Ok(medication)
    }

    /// Same partial-failure contract as [`Tracker::add_medication`].
    pub fn delete_medication(&self, id: &str) -> Result<(), StoreError> {
        self.medications.delete(id)?;
        tracing::info!(id, "Medication deleted");
        self.invalidate_reminders(id)
    }

    /// Record a dose as taken now. Leaves the reminder set alone: name and
    /// schedule are unchanged, and statuses the user already set survive.
    pub fn mark_taken(&self, id: &str) -> Result<Medication, StoreError> {
        self.medications.mark_taken(id, self.clock.now())
    }

    /// Next dose slot for a medication as `HH:MM`, relative to now.
    pub fn next_dose(&self, medication: &Medication) -> Option<String> {
        crate::medications::next_occurrence(
            medication,
            crate::medications::minutes_of_day(self.clock.now()),
        )
    }

    // ── Reminders ────────────────────────────────────────

    fn invalidate_reminders(&self, medication_id: &str) -> Result<(), StoreError> {
        self.reminders.invalidate().inspect_err(|e| {
            tracing::warn!(
                medication_id,
                error = %e,
                "Medication saved but reminder set was not cleared"
            );
        })
    }

    pub fn reminders(&self) -> Result<Vec<Reminder>, StoreError> {
        self.reminders.list_all()
    }

    pub fn reminders_for(&self, medication_id: &str) -> Result<Vec<Reminder>, StoreError> {
        self.reminders.list_by_medication(medication_id)
    }

    pub fn set_reminder_status(
        &self,
        reminder_id: &str,
        status: ReminderStatus,
    ) -> Result<Reminder, StoreError> {
        self.reminders.update_status(reminder_id, status)
    }

    /// Throw away the stored set and derive a new one as of now.
    pub fn refresh_reminders(&self) -> Result<Vec<Reminder>, StoreError> {
        self.reminders.regenerate()
    }

    /// Today/upcoming grouping plus status tallies, for the reminders screen.
    pub fn reminder_board(&self) -> Result<ReminderBoard, StoreError> {
        let reminders = self.reminders.list_all()?;
        Ok(build_board(&reminders, self.clock.now().date()))
    }
}

fn status_source(backfill: BackfillMode) -> Box<dyn StatusSource> {
    match backfill {
        BackfillMode::LastTaken => Box::new(LastTakenStatus),
        BackfillMode::Simulated {
            completed_probability,
        } => {
            tracing::warn!(
                completed_probability,
                "Simulated backfill enabled; elapsed reminder statuses are random"
            );
            Box::new(SimulatedStatus::from_entropy(completed_probability))
        }
    }
}
