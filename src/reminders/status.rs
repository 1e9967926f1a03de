//! Backfill status for "today" slots that were already in the past when
//! the reminder set was derived.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DEFAULT_SIMULATED_COMPLETION;
use crate::models::{Medication, ReminderStatus};

/// Decides completed vs missed for an elapsed slot.
///
/// Never returns `Pending`: an elapsed slot always carries an outcome.
pub trait StatusSource: Send {
    fn elapsed_status(&mut self, medication: &Medication, scheduled: NaiveDateTime)
        -> ReminderStatus;
}

/// Uses the medication's `last_taken` mark: a dose taken on the slot's day
/// at or after the slot counts as completed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LastTakenStatus;

impl StatusSource for LastTakenStatus {
    fn elapsed_status(
        &mut self,
        medication: &Medication,
        scheduled: NaiveDateTime,
    ) -> ReminderStatus {
        match medication.last_taken {
            Some(taken) if taken.date() == scheduled.date() && taken >= scheduled => {
                ReminderStatus::Completed
            }
            _ => ReminderStatus::Missed,
        }
    }
}

/// Random outcome with a fixed completion rate. Demo data only.
#[derive(Debug)]
pub struct SimulatedStatus<R: Rng = StdRng> {
    rng: R,
    completed_probability: f64,
}

impl SimulatedStatus<StdRng> {
    pub fn from_entropy(completed_probability: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), completed_probability)
    }

    pub fn seeded(seed: u64, completed_probability: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), completed_probability)
    }
}

impl<R: Rng> SimulatedStatus<R> {
    /// Out-of-range rates are clamped into `[0, 1]`; NaN falls back to
    /// the default rate.
    pub fn with_rng(rng: R, completed_probability: f64) -> Self {
        let completed_probability = if completed_probability.is_nan() {
            DEFAULT_SIMULATED_COMPLETION
        } else {
            completed_probability.clamp(0.0, 1.0)
        };
        Self {
            rng,
            completed_probability,
        }
    }
}

impl<R: Rng + Send> StatusSource for SimulatedStatus<R> {
    fn elapsed_status(&mut self, _: &Medication, _: NaiveDateTime) -> ReminderStatus {
        if self.rng.gen_bool(self.completed_probability) {
            ReminderStatus::Completed
        } else {
            ReminderStatus::Missed
        }
    }
}
