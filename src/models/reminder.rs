use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::ReminderStatus;

/// One derived (medication, time slot, date) occurrence.
///
/// `medication_id` is a lookup key only; `medication_name` is copied at
/// derivation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub medication_id: String,
    pub medication_name: String,
    pub scheduled_time: NaiveDateTime,
    pub status: ReminderStatus,
}
