//! Derivation run: expand medications into today + tomorrow reminders.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::status::StatusSource;
use crate::models::{parse_time_slot, Medication, Reminder, ReminderStatus};

/// Expand `medications` into the two-day reminder window around `now`.
///
/// Per medication, all of today's slots come first, then all of
/// tomorrow's, each in the order of `times`. Ids are "1", "2", ... in
/// production order. Today's slots strictly before `now` take their status
/// from `source`; every other reminder starts `Pending`.
pub fn derive_reminders(
    medications: &[Medication],
    now: NaiveDateTime,
    source: &mut dyn StatusSource,
) -> Vec<Reminder> {
    let today = now.date();
    let tomorrow = today.succ_opt();
    let mut reminders = Vec::new();

    for medication in medications {
        let slots = valid_slots(medication);

        for &slot in &slots {
            let scheduled = today.and_time(slot);
            let status = if scheduled < now {
                source.elapsed_status(medication, scheduled)
            } else {
                ReminderStatus::Pending
            };
            push_reminder(&mut reminders, medication, scheduled, status);
        }

        if let Some(tomorrow) = tomorrow {
            for &slot in &slots {
                push_reminder(
                    &mut reminders,
                    medication,
                    tomorrow.and_time(slot),
                    ReminderStatus::Pending,
                );
            }
        }
    }

    reminders
}

/// Calendar date a reminder falls on.
pub fn reminder_date(reminder: &Reminder) -> NaiveDate {
    reminder.scheduled_time.date()
}

fn valid_slots(medication: &Medication) -> Vec<NaiveTime> {
    medication
        .times
        .iter()
        .filter_map(|raw| {
            let slot = parse_time_slot(raw);
            if slot.is_none() {
                tracing::warn!(
                    medication_id = %medication.id,
                    time = %raw,
                    "Skipping malformed time slot"
                );
            }
            slot
        })
        .collect()
}

fn push_reminder(
    reminders: &mut Vec<Reminder>,
    medication: &Medication,
    scheduled_time: NaiveDateTime,
    status: ReminderStatus,
) {
    reminders.push(Reminder {
        id: (reminders.len() + 1).to_string(),
        medication_id: medication.id.clone(),
        medication_name: medication.name.clone(),
        scheduled_time,
        status,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed_medications;
    use crate::models::Frequency;
    use crate::reminders::status::{LastTakenStatus, SimulatedStatus};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    fn med(id: &str, times: &[&str]) -> Medication {
        Medication {
            id: id.into(),
            name: format!("Med {id}"),
            dosage: "1mg".into(),
            frequency: Frequency::Daily,
            times: times.iter().map(|t| t.to_string()).collect(),
            notes: None,
            prescription_image: None,
            last_taken: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn count_is_twice_the_slot_total() {
        let meds = seed_medications(at(6, 0));
        let mut source = SimulatedStatus::seeded(1, 0.7);
        let reminders = derive_reminders(&meds, at(12, 0), &mut source);
        assert_eq!(reminders.len(), 2 * 6);
    }

    #[test]
    fn empty_medication_set_yields_nothing() {
        let reminders = derive_reminders(&[], at(12, 0), &mut LastTakenStatus);
        assert!(reminders.is_empty());
    }

    #[test]
    fn morning_and_evening_at_nine() {
        let meds = vec![med("1", &["08:00", "20:00"])];
        let mut source = SimulatedStatus::seeded(9, 0.7);
        let r = derive_reminders(&meds, at(9, 0), &mut source);

        assert_eq!(r.len(), 4);
        assert_eq!(r[0].scheduled_time, at(8, 0));
        assert!(matches!(
            r[0].status,
            ReminderStatus::Completed | ReminderStatus::Missed
        ));
        assert_eq!(r[1].scheduled_time, at(20, 0));
        assert_eq!(r[1].status, ReminderStatus::Pending);

        let tomorrow = day().succ_opt().unwrap();
        assert_eq!(r[2].scheduled_time, tomorrow.and_hms_opt(8, 0, 0).unwrap());
        assert_eq!(r[3].scheduled_time, tomorrow.and_hms_opt(20, 0, 0).unwrap());
        assert!(r[2..].iter().all(|x| x.status == ReminderStatus::Pending));
    }

    #[test]
    fn slot_equal_to_now_is_pending() {
        let meds = vec![med("1", &["09:00"])];
        let r = derive_reminders(&meds, at(9, 0), &mut LastTakenStatus);
        assert_eq!(r[0].status, ReminderStatus::Pending);
    }

    #[test]
    fn elapsed_today_never_pending_future_always_pending() {
        let meds = seed_medications(at(6, 0));
        let now = at(13, 30);
        let mut source = SimulatedStatus::seeded(5, 0.5);
        let r = derive_reminders(&meds, now, &mut source);

        for reminder in &r {
            let is_today = reminder_date(reminder) == day();
            if is_today && reminder.scheduled_time <= now {
                assert_ne!(reminder.status, ReminderStatus::Pending, "{reminder:?}");
            } else {
                assert_eq!(reminder.status, ReminderStatus::Pending, "{reminder:?}");
            }
        }
    }

    #[test]
    fn ids_sequential_and_today_block_first_per_medication() {
        let meds = vec![med("a", &["08:00", "12:00"]), med("b", &["10:00"])];
        let r = derive_reminders(&meds, at(6, 0), &mut LastTakenStatus);

        let ids: Vec<_> = r.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);

        let order: Vec<_> = r
            .iter()
            .map(|x| (x.medication_id.as_str(), reminder_date(x) == day()))
            .collect();
        assert_eq!(
            order,
            [
                ("a", true),
                ("a", true),
                ("a", false),
                ("a", false),
                ("b", true),
                ("b", false)
            ]
        );
    }

    #[test]
    fn times_keep_entry_order_and_duplicates() {
        let meds = vec![med("1", &["20:00", "08:00", "08:00"])];
        let r = derive_reminders(&meds, at(6, 0), &mut LastTakenStatus);
        let hours: Vec<_> = r[..3]
            .iter()
            .map(|x| x.scheduled_time.format("%H:%M").to_string())
            .collect();
        assert_eq!(hours, ["20:00", "08:00", "08:00"]);
    }

    #[test]
    fn malformed_slot_is_skipped() {
        let meds = vec![med("1", &["08:00", "late"])];
        let r = derive_reminders(&meds, at(6, 0), &mut LastTakenStatus);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn name_is_copied_from_medication() {
        let meds = vec![med("7", &["08:00"])];
        let r = derive_reminders(&meds, at(6, 0), &mut LastTakenStatus);
        assert!(r.iter().all(|x| x.medication_name == "Med 7" && x.medication_id == "7"));
    }

    #[test]
    fn last_taken_backfill_marks_taken_slot_completed() {
        let mut m = med("1", &["08:00", "13:00"]);
        m.last_taken = Some(at(8, 20));
        let r = derive_reminders(&[m], at(14, 0), &mut LastTakenStatus);
        assert_eq!(r[0].status, ReminderStatus::Completed);
        assert_eq!(r[1].status, ReminderStatus::Missed);
    }
}
