use chrono::NaiveDateTime;

use crate::models::{Frequency, Medication};

const LISINOPRIL_IMAGE: &str = "https://images.pexels.com/photos/593451/pexels-photo-593451.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2";

/// Default medication set written on first run.
///
/// `now` becomes Lisinopril's `last_taken`, so a fresh install shows one
/// medication as already taken today.
pub fn seed_medications(now: NaiveDateTime) -> Vec<Medication> {
    vec![
        Medication {
            id: "1".into(),
            name: "Lisinopril".into(),
            dosage: "10mg".into(),
            frequency: Frequency::Daily,
            times: vec!["08:00".into(), "20:00".into()],
            notes: Some("Take with food.".into()),
            prescription_image: Some(LISINOPRIL_IMAGE.into()),
            last_taken: Some(now),
            created_at: None,
            updated_at: None,
        },
        Medication {
            id: "2".into(),
            name: "Atorvastatin".into(),
            dosage: "20mg".into(),
            frequency: Frequency::Daily,
            times: vec!["21:00".into()],
            notes: Some("Take in the evening.".into()),
            prescription_image: None,
            last_taken: None,
            created_at: None,
            updated_at: None,
        },
        Medication {
            id: "3".into(),
            name: "Metformin".into(),
            dosage: "500mg".into(),
            frequency: Frequency::Daily,
            times: vec!["08:00".into(), "13:00".into(), "19:00".into()],
            notes: Some("Take with meals.".into()),
            prescription_image: None,
            last_taken: None,
            created_at: None,
            updated_at: None,
        },
    ]
}
