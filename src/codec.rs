//! Flat JSON encoding of the workout store.
//!
//! The persisted form is an array of plain records. Variant information only
//! survives as the `type` string, so decoding branches on it and rebuilds a
//! typed [`Workout`], re-deriving pace or speed along the way.

use crate::error::WorkoutError;
use crate::store::WorkoutStore;
use crate::types::{ActivityInput, Coords, Workout, WorkoutId, WorkoutKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutRecord {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cadence_spm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elevation_gain_m: Option<f64>,
}

impl From<&Workout> for WorkoutRecord {
    fn from(w: &Workout) -> Self {
        Self {
            id: w.id().clone(),
            created_at: w.created_at(),
            coords: w.coords(),
            distance_km: w.distance_km(),
            duration_min: w.duration_min(),
            description: Some(w.description().to_string()),
            kind: w.kind().as_str().to_string(),
            cadence_spm: w.cadence_spm(),
            elevation_gain_m: w.elevation_gain_m(),
        }
    }
}

impl WorkoutRecord {
    fn into_workout(self, kind: WorkoutKind) -> Result<Workout, WorkoutError> {
        let input = match kind {
            WorkoutKind::Running => ActivityInput::Running {
                cadence_spm: self.cadence_spm.ok_or_else(|| {
                    WorkoutError::MalformedRecord(format!("running {} has no cadenceSpm", self.id))
                })?,
            },
            WorkoutKind::Cycling => ActivityInput::Cycling {
                elevation_gain_m: self.elevation_gain_m.ok_or_else(|| {
                    WorkoutError::MalformedRecord(format!(
                        "cycling {} has no elevationGainM",
                        self.id
                    ))
                })?,
            },
        };

        Workout::restore(
            self.id,
            self.created_at,
            self.coords,
            self.distance_km,
            self.duration_min,
            input,
            self.description,
        )
    }
}

/// A persisted record that could not be turned back into a workout.
#[derive(Debug)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: WorkoutError,
}

/// Result of decoding persisted text: the rebuilt store plus what was dropped.
#[derive(Debug, Default)]
pub struct Decoded {
    pub store: WorkoutStore,
    pub skipped: Vec<SkippedRecord>,
}

pub fn serialize(store: &WorkoutStore) -> Result<String, serde_json::Error> {
    let records: Vec<WorkoutRecord> = store.all().iter().map(WorkoutRecord::from).collect();
    serde_json::to_string(&records)
}

/// Rebuild a store from persisted text.
///
/// Absent, blank, or `null` text is a first run and yields an empty store.
/// Text that is not a JSON array of objects is [`WorkoutError::CorruptPersistedState`].
/// Individual records with an unknown `type`, missing fields, invalid metrics,
/// or a repeated id are skipped and reported in [`Decoded::skipped`].
pub fn deserialize(text: Option<&str>) -> Result<Decoded, WorkoutError> {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return Ok(Decoded::default());
    };

    let records: Option<Vec<JsonValue>> = serde_json::from_str(text)?;
    let records = records.unwrap_or_default();

    let mut decoded = Decoded::default();
    for (index, value) in records.into_iter().enumerate() {
        let outcome = decode_record(value).and_then(|w| decoded.store.append(w));
        if let Err(reason) = outcome {
            tracing::warn!(index, %reason, "skipping persisted workout");
            decoded.skipped.push(SkippedRecord { index, reason });
        }
    }

    crate::dlog!(
        "decoded workouts={} skipped={}",
        decoded.store.len(),
        decoded.skipped.len()
    );

    Ok(decoded)
}

fn decode_record(value: JsonValue) -> Result<Workout, WorkoutError> {
    let kind = match value.get("type").and_then(JsonValue::as_str) {
        Some(s) => WorkoutKind::from_discriminant(s)
            .ok_or_else(|| WorkoutError::UnrecognizedVariant(s.to_string()))?,
        None => {
            return Err(WorkoutError::MalformedRecord(
                "record has no string `type`".to_string(),
            ));
        }
    };

    let record: WorkoutRecord = serde_json::from_value(value)
        .map_err(|e| WorkoutError::MalformedRecord(e.to_string()))?;

    record.into_workout(kind)
}
