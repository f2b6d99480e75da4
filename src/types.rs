use crate::error::WorkoutError;
use crate::utils::{describe, workout_id_at};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic point as (latitude, longitude). Persisted as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within the latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for Coords {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for (f64, f64) {
    fn from(c: Coords) -> Self {
        (c.lat, c.lng)
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// Identifier derived from the creation timestamp.
///
/// Not collision-free: two workouts created within the same millisecond share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant persisted in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }

    pub fn from_discriminant(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "cycling" => Some(Self::Cycling),
            _ => None,
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type-specific metric a user enters alongside distance and duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityInput {
    Running { cadence_spm: f64 },
    /// Elevation gain is not range checked; negative values are kept as entered.
    Cycling { elevation_gain_m: f64 },
}

impl ActivityInput {
    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Variant data together with the metric derived from it at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_kmh: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    description: String,
    activity: Activity,
}

impl Workout {
    pub fn new(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        input: ActivityInput,
    ) -> Result<Self, WorkoutError> {
        Self::new_at(Utc::now(), coords, distance_km, duration_min, input)
    }

    /// Build a workout as if created at `created_at`; the id and description follow from it.
    pub fn new_at(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        input: ActivityInput,
    ) -> Result<Self, WorkoutError> {
        Self::assemble(
            workout_id_at(created_at),
            created_at,
            coords,
            distance_km,
            duration_min,
            input,
            None,
        )
    }

    pub fn running(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Result<Self, WorkoutError> {
        Self::new(
            coords,
            distance_km,
            duration_min,
            ActivityInput::Running { cadence_spm },
        )
    }

    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, WorkoutError> {
        Self::new(
            coords,
            distance_km,
            duration_min,
            ActivityInput::Cycling { elevation_gain_m },
        )
    }

    /// Rebuild a workout from persisted fields, re-validating and re-deriving metrics.
    /// A missing or blank description is regenerated from kind and creation time.
    pub(crate) fn restore(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        input: ActivityInput,
        description: Option<String>,
    ) -> Result<Self, WorkoutError> {
        Self::assemble(
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            input,
            description.filter(|d| !d.trim().is_empty()),
        )
    }

    fn assemble(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        input: ActivityInput,
        description: Option<String>,
    ) -> Result<Self, WorkoutError> {
        if !coords.is_valid() {
            return Err(WorkoutError::InvalidCoords {
                lat: coords.lat,
                lng: coords.lng,
            });
        }
        let distance_km = positive("distance", distance_km)?;
        let duration_min = positive("duration", duration_min)?;

        let activity = match input {
            ActivityInput::Running { cadence_spm } => Activity::Running {
                cadence_spm: positive("cadence", cadence_spm)?,
                pace_min_per_km: duration_min / distance_km,
            },
            ActivityInput::Cycling { elevation_gain_m } => Activity::Cycling {
                elevation_gain_m,
                speed_kmh: distance_km / (duration_min / 60.0),
            },
        };

        let description = description.unwrap_or_else(|| describe(input.kind(), created_at));

        Ok(Self {
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            description,
            activity,
        })
    }

    pub const fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub const fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self.activity {
            Activity::Running { .. } => WorkoutKind::Running,
            Activity::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub const fn pace_min_per_km(&self) -> Option<f64> {
        match self.activity {
            Activity::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            Activity::Cycling { .. } => None,
        }
    }

    pub const fn speed_kmh(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { speed_kmh, .. } => Some(speed_kmh),
            Activity::Running { .. } => None,
        }
    }

    pub const fn cadence_spm(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { cadence_spm, .. } => Some(cadence_spm),
            Activity::Cycling { .. } => None,
        }
    }

    pub const fn elevation_gain_m(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling {
                elevation_gain_m, ..
            } => Some(elevation_gain_m),
            Activity::Running { .. } => None,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, WorkoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(WorkoutError::InvalidMetric { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const LONDON: Coords = Coords::new(51.5, -0.12);

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap()
    }

    #[test]
    fn running_derives_pace() {
        let w = Workout::running(LONDON, 5.0, 24.0, 178.0).unwrap();
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert!((w.pace_min_per_km().unwrap() - 4.8).abs() < 1e-12);
        assert_eq!(w.speed_kmh(), None);
        assert_eq!(w.cadence_spm(), Some(178.0));
        assert!(w.description().contains("Running"));
    }

    #[test]
    fn cycling_derives_speed() {
        let w = Workout::cycling(LONDON, 20.0, 95.0, 0.0).unwrap();
        assert_eq!(w.kind(), WorkoutKind::Cycling);
        let speed = w.speed_kmh().unwrap();
        assert!((speed - 20.0 / (95.0 / 60.0)).abs() < 1e-12);
        assert!((speed - 12.63).abs() < 0.01);
        assert_eq!(w.pace_min_per_km(), None);
    }

    #[test]
    fn rejects_non_positive_or_non_finite_metrics() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Workout::running(LONDON, bad, 24.0, 178.0),
                Err(WorkoutError::InvalidMetric {
                    field: "distance",
                    ..
                })
            ));
            assert!(matches!(
                Workout::cycling(LONDON, 20.0, bad, 10.0),
                Err(WorkoutError::InvalidMetric {
                    field: "duration",
                    ..
                })
            ));
            assert!(matches!(
                Workout::running(LONDON, 5.0, 24.0, bad),
                Err(WorkoutError::InvalidMetric { field: "cadence", .. })
            ));
        }
    }

    #[test]
    fn derived_metrics_hold_across_generated_inputs() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..5_000 {
            let coords = Coords::new(rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..=180.0));
            let distance = rng.gen_range(0.001..1_000.0);
            let duration = rng.gen_range(0.001..6_000.0);

            let run = Workout::running(coords, distance, duration, rng.gen_range(1.0..250.0))
                .unwrap();
            assert_eq!(run.pace_min_per_km(), Some(duration / distance));
            assert!(run.description().contains("Running"));

            let ride = Workout::cycling(coords, distance, duration, rng.gen_range(-500.0..3_000.0))
                .unwrap();
            assert_eq!(ride.speed_kmh(), Some(distance / (duration / 60.0)));
            assert!(ride.description().contains("Cycling"));
        }
    }

    #[test]
    fn rejects_non_finite_or_out_of_range_coords() {
        for (lat, lng) in [
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 0.0),
            (0.0, f64::NEG_INFINITY),
            (90.5, 0.0),
            (-91.0, 0.0),
            (0.0, 180.1),
            (0.0, -200.0),
        ] {
            assert!(matches!(
                Workout::running(Coords::new(lat, lng), 5.0, 24.0, 178.0),
                Err(WorkoutError::InvalidCoords { .. })
            ));
        }
        assert!(Workout::cycling(Coords::new(-90.0, 180.0), 5.0, 24.0, 0.0).is_ok());
    }

    #[test]
    fn cycling_accepts_negative_elevation() {
        let w = Workout::cycling(LONDON, 30.0, 60.0, -120.0).unwrap();
        assert_eq!(w.elevation_gain_m(), Some(-120.0));
    }

    #[test]
    fn id_and_description_follow_creation_time() {
        // 2024-04-14T09:30:00.123Z
        let created = at(1_713_087_000_123);
        let w = Workout::new_at(
            created,
            LONDON,
            10.0,
            50.0,
            ActivityInput::Running { cadence_spm: 170.0 },
        )
        .unwrap();
        assert_eq!(w.id().as_str(), "3087000123");
        assert_eq!(w.created_at(), created);
        assert_eq!(w.description(), "Running on April 14");
    }

    #[test]
    fn restore_regenerates_blank_description() {
        let w = Workout::restore(
            WorkoutId::new("1"),
            at(1_704_067_200_000),
            LONDON,
            12.0,
            40.0,
            ActivityInput::Cycling {
                elevation_gain_m: 80.0,
            },
            Some("  ".into()),
        )
        .unwrap();
        assert_eq!(w.description(), "Cycling on January 1");
    }

    #[test]
    fn coords_serialize_as_pair() {
        let json = serde_json::to_string(&LONDON).unwrap();
        assert_eq!(json, "[51.5,-0.12]");
        let back: Coords = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LONDON);
    }
}
