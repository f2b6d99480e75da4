use crate::types::WorkoutId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkoutError {
    #[error("invalid {field}: {value} (must be a finite number greater than zero)")]
    InvalidMetric { field: &'static str, value: f64 },
    #[error("invalid coordinates: {lat},{lng} (latitude must be within ±90, longitude within ±180)")]
    InvalidCoords { lat: f64, lng: f64 },
    #[error("no workout with id {0}")]
    NotFound(WorkoutId),
    #[error("persisted workouts are corrupt: {0}")]
    CorruptPersistedState(#[from] serde_json::Error),
    #[error("unrecognized workout type: {0:?}")]
    UnrecognizedVariant(String),
    #[error("malformed workout record: {0}")]
    MalformedRecord(String),
    #[error("duplicate workout id {0}")]
    DuplicateId(WorkoutId),
    #[error("no location selected on the map")]
    NoPendingLocation,
}

impl WorkoutError {
    /// Whether the error stems from user input rather than stored state.
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidMetric { .. } | Self::InvalidCoords { .. } | Self::NoPendingLocation)
    }
}

/// Failure continuation of the initial position lookup.
#[derive(Error, Debug, Clone)]
#[error("position unavailable: {0}")]
pub struct PositionUnavailable(pub String);
