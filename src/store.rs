use crate::error::WorkoutError;
use crate::types::{Workout, WorkoutId};

/// Insertion-ordered collection of workouts with unique ids.
#[derive(Debug, Clone, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects a workout whose id is already present; the store is left unchanged.
    pub fn append(&mut self, workout: Workout) -> Result<(), WorkoutError> {
        if self.find_by_id(workout.id()).is_some() {
            return Err(WorkoutError::DuplicateId(workout.id().clone()));
        }
        self.workouts.push(workout);
        Ok(())
    }

    pub fn find_by_id(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityInput, Coords};
    use chrono::{TimeZone, Utc};

    fn workout(ms: i64, distance_km: f64) -> Workout {
        let t = Utc.timestamp_millis_opt(ms).single().unwrap();
        Workout::new_at(
            t,
            Coords::new(48.1, -1.6),
            distance_km,
            30.0,
            ActivityInput::Running { cadence_spm: 165.0 },
        )
        .unwrap()
    }

    #[test]
    fn keeps_insertion_order() {
        let mut store = WorkoutStore::new();
        store.append(workout(3_000, 12.0)).unwrap();
        store.append(workout(1_000, 3.0)).unwrap();
        store.append(workout(2_000, 7.0)).unwrap();

        let ids: Vec<&str> = store.all().iter().map(|w| w.id().as_str()).collect();
        assert_eq!(ids, ["3000", "1000", "2000"]);
    }

    #[test]
    fn find_by_id_distinguishes_missing() {
        let mut store = WorkoutStore::new();
        store.append(workout(5_000, 4.0)).unwrap();

        assert!(store.find_by_id(&WorkoutId::new("5000")).is_some());
        assert!(store.find_by_id(&WorkoutId::new("nope")).is_none());
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut store = WorkoutStore::new();
        store.append(workout(9_000, 4.0)).unwrap();
        let err = store.append(workout(9_000, 8.0)).unwrap_err();
        assert!(matches!(err, WorkoutError::DuplicateId(ref id) if id.as_str() == "9000"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].distance_km(), 4.0);
    }

    #[test]
    fn clear_empties() {
        let mut store = WorkoutStore::new();
        store.append(workout(1, 1.0)).unwrap();
        store.append(workout(2, 2.0)).unwrap();
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }
}
