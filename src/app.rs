//! Composition of the store, its persisted slot, and the render collaborators.
//!
//! Every event handler runs to completion before the next one: the store is
//! owned here and only mutated through `&mut self`.

use crate::codec;
use crate::error::{PositionUnavailable, WorkoutError};
use crate::storage::KeyValueStore;
use crate::store::WorkoutStore;
use crate::types::{ActivityInput, Coords, Workout, WorkoutId, WorkoutKind};
use anyhow::{Context, Result};

pub const STORAGE_KEY: &str = "workouts";
pub const MAP_ZOOM_LEVEL: u8 = 13;

const INVALID_INPUT_NOTICE: &str = "Inputs have to be positive numbers!";
const INVALID_COORDS_NOTICE: &str = "That point is not on the map";
const NO_LOCATION_NOTICE: &str = "Click on the map to choose where the workout happened";
const NO_POSITION_NOTICE: &str = "Could not get your position";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Running,
    Cycling,
}

impl MarkerStyle {
    pub const fn for_kind(kind: WorkoutKind) -> Self {
        match kind {
            WorkoutKind::Running => Self::Running,
            WorkoutKind::Cycling => Self::Cycling,
        }
    }

    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Running => "running-popup",
            Self::Cycling => "cycling-popup",
        }
    }
}

/// Map widget capability.
///
/// Clicks on the map are delivered by the host calling [`App::on_map_click`].
pub trait MapView {
    fn render(&mut self, center: Coords, zoom: u8);
    fn add_marker(&mut self, coords: Coords, popup: &str, style: MarkerStyle);
    fn pan_to(&mut self, coords: Coords, zoom: u8);
    fn clear_markers(&mut self);
}

/// Form, workout list and notices.
pub trait Sidebar {
    fn show_form(&mut self, at: Coords);
    fn hide_form(&mut self);
    fn render_workout(&mut self, workout: &Workout);
    fn clear_workouts(&mut self);
    fn notice(&mut self, message: &str);
}

/// Primitives submitted from the workout form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutForm {
    pub distance_km: f64,
    pub duration_min: f64,
    pub input: ActivityInput,
}

impl WorkoutForm {
    fn build(self, coords: Coords) -> Result<Workout, WorkoutError> {
        // Elevation may be negative but must still be a number.
        if let ActivityInput::Cycling { elevation_gain_m } = self.input {
            if !elevation_gain_m.is_finite() {
                return Err(WorkoutError::InvalidMetric {
                    field: "elevation",
                    value: elevation_gain_m,
                });
            }
        }
        Workout::new(coords, self.distance_km, self.duration_min, self.input)
    }
}

/// `"{icon} {description}"`, shown in the marker popup.
pub fn popup_content(workout: &Workout) -> String {
    format!("{} {}", workout.kind().icon(), workout.description())
}

pub struct App<K, M, S> {
    store: WorkoutStore,
    kv: K,
    map: M,
    sidebar: S,
    map_loaded: bool,
    pending: Option<Coords>,
}

impl<K: KeyValueStore, M: MapView, S: Sidebar> App<K, M, S> {
    /// Restore the store from `kv` and render the list.
    ///
    /// Corrupt persisted text is treated like a first run.
    pub fn new(kv: K, map: M, sidebar: S) -> Result<Self> {
        let text = kv.get(STORAGE_KEY)?;
        let store = match codec::deserialize(text.as_deref()) {
            Ok(decoded) => {
                if !decoded.skipped.is_empty() {
                    tracing::warn!(
                        skipped = decoded.skipped.len(),
                        kept = decoded.store.len(),
                        "some persisted workouts could not be restored"
                    );
                }
                decoded.store
            }
            Err(e) => {
                tracing::warn!(err = %e, "persisted workouts unreadable; starting empty");
                WorkoutStore::new()
            }
        };

        tracing::info!(workouts = store.len(), "workouts restored");

        let mut app = Self {
            store,
            kv,
            map,
            sidebar,
            map_loaded: false,
            pending: None,
        };
        for w in app.store.all() {
            app.sidebar.render_workout(w);
        }
        Ok(app)
    }

    /// Continuation of the initial position lookup.
    pub fn on_position(&mut self, position: Result<Coords, PositionUnavailable>) {
        let center = match position {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(err = %e, "map not loaded");
                self.sidebar.notice(NO_POSITION_NOTICE);
                return;
            }
        };

        crate::dlog!("map center={center} zoom={MAP_ZOOM_LEVEL}");
        self.map.render(center, MAP_ZOOM_LEVEL);
        self.map_loaded = true;

        for w in self.store.all() {
            self.map
                .add_marker(w.coords(), &popup_content(w), MarkerStyle::for_kind(w.kind()));
        }
    }

    pub fn on_map_click(&mut self, at: Coords) {
        self.pending = Some(at);
        self.sidebar.show_form(at);
    }

    /// Create a workout at the last clicked location, then render and persist.
    ///
    /// Invalid input shows a notice and leaves everything unchanged.
    pub fn submit(&mut self, form: WorkoutForm) -> Result<WorkoutId> {
        let Some(coords) = self.pending else {
            self.sidebar.notice(NO_LOCATION_NOTICE);
            return Err(WorkoutError::NoPendingLocation.into());
        };

        let workout = match form.build(coords) {
            Ok(w) => w,
            Err(e) => {
                if matches!(e, WorkoutError::InvalidCoords { .. }) {
                    self.sidebar.notice(INVALID_COORDS_NOTICE);
                } else if e.is_input_error() {
                    self.sidebar.notice(INVALID_INPUT_NOTICE);
                }
                return Err(e.into());
            }
        };

        // The store only changes once the new contents are persisted.
        let mut next = self.store.clone();
        next.append(workout.clone())?;
        self.persist(&next)?;
        self.store = next;
        tracing::info!(id = %workout.id(), kind = %workout.kind(), "workout logged");

        if self.map_loaded {
            self.map.add_marker(
                workout.coords(),
                &popup_content(&workout),
                MarkerStyle::for_kind(workout.kind()),
            );
        }
        self.sidebar.render_workout(&workout);
        self.sidebar.hide_form();
        self.pending = None;

        Ok(workout.id().clone())
    }

    /// Pan the map to a workout picked from the list.
    pub fn focus(&mut self, id: &WorkoutId) -> Result<&Workout, WorkoutError> {
        let workout = self
            .store
            .find_by_id(id)
            .ok_or_else(|| WorkoutError::NotFound(id.clone()))?;
        if self.map_loaded {
            self.map.pan_to(workout.coords(), MAP_ZOOM_LEVEL);
        }
        Ok(workout)
    }

    /// Open the map on one workout, centred on `at` when given.
    ///
    /// An unknown id fails before the map is touched.
    pub fn show(
        &mut self,
        id: &WorkoutId,
        at: Option<Coords>,
    ) -> Result<&Workout, WorkoutError> {
        let coords = self
            .store
            .find_by_id(id)
            .map(Workout::coords)
            .ok_or_else(|| WorkoutError::NotFound(id.clone()))?;
        if !self.map_loaded {
            self.on_position(Ok(at.unwrap_or(coords)));
        }
        self.focus(id)
    }

    /// Drop every workout, the persisted slot, and all rendered state.
    pub fn reset(&mut self) -> Result<()> {
        self.kv
            .remove(STORAGE_KEY)
            .context("Erasing persisted workouts")?;
        let cleared = self.store.len();
        self.store.clear();
        self.pending = None;
        self.map.clear_markers();
        self.sidebar.clear_workouts();
        tracing::info!(cleared, "workouts reset");
        Ok(())
    }

    fn persist(&mut self, store: &WorkoutStore) -> Result<()> {
        let text = codec::serialize(store).context("Encoding workouts")?;
        self.kv
            .set(STORAGE_KEY, &text)
            .context("Persisting workouts")?;
        crate::dlog!("persisted workouts={} bytes={}", store.len(), text.len());
        Ok(())
    }

    pub const fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub const fn is_map_loaded(&self) -> bool {
        self.map_loaded
    }

    pub const fn map(&self) -> &M {
        &self.map
    }

    pub const fn sidebar(&self) -> &S {
        &self.sidebar
    }

    pub fn into_parts(self) -> (WorkoutStore, K, M, S) {
        (self.store, self.kv, self.map, self.sidebar)
    }
}
