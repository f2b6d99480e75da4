use crate::app::{MapView, MarkerStyle, Sidebar};
use crate::types::{Activity, Coords, Workout};
use crate::utils::format_minutes;
use std::io::Write;

/// One line per workout, as shown in the list.
pub fn list_item(w: &Workout) -> String {
    let base = format!(
        "{id}\t{icon} {desc}\t{dist} km\t{dur} min ({clock})",
        id = w.id(),
        icon = w.kind().icon(),
        desc = w.description(),
        dist = w.distance_km(),
        dur = w.duration_min(),
        clock = format_minutes(w.duration_min()),
    );
    match *w.activity() {
        Activity::Running {
            cadence_spm,
            pace_min_per_km,
        } => format!("{base}\t⚡️ {pace_min_per_km:.1} min/km\t🦶🏼 {cadence_spm} spm"),
        Activity::Cycling {
            elevation_gain_m,
            speed_kmh,
        } => format!("{base}\t⚡️ {speed_kmh:.1} km/h\t⛰ {elevation_gain_m} m"),
    }
}

fn emit<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{line}") {
        tracing::warn!(err = %e, "writing to terminal failed");
    }
}

/// Prints map activity as plain text. Nothing is printed until the map is rendered.
pub struct TermMap<W: Write> {
    out: W,
    rendered: bool,
}

impl<W: Write> TermMap<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
            rendered: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MapView for TermMap<W> {
    fn render(&mut self, center: Coords, zoom: u8) {
        self.rendered = true;
        emit(&mut self.out, &format!("map\tcentre {center} zoom {zoom}"));
    }

    fn add_marker(&mut self, coords: Coords, popup: &str, style: MarkerStyle) {
        emit(
            &mut self.out,
            &format!("marker\t{coords}\t{popup}\t[{}]", style.class_name()),
        );
    }

    fn pan_to(&mut self, coords: Coords, zoom: u8) {
        emit(&mut self.out, &format!("map\tpan {coords} zoom {zoom}"));
    }

    fn clear_markers(&mut self) {
        if self.rendered {
            emit(&mut self.out, "map\tmarkers cleared");
        }
    }
}

/// Prints notices and, unless disabled, the workout list.
pub struct TermSidebar<W: Write> {
    out: W,
    show_list: bool,
}

impl<W: Write> TermSidebar<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
            show_list: true,
        }
    }

    #[must_use]
    pub fn with_list(mut self, show_list: bool) -> Self {
        self.show_list = show_list;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sidebar for TermSidebar<W> {
    fn show_form(&mut self, at: Coords) {
        crate::dlog!("form opened at={at}");
    }

    fn hide_form(&mut self) {
        crate::dlog!("form closed");
    }

    fn render_workout(&mut self, workout: &Workout) {
        if self.show_list {
            emit(&mut self.out, &list_item(workout));
        }
    }

    fn clear_workouts(&mut self) {
        if self.show_list {
            emit(&mut self.out, "list\tcleared");
        }
    }

    fn notice(&mut self, message: &str) {
        emit(&mut self.out, &format!("notice\t{message}"));
    }
}
