use crate::types::{Coords, WorkoutId, WorkoutKind};
use chrono::{DateTime, Datelike, Utc};
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const ID_DIGITS: usize = 10;

/// Install the stderr `tracing` subscriber for the `workmap` binary.
///
/// Stdout stays reserved for workout output. Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
/// - `-q` => WARN
/// - `-qq` => ERROR
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn init_logging(verbose: u8, quiet: u8) {
    let net = i16::from(verbose) - i16::from(quiet);
    let level = match net {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,workmap={level}")));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

/// Last ten digits of the creation time in epoch milliseconds.
///
/// This is a timestamp, not a random id: two workouts created in the same
/// millisecond (or exactly 10^10 ms apart) collide.
pub fn workout_id_at(created_at: DateTime<Utc>) -> WorkoutId {
    let digits = created_at.timestamp_millis().unsigned_abs().to_string();
    let start = digits.len().saturating_sub(ID_DIGITS);
    WorkoutId::new(&digits[start..])
}

/// `"{Kind} on {Month} {day}"`, e.g. `"Running on April 14"`.
pub fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    let month = MONTHS[created_at.month0() as usize];
    format!("{} on {month} {}", kind.label(), created_at.day())
}

/// Minutes rendered as `HH:MM:SS`.
pub fn format_minutes(minutes: f64) -> String {
    // Saturating float-to-int cast; inputs are validated positive upstream.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let secs = (minutes * 60.0).round().max(0.0) as u64;
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Parse `"LAT,LNG"` as typed on the command line.
pub fn parse_lat_lng(s: &str) -> Option<(f64, f64)> {
    let (lat, lng) = s.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lng = lng.trim().parse::<f64>().ok()?;
    Coords::new(lat, lng).is_valid().then_some((lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn id_keeps_last_ten_digits() {
        let t = Utc.timestamp_millis_opt(1_713_087_000_123).single().unwrap();
        assert_eq!(workout_id_at(t).as_str(), "3087000123");
    }

    #[test]
    fn id_for_short_timestamps_is_untruncated() {
        let t = Utc.timestamp_millis_opt(42).single().unwrap();
        assert_eq!(workout_id_at(t).as_str(), "42");
    }

    #[test]
    fn same_millisecond_collides() {
        let t = Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap();
        assert_eq!(workout_id_at(t), workout_id_at(t));
    }

    #[test]
    fn describe_uses_month_name_and_day() {
        let t = Utc.with_ymd_and_hms(2023, 12, 3, 18, 0, 0).single().unwrap();
        assert_eq!(describe(WorkoutKind::Cycling, t), "Cycling on December 3");
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_minutes(24.0), "00:24:00");
        assert_eq!(format_minutes(95.5), "01:35:30");
    }

    #[test]
    fn parses_lat_lng() {
        assert_eq!(parse_lat_lng("51.5, -0.12"), Some((51.5, -0.12)));
        assert_eq!(parse_lat_lng("91,0"), None);
        assert_eq!(parse_lat_lng("abc"), None);
    }
}
