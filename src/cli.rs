use crate::types::Coords;
use crate::utils::parse_lat_lng;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_STORE: &str = "workmap.sqlite3";

#[derive(Parser, Debug)]
#[command(
    name = "workmap",
    about = "Log running and cycling workouts at points on a map"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,

    /// SQLite file holding the persisted workouts.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_STORE, global = true)]
    pub store: PathBuf,

    /// Current position as LAT,LNG; the map is centred here.
    #[arg(
        long,
        value_name = "LAT,LNG",
        value_parser = parse_coords,
        allow_hyphen_values = true,
        global = true
    )]
    pub at: Option<Coords>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a workout at a point
    Log {
        #[command(subcommand)]
        workout: LogCmd,
    },
    /// Print every workout in the order it was logged
    List,
    /// Centre the map on one workout
    Show {
        /// Workout id as printed by `list`
        id: String,
    },
    /// Delete every workout
    Reset,
    /// Print the persisted workouts as stored
    Export,
}

#[derive(Subcommand, Debug)]
pub enum LogCmd {
    Running {
        #[command(flatten)]
        common: CommonArgs,
        /// Steps per minute
        #[arg(long, allow_negative_numbers = true)]
        cadence: f64,
    },
    Cycling {
        #[command(flatten)]
        common: CommonArgs,
        /// Elevation gain in metres (may be negative)
        #[arg(long, allow_negative_numbers = true)]
        elevation: f64,
    },
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Latitude of the clicked point
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    /// Longitude of the clicked point
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
    /// Distance in kilometres
    #[arg(long, allow_negative_numbers = true)]
    pub distance: f64,
    /// Duration in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub duration: f64,
}

fn parse_coords(s: &str) -> Result<Coords, String> {
    parse_lat_lng(s)
        .map(Coords::from)
        .ok_or_else(|| format!("expected LAT,LNG within range, got {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_log_running() {
        let cli = Cli::try_parse_from([
            "workmap",
            "--at",
            "51.5,-0.12",
            "log",
            "running",
            "--lat",
            "51.5",
            "--lng",
            "-0.12",
            "--distance",
            "5",
            "--duration",
            "24",
            "--cadence",
            "178",
        ])
        .unwrap();

        assert_eq!(cli.at, Some(Coords::new(51.5, -0.12)));
        let Cmd::Log {
            workout: LogCmd::Running { common, cadence },
        } = cli.cmd
        else {
            panic!("expected log running");
        };
        assert_eq!(common.lng, -0.12);
        assert_eq!(common.distance, 5.0);
        assert_eq!(cadence, 178.0);
    }

    #[test]
    fn rejects_out_of_range_position() {
        assert!(Cli::try_parse_from(["workmap", "--at", "100,0", "list"]).is_err());
    }
}
