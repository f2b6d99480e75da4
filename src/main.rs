#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Stdout};
use workmap::app::{App, STORAGE_KEY, WorkoutForm};
use workmap::cli::{self, Cmd, CommonArgs, LogCmd};
use workmap::storage::{KeyValueStore, SqliteStore};
use workmap::term::{TermMap, TermSidebar, list_item};
use workmap::types::{ActivityInput, Coords, WorkoutId};
use workmap::{dlog, utils};

type TermApp = App<SqliteStore, TermMap<Stdout>, TermSidebar<Stdout>>;

fn open_app(kv: SqliteStore, show_list: bool) -> Result<TermApp> {
    App::new(
        kv,
        TermMap::new(io::stdout()),
        TermSidebar::new(io::stdout()).with_list(show_list),
    )
}

fn form_from(workout: LogCmd) -> (Coords, WorkoutForm) {
    let (common, input) = match workout {
        LogCmd::Running { common, cadence } => (
            common,
            ActivityInput::Running {
                cadence_spm: cadence,
            },
        ),
        LogCmd::Cycling { common, elevation } => (
            common,
            ActivityInput::Cycling {
                elevation_gain_m: elevation,
            },
        ),
    };
    let CommonArgs {
        lat,
        lng,
        distance,
        duration,
    } = common;

    (
        Coords::new(lat, lng),
        WorkoutForm {
            distance_km: distance,
            duration_min: duration,
            input,
        },
    )
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let kv = SqliteStore::open(&cli.store)?;
    dlog!("store={}", cli.store.display());

    match cli.cmd {
        Cmd::Log { workout } => {
            let mut app = open_app(kv, false)?;
            if let Some(at) = cli.at {
                app.on_position(Ok(at));
            }

            let (click, form) = form_from(workout);
            app.on_map_click(click);
            let id = app.submit(form)?;

            let logged = app
                .store()
                .find_by_id(&id)
                .with_context(|| format!("workout {id} missing after submit"))?;
            println!("{}", list_item(logged));
            Ok(())
        }
        Cmd::List => {
            let mut app = open_app(kv, true)?;
            if let Some(at) = cli.at {
                app.on_position(Ok(at));
            }
            if app.store().is_empty() {
                println!("No workouts logged yet.");
            }
            Ok(())
        }
        Cmd::Show { id } => {
            let id = WorkoutId::new(id);
            let mut app = open_app(kv, false)?;
            let workout = app.show(&id, cli.at)?;
            println!("{}", list_item(workout));
            Ok(())
        }
        Cmd::Reset => {
            let mut app = open_app(kv, false)?;
            let cleared = app.store().len();
            app.reset()?;
            println!("Cleared {cleared} workouts.");
            Ok(())
        }
        Cmd::Export => {
            let text = kv.get(STORAGE_KEY)?;
            println!("{}", text.as_deref().unwrap_or("[]"));
            Ok(())
        }
    }
}
