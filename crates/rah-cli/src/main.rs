//! `rah` – Robot@Home dataset command line.
//!
//! Resolves the dataset root (`--root`, then `$RAH_DATASET_ROOT`, then
//! `~/.rah/config.toml`, then the current directory), builds the unit
//! catalog under it and runs one subcommand.

mod cli;
mod config;
mod http;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use rah_dataset::{
    check_integrity, fetch_unit, human_size, init_tracing, Dataset, IntegrityReport, LocalProbe,
};
use rah_sensors::{RawHomeSession, SensorAccess};
use rah_types::{DatasetError, HomeSession};
use tracing::debug;

use crate::cli::{Cli, Commands, SchemaTarget};
use crate::config::Config;
use crate::http::HttpDownloader;

fn main() -> ExitCode {
    let args = Cli::parse();

    let cfg = match config::resolve() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {}", "Config error".red(), e);
            eprintln!("  Using default configuration.");
            let mut cfg = Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    };
    init_tracing(cfg.log_format);

    let root = args.root.clone().unwrap_or_else(|| cfg.dataset_root.clone());
    debug!(root = %root.display(), "dataset root resolved");
    let dataset = Dataset::new(cfg.dataset_name.clone(), root);

    match run(args.command, &dataset, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, dataset: &Dataset, cfg: &Config) -> Result<(), String> {
    match command {
        Commands::Units => {
            print!("{dataset}");
            Ok(())
        }
        Commands::Check { unit, in_depth } => {
            let unit = find_unit(dataset, &unit)?;
            let report = check_integrity(unit, &LocalProbe, in_depth).map_err(err)?;
            print_report(&report);
            if report.is_ok() {
                Ok(())
            } else {
                Err(format!("unit '{}' failed its integrity check", report.unit))
            }
        }
        Commands::Fetch { unit, dest } => {
            let unit = find_unit(dataset, &unit)?;
            let dest = dest.unwrap_or_else(|| dataset.root().to_path_buf());
            println!(
                "  Downloading {} ({}) …",
                unit.name.bold(),
                human_size(unit.expected_size)
            );
            let path = fetch_unit(unit, &HttpDownloader::new(), &dest).map_err(err)?;
            println!("  {} {}", "✓ saved to".green(), path.display());
            Ok(())
        }
        Commands::Categories => {
            let registry = dataset.load_categories().map_err(err)?;
            for group in registry.groups() {
                let title = format!("{} ({})", group.name(), group.len());
                println!("{}\n{}", title.bold(), "-".repeat(title.chars().count()));
                for (id, name) in group.entries() {
                    println!("  {id:>3}  {name}");
                }
                println!();
            }
            println!("{} {}", "Homes:".bold(), registry.home_names().join(", "));
            Ok(())
        }
        Commands::Homes { json } => {
            let elements = dataset.load_characterized_elements().map_err(err)?;
            if json {
                let out = serde_json::to_string_pretty(&elements.sessions)
                    .map_err(|e| format!("Failed to serialize homes: {e}"))?;
                println!("{out}");
            } else {
                print_sessions(&elements.sessions);
            }
            Ok(())
        }
        Commands::Room { home, room_id } => {
            let elements = dataset.load_characterized_elements().map_err(err)?;
            let session = elements
                .session(&home)
                .ok_or_else(|| format!("no home session named '{home}'"))?;
            let room = session
                .room(&room_id)
                .ok_or_else(|| format!("home session '{home}' has no room '{room_id}'"))?;
            println!("{}", room.to_string().bold());
            println!("{}", "Objects".underline());
            for object in &room.objects {
                println!("  {object}");
            }
            println!("{}", "Relations".underline());
            for relation in &room.relations {
                println!("  {relation}");
            }
            println!("{}", "Observations".underline());
            for observation in &room.observations {
                println!("  {observation}");
            }
            Ok(())
        }
        Commands::Sensors {
            unit,
            session,
            room,
        } => {
            let sessions = dataset.load_raw_data(&unit).map_err(err)?;
            let room = raw_room(&sessions, &session, &room)?;
            println!("{} ({} sensors)", room.name.bold(), room.sensors.len());
            for sensor in &room.sensors {
                match sensor.access() {
                    Ok(_) => println!("  {sensor}"),
                    Err(e) => println!("  {} {} ({e})", sensor.id.yellow(), sensor.name),
                }
            }
            Ok(())
        }
        Commands::Scan {
            unit,
            session,
            room,
            sensor_id,
        } => {
            let sessions = dataset.load_raw_data(&unit).map_err(err)?;
            let room = raw_room(&sessions, &session, &room)?;
            let sensor = room
                .sensor(&sensor_id)
                .ok_or_else(|| format!("room '{}' has no sensor '{sensor_id}'", room.name))?;
            match sensor.access().map_err(err)? {
                SensorAccess::LaserScanner(laser) => {
                    let scan = laser.laser_scan().map_err(err)?;
                    println!("{} {}", sensor.name.bold(), laser.scan_file().display());
                    println!("  {scan}");
                    Ok(())
                }
                other => Err(format!(
                    "sensor '{sensor_id}' is a {} sensor, not a laser scanner",
                    other.kind()
                )),
            }
        }
        Commands::Schema { target } => {
            let schema = match target {
                SchemaTarget::Homes => schemars::schema_for!(Vec<HomeSession>),
                SchemaTarget::Raw => schemars::schema_for!(Vec<RawHomeSession>),
                SchemaTarget::Integrity => schemars::schema_for!(IntegrityReport),
            };
            let out = serde_json::to_string_pretty(&schema)
                .map_err(|e| format!("Failed to serialize schema: {e}"))?;
            println!("{out}");
            Ok(())
        }
        Commands::Config { save } => {
            println!("  config file   = {}", config::config_path().display());
            println!("  dataset_root  = {}", cfg.dataset_root.display());
            println!("  dataset_name  = {}", cfg.dataset_name);
            println!("  log_format    = {}", cfg.log_format);
            if save {
                config::save(cfg)?;
                println!("  {}", "✓ saved".green());
            }
            Ok(())
        }
    }
}

fn err(e: DatasetError) -> String {
    e.to_string()
}

fn find_unit<'a>(dataset: &'a Dataset, key: &str) -> Result<&'a rah_dataset::DatasetUnit, String> {
    dataset.unit(key).ok_or_else(|| {
        let keys: Vec<&str> = dataset.units().iter().map(|u| u.key.as_str()).collect();
        format!("unknown unit '{key}' (expected one of: {})", keys.join(", "))
    })
}

fn raw_room<'a>(
    sessions: &'a [RawHomeSession],
    session: &str,
    room: &str,
) -> Result<&'a rah_sensors::RawRoom, String> {
    sessions
        .iter()
        .find(|s| s.name == session)
        .ok_or_else(|| format!("no raw home session named '{session}'"))?
        .room(room)
        .ok_or_else(|| format!("session '{session}' has no room '{room}'"))
}

fn print_report(report: &IntegrityReport) {
    let flag = |ok: bool| if ok { "yes".green() } else { "no".red() };
    println!("Checking      : {}", report.unit.bold());
    println!("folder exists : {}", flag(report.folder_exists));
    if let Some(actual) = report.actual_size {
        println!(
            "expected size : {} bytes ({})",
            report.expected_size,
            human_size(report.expected_size)
        );
        println!("counted       : {} bytes ({})", actual, human_size(actual));
        println!("correct size  : {}", flag(report.size_matches()));
    }
    if let (Some(actual), Some(ok)) = (&report.actual_hash, report.hash_matches()) {
        println!("expected hash : {}", report.expected_hash);
        println!("computed hash : {actual}");
        println!("correct hash  : {}", flag(ok));
    }
}

fn print_sessions(sessions: &[HomeSession]) {
    for session in sessions {
        println!(
            "{} {} ({} rooms, {} objects)",
            session.id.to_string().cyan(),
            session.name.bold(),
            session.rooms.len(),
            session.object_count()
        );
        for room in &session.rooms {
            println!(
                "    {:>4}  {:<16} {} objects, {} relations, {} observations",
                room.id,
                room.name,
                room.objects.len(),
                room.relations.len(),
                room.observations.len()
            );
        }
    }
    println!(
        "\n{} home sessions, {} relations",
        sessions.len(),
        rah_types::model::relation_count(sessions)
    );
}
