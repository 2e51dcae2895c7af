//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Robot@Home dataset browser
#[derive(Parser, Debug)]
#[command(name = "rah")]
#[command(about = "Browse, check and fetch the Robot@Home dataset", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the unit folders (overrides $RAH_DATASET_ROOT and the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the catalogued units with their expected digest and size
    Units,

    /// Check that a unit folder exists and has the expected size
    Check {
        /// Unit key, e.g. chelmnts
        unit: String,
        /// Also compare the SHA-1 folder digest (reads every file)
        #[arg(long)]
        in_depth: bool,
    },

    /// Download a unit archive
    Fetch {
        unit: String,
        /// Destination directory (defaults to the dataset root)
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Print the category groups of the characterized-elements unit
    Categories,

    /// List home sessions and their rooms
    Homes {
        /// Dump the full loaded graph as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one room of the characterized-elements unit
    Room {
        /// Home session name, e.g. alma-s1
        home: String,
        room_id: String,
    },

    /// List the sensors of a raw room, resolving their kind
    Sensors {
        /// raw or lsrscan
        unit: String,
        session: String,
        room: String,
    },

    /// Print a laser scan
    Scan {
        unit: String,
        session: String,
        room: String,
        sensor_id: String,
    },

    /// Print the JSON schema of an export
    Schema {
        #[arg(value_enum, default_value_t = SchemaTarget::Homes)]
        target: SchemaTarget,
    },

    /// Show the effective configuration
    Config {
        /// Write it to ~/.rah/config.toml
        #[arg(long)]
        save: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaTarget {
    Homes,
    Raw,
    Integrity,
}
