//! `rah-dataset` – the Robot@Home unit catalog and everything that acts on
//! whole units.
//!
//! # Modules
//!
//! - [`catalog`] – the ten published units ([`UNITS`][catalog::UNITS]) with
//!   url, folder, expected SHA-1 digest and size.
//! - [`dataset`] – [`Dataset`][dataset::Dataset]: the catalog rooted at a
//!   local directory, with one loader per parseable unit.
//! - [`integrity`] – [`check_integrity`][integrity::check_integrity] over a
//!   pluggable [`UnitProbe`][integrity::UnitProbe].
//! - [`download`] – the [`Downloader`][download::Downloader] collaborator.
//! - [`size`] – decimal human-readable byte counts.
//! - [`telemetry`] – `tracing` subscriber set-up.

pub mod catalog;
pub mod dataset;
pub mod download;
pub mod integrity;
pub mod size;
pub mod telemetry;

pub use catalog::{DatasetUnit, UnitLayout, UnitSpec, UNITS};
pub use dataset::{CharacterizedElements, Dataset, DEFAULT_NAME};
pub use download::{fetch_unit, Downloader};
pub use integrity::{check_integrity, IntegrityReport, LocalProbe, UnitProbe};
pub use size::human_size;
pub use telemetry::{init_tracing, LogFormat};
