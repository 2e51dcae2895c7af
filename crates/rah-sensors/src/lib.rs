//! `rah-sensors` – raw-data unit: per-room sensor descriptors and the
//! files behind them.
//!
//! # Modules
//!
//! - [`raw`] – [`load_raw_data`][raw::load_raw_data]: builds
//!   [`RawHomeSession`][raw::RawHomeSession] → [`RawRoom`][raw::RawRoom] →
//!   [`SensorDescriptor`][descriptor::SensorDescriptor] from room index files.
//! - [`descriptor`] – lazy, cached sensor kind resolution and the
//!   [`SensorAccess`][descriptor::SensorAccess] capability surface (generic,
//!   camera, laser scanner).
//! - [`scan`] – [`LaserScan`][scan::LaserScan] file reader.
//!
//! Resolution state lives in a `OnceCell`, so descriptors are `!Sync`.
//! Wrap them in a mutex to share across threads.

pub mod descriptor;
pub mod raw;
pub mod scan;

pub use descriptor::{
    resolve, CameraSensor, LaserScanner, Resolution, SensorAccess, SensorDescriptor, SensorKind,
    SensorPose,
};
pub use raw::{load_raw_data, load_room_index, RawHomeSession, RawRoom};
pub use scan::{load_laser_scan, LaserScan};
