//! `rah-parser` – fixed-format text loaders for the Robot@Home units.
//!
//! Every loader reads a unit's directory tree to completion and returns an
//! owned graph, or the first [`DatasetError`][rah_types::DatasetError] it
//! meets. There is no partial result.
//!
//! # Modules
//!
//! - [`reader`] – [`LineReader`][reader::LineReader]: whitespace-tokenized
//!   records with file/line locations and minimum token-count checks.
//! - [`extract`] – [`extract`][extract::extract]: slices a fixed-arity
//!   feature vector out of a record.
//! - [`categories`] – [`CategoryRegistry`][categories::CategoryRegistry]:
//!   id ↔ name tables for homes, room types and object types.
//! - [`elements`] – the characterized-elements hierarchy builder driving
//!   the count-header protocol room by room.
//! - [`topology`] – room adjacency per home.
//! - [`geomap`] – per-room 2-D geometric point maps.

pub mod categories;
pub mod elements;
pub mod extract;
pub mod geomap;
pub mod reader;
pub mod topology;

pub use categories::{CategoryGroup, CategoryRegistry};
pub use elements::{load_characterized_elements, load_room_file, parse_room, CATEGORIES_FILE};
pub use geomap::{load_geometric_maps, GeometricHome, GeometricRoom, Point3};
pub use reader::{LineReader, Record};
pub use topology::{load_topologies, HomeTopology, TopoRelation};
