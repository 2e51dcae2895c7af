//! `rah-types` – shared vocabulary of the Robot@Home loaders.
//!
//! # Modules
//!
//! - [`model`] – the characterized-elements entity graph:
//!   [`HomeSession`] → [`Room`] → ([`ObjectRecord`], [`ObjectRelation`],
//!   [`Observation`]).
//! - [`features`] – [`FeatureKind`] layouts and the fixed-arity
//!   [`FeatureVector`] with positional and named-segment access.
//! - [`keyed`] – [`Keyed`] plus `by_id` / `by_name` helpers over slices.
//! - [`error`] – [`DatasetError`], the load-time failure taxonomy, with the
//!   [`Location`] and [`Section`] of the offending record.

pub mod error;
pub mod features;
pub mod keyed;
pub mod model;

pub use error::{Channel, DatasetError, Location, Section};
pub use features::{FeatureKind, FeatureVector, Segment, SegmentValue};
pub use keyed::{by_id, by_name, ids, index_by_id, names, obj1_ids, obj2_ids, Keyed};
pub use model::{HomeSession, ObjectRecord, ObjectRelation, Observation, Room};
