//! Error taxonomy shared by every loader in the workspace.
//!
//! All parse-time failures carry a [`Location`] (file path and 1-based line
//! number) so that a fixed-format mismatch can be traced back to the exact
//! record that caused it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::FeatureKind;

/// File path and 1-based line number of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: PathBuf,
    pub line: usize,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// The record kind a reader was expecting when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Categories,
    RoomHeader,
    Objects,
    RelationsHeader,
    Relations,
    ObservationsHeader,
    Observations,
    SensorIndex,
    LaserScan,
    Topology,
    GeometricMap,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Categories => "categories",
            Section::RoomHeader => "room header",
            Section::Objects => "object",
            Section::RelationsHeader => "relations header",
            Section::Relations => "relation",
            Section::ObservationsHeader => "observations header",
            Section::Observations => "observation",
            Section::SensorIndex => "sensor index",
            Section::LaserScan => "laser scan",
            Section::Topology => "topology",
            Section::GeometricMap => "geometric map",
        };
        f.write_str(name)
    }
}

/// Image channel a camera sensor may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Depth,
    Intensity,
}

impl Channel {
    /// Substring that identifies this channel inside a sensor file name.
    pub fn marker(self) -> &'static str {
        match self {
            Channel::Depth => "depth",
            Channel::Intensity => "intensity",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Every way loading a dataset unit can fail.
///
/// Failures are scoped to the unit being loaded: a loader that returns one
/// of these yields no partial graph.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("{location}: malformed category file: {details}")]
    MalformedCategoryFile { location: Location, details: String },

    #[error("{location}: truncated record, expected a {section} line")]
    TruncatedRecord { location: Location, section: Section },

    #[error("{location}: {section} line has {found} fields, expected {expected}")]
    FieldCountMismatch {
        location: Location,
        section: Section,
        expected: usize,
        found: usize,
    },

    #[error("{location}: {section} declares {declared} features per record, expected {expected}")]
    SchemaMismatch {
        location: Location,
        section: Section,
        expected: usize,
        declared: usize,
    },

    /// A section holds more detail lines than its header declared, so the
    /// next section header was not where the count said it would be.
    #[error("{location}: expected '{keyword}' after {declared} {section} lines")]
    SectionOverrun {
        location: Location,
        section: Section,
        declared: usize,
        keyword: &'static str,
    },

    #[error("{kind} features need {needed} tokens from index {start}, only {available} available")]
    InsufficientTokens {
        kind: FeatureKind,
        start: usize,
        needed: usize,
        available: usize,
    },

    #[error("{kind} feature {index} is not a number: '{value}'")]
    InvalidFeatureValue {
        kind: FeatureKind,
        index: usize,
        value: String,
    },

    #[error("{}: unresolved {parent} reference '{reference}'", path.display())]
    UnresolvedParentReference {
        parent: &'static str,
        reference: String,
        path: PathBuf,
    },

    #[error("sensor {sensor_id} has no {channel} file")]
    MissingChannelFile { sensor_id: String, channel: Channel },

    #[error("{location}: invalid {field} '{value}'")]
    InvalidField {
        location: Location,
        field: &'static str,
        value: String,
    },

    #[error("{location}: unexpected content after the last declared section")]
    TrailingRecords { location: Location },

    #[error("unknown dataset unit '{key}'")]
    UnknownUnit { key: String },

    #[error("unit '{key}' is not a {expected} unit")]
    UnsupportedUnit { key: String, expected: &'static str },

    #[error("download of {url} failed: {details}")]
    Download { url: String, details: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    /// Wrap an I/O failure together with the path that produced it.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Location of the offending record, when the failure has one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            DatasetError::MalformedCategoryFile { location, .. }
            | DatasetError::TruncatedRecord { location, .. }
            | DatasetError::FieldCountMismatch { location, .. }
            | DatasetError::SchemaMismatch { location, .. }
            | DatasetError::SectionOverrun { location, .. }
            | DatasetError::InvalidField { location, .. }
            | DatasetError::TrailingRecords { location } => Some(location),
            _ => None,
        }
    }
}
