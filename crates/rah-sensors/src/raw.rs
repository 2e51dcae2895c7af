//! Raw-data hierarchy builder: home session → room → sensor descriptors.
//!
//! ```text
//! <root>/<prefix>-<home>-<session>/<home>-<session>/<room>.txt   index
//! <root>/<prefix>-<home>-<session>/<home>-<session>/<room>/      sensor files
//! ```
//!
//! Index lines are `id label x y z yaw pitch roll timestamp`; `#` lines are
//! comments. Sensor files are not listed here, see
//! [`SensorDescriptor::load_files`].

use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use rah_parser::reader::{file_name, sorted_entries, LineReader};
use rah_types::{DatasetError, Keyed, Section};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::descriptor::{SensorDescriptor, SensorPose};

const INDEX_TOKENS: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawHomeSession {
    /// `<home>-<session>`, e.g. `alma-s1`.
    pub name: String,
    pub rooms: Vec<RawRoom>,
}

impl RawHomeSession {
    pub fn room(&self, name: &str) -> Option<&RawRoom> {
        self.rooms.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawRoom {
    pub name: String,
    pub folder: PathBuf,
    pub sensors: Vec<SensorDescriptor>,
}

impl RawRoom {
    pub fn sensor(&self, id: &str) -> Option<&SensorDescriptor> {
        self.sensors.iter().find(|s| s.id == id)
    }
}

impl Keyed for RawHomeSession {
    type Key = String;
    fn key(&self) -> &String {
        &self.name
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Keyed for RawRoom {
    type Key = String;
    fn key(&self) -> &String {
        &self.name
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RawRoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} sensors)", self.name, self.sensors.len())?;
        for s in &self.sensors {
            writeln!(f, "  {s}")?;
        }
        Ok(())
    }
}

/// `alma-s1` out of `<anything>-alma-s1`.
fn session_folder(name: &str) -> Option<String> {
    let parts: Vec<&str> = name.split('-').collect();
    match parts.as_slice() {
        [.., home, session] => Some(format!("{home}-{session}")),
        _ => None,
    }
}

/// Load every home session under a raw-data unit `root`.
pub fn load_raw_data(root: &Path) -> Result<Vec<RawHomeSession>, DatasetError> {
    let mut sessions = Vec::new();
    for folder in sorted_entries(root)? {
        if !folder.is_dir() {
            continue;
        }
        let outer = file_name(&folder);
        let name = session_folder(outer).ok_or_else(|| DatasetError::UnresolvedParentReference {
            parent: "home session",
            reference: outer.to_string(),
            path: folder.clone(),
        })?;
        let session_dir = folder.join(&name);

        let mut rooms = Vec::new();
        for index in sorted_entries(&session_dir)? {
            if !index.is_file() || index.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            rooms.push(load_room_index(&index)?);
        }
        debug!(session = %name, rooms = rooms.len(), "raw home session loaded");
        sessions.push(RawHomeSession { name, rooms });
    }
    info!(
        root = %root.display(),
        sessions = sessions.len(),
        sensors = sessions
            .iter()
            .flat_map(|s| &s.rooms)
            .map(|r| r.sensors.len())
            .sum::<usize>(),
        "raw data loaded"
    );
    Ok(sessions)
}

/// Load one `<room>.txt` index; the room folder is its sibling `<room>/`.
pub fn load_room_index(path: &Path) -> Result<RawRoom, DatasetError> {
    let name = file_name(path).split('.').next().unwrap_or_default().to_string();
    let folder = path.with_file_name(&name);
    let mut reader = LineReader::open(path)?;
    let sensors = parse_index(&mut reader, &folder)?;
    Ok(RawRoom {
        name,
        folder,
        sensors,
    })
}

/// Parse index lines into descriptors rooted at `folder`.
pub fn parse_index<R: BufRead>(
    reader: &mut LineReader<R>,
    folder: &Path,
) -> Result<Vec<SensorDescriptor>, DatasetError> {
    let mut sensors = Vec::new();
    while let Some(record) = reader.next_data_record()? {
        if record.len() != INDEX_TOKENS {
            return Err(DatasetError::FieldCountMismatch {
                location: record.location,
                section: Section::SensorIndex,
                expected: INDEX_TOKENS,
                found: record.tokens.len(),
            });
        }
        let t = |i| record.token(i);
        sensors.push(SensorDescriptor::new(
            t(0),
            t(1),
            SensorPose::new(t(2), t(3), t(4), t(5), t(6), t(7)),
            t(8),
            folder,
        ));
    }
    Ok(sensors)
}
