//! Homes-topologies unit: room adjacency per home.
//!
//! One `<home>.txt` per home in the unit root, each non-blank line a
//! `<room1>-<room2>` pair.

use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;
use std::path::Path;

use rah_types::{DatasetError, Section};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::reader::{file_name, sorted_entries, LineReader};

/// Two adjacent rooms of a home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TopoRelation {
    pub room1: String,
    pub room2: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HomeTopology {
    pub name: String,
    pub relations: Vec<TopoRelation>,
}

impl HomeTopology {
    /// Rooms adjacent to `room`, in either direction.
    pub fn neighbours<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.relations.iter().filter_map(move |r| {
            if r.room1 == room {
                Some(r.room2.as_str())
            } else if r.room2 == room {
                Some(r.room1.as_str())
            } else {
                None
            }
        })
    }

    /// `room1 → room2` map; a room listed twice keeps its last peer.
    pub fn as_map(&self) -> BTreeMap<&str, &str> {
        self.relations
            .iter()
            .map(|r| (r.room1.as_str(), r.room2.as_str()))
            .collect()
    }
}

impl fmt::Display for HomeTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for r in &self.relations {
            writeln!(f, "  {} - {}", r.room1, r.room2)?;
        }
        Ok(())
    }
}

/// Load every `*.txt` topology under `root`, ordered by home name.
pub fn load_topologies(root: &Path) -> Result<Vec<HomeTopology>, DatasetError> {
    let mut homes = Vec::new();
    for path in sorted_entries(root)? {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let name = file_name(&path)
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        let mut reader = LineReader::open(&path)?;
        let relations = parse_topology(&mut reader)?;
        debug!(home = %name, relations = relations.len(), "topology loaded");
        homes.push(HomeTopology { name, relations });
    }
    info!(root = %root.display(), homes = homes.len(), "home topologies loaded");
    Ok(homes)
}

/// Parse `<room1>-<room2>` lines until end of input.
pub fn parse_topology<R: BufRead>(
    reader: &mut LineReader<R>,
) -> Result<Vec<TopoRelation>, DatasetError> {
    let mut relations = Vec::new();
    while let Some((location, line)) = reader.next_nonblank_line()? {
        let parts: Vec<&str> = line.split('-').map(str::trim).collect();
        if parts.len() < 2 {
            return Err(DatasetError::FieldCountMismatch {
                location,
                section: Section::Topology,
                expected: 2,
                found: parts.len(),
            });
        }
        relations.push(TopoRelation {
            room1: parts[0].to_string(),
            room2: parts[1].to_string(),
        });
    }
    Ok(relations)
}
