//! 2-D geometric maps unit.
//!
//! One folder per home; each file inside is a room map named
//! `<room>_<anything>` holding one `x y z` point per line.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use rah_types::{DatasetError, Section};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::reader::{file_name, sorted_entries, LineReader};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeometricRoom {
    pub name: String,
    pub points: Vec<Point3>,
}

impl GeometricRoom {
    /// Axis-aligned `(min, max)` corners, `None` for an empty map.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point3 { x: lo.x.min(p.x), y: lo.y.min(p.y), z: lo.z.min(p.z) },
                Point3 { x: hi.x.max(p.x), y: hi.y.max(p.y), z: hi.z.max(p.z) },
            )
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeometricHome {
    pub name: String,
    pub rooms: Vec<GeometricRoom>,
}

impl fmt::Display for GeometricHome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for room in &self.rooms {
            writeln!(f, "  {} ({} points)", room.name, room.points.len())?;
        }
        Ok(())
    }
}

/// Load every home under `root`.
///
/// The archive unpacks to `<unit>/<unit>/<home>/<room files>`; when `root`
/// holds a folder of its own name, homes are read from there.
pub fn load_geometric_maps(root: &Path) -> Result<Vec<GeometricHome>, DatasetError> {
    let nested = root.join(file_name(root));
    let base = if nested.is_dir() { nested.as_path() } else { root };

    let mut homes = Vec::new();
    for folder in sorted_entries(base)? {
        if !folder.is_dir() {
            warn!(path = %folder.display(), "skipping non-directory entry in geometric maps root");
            continue;
        }
        let mut rooms = Vec::new();
        for path in sorted_entries(&folder)? {
            if !path.is_file() {
                continue;
            }
            let name = file_name(&path)
                .split('_')
                .next()
                .unwrap_or_default()
                .to_string();
            let mut reader = LineReader::open(&path)?;
            let points = parse_points(&mut reader)?;
            rooms.push(GeometricRoom { name, points });
        }
        let name = file_name(&folder).to_string();
        debug!(home = %name, rooms = rooms.len(), "geometric map loaded");
        homes.push(GeometricHome { name, rooms });
    }
    info!(root = %base.display(), homes = homes.len(), "geometric maps loaded");
    Ok(homes)
}

/// Parse `x y z` lines until end of input, skipping blanks and comments.
pub fn parse_points<R: BufRead>(reader: &mut LineReader<R>) -> Result<Vec<Point3>, DatasetError> {
    let mut points = Vec::new();
    while let Some(record) = reader.next_data_record()? {
        if record.len() < 3 {
            return Err(DatasetError::FieldCountMismatch {
                location: record.location,
                section: Section::GeometricMap,
                expected: 3,
                found: record.tokens.len(),
            });
        }
        points.push(Point3 {
            x: record.parse(0, "x coordinate")?,
            y: record.parse(1, "y coordinate")?,
            z: record.parse(2, "z coordinate")?,
        });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<Vec<Point3>, DatasetError> {
        let mut reader = LineReader::new(Cursor::new(text.as_bytes().to_vec()), "kitchen_1.txt");
        parse_points(&mut reader)
    }

    #[test]
    fn points_parse_as_floats() {
        let pts = parse("0.5 -1 0\n\n2 3.25 0\n").unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[1], Point3 { x: 2.0, y: 3.25, z: 0.0 });
    }

    #[test]
    fn short_line_is_field_count_mismatch() {
        assert!(matches!(
            parse("1 2\n"),
            Err(DatasetError::FieldCountMismatch { section: Section::GeometricMap, found: 2, .. })
        ));
    }

    #[test]
    fn bounds_cover_all_points() {
        let room = GeometricRoom {
            name: "kitchen".into(),
            points: parse("0 0 0\n-1 4 0\n3 -2 1\n").unwrap(),
        };
        let (lo, hi) = room.bounds().unwrap();
        assert_eq!((lo.x, lo.y, lo.z), (-1.0, -2.0, 0.0));
        assert_eq!((hi.x, hi.y, hi.z), (3.0, 4.0, 1.0));
        assert!(GeometricRoom { name: "x".into(), points: vec![] }.bounds().is_none());
    }

    #[test]
    fn room_name_is_prefix_before_underscore() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("alma");
        std::fs::create_dir(&home).unwrap();
        std::fs::write(home.join("kitchen_1_map.txt"), "1 2 3\n").unwrap();
        std::fs::write(home.join("bathroom1_map.txt"), "").unwrap();

        let homes = load_geometric_maps(dir.path()).unwrap();
        assert_eq!(homes[0].name, "alma");
        let rooms: Vec<&str> = homes[0].rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(rooms, vec!["bathroom1", "kitchen"]);
        assert_eq!(homes[0].rooms[1].points.len(), 1);
    }

    #[test]
    fn archive_layout_nests_homes_under_unit_folder() {
        let dir = tempfile::tempdir().unwrap();
        let unit = dir.path().join("Robot@Home-dataset_2d_geometric_maps");
        let home = unit.join("Robot@Home-dataset_2d_geometric_maps").join("alma");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::write(home.join("kitchen_1.txt"), "0 0 0\n1 1 0\n").unwrap();

        let homes = load_geometric_maps(&unit).unwrap();
        assert_eq!(homes.len(), 1);
        assert_eq!(homes[0].name, "alma");
        assert_eq!(homes[0].rooms[0].name, "kitchen");
        assert_eq!(homes[0].rooms[0].points.len(), 2);
    }
}
