//! Hierarchical entity graph of the characterized-elements unit.
//!
//! `HomeSession` → `Room` → (`ObjectRecord`, `ObjectRelation`, `Observation`).
//! Every value is plain owned data and immutable once a loader returns it.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;

/// One recorded visit to a home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HomeSession {
    pub id: u32,
    /// Session name as listed in the category file, e.g. `alma-s1`.
    pub name: String,
    pub rooms: Vec<Room>,
}

impl HomeSession {
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn object_count(&self) -> usize {
        self.rooms.iter().map(|r| r.objects.len()).sum()
    }
}

impl fmt::Display for HomeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, ({} rooms)", self.id, self.name, self.rooms.len())
    }
}

/// A captured space inside a home session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Room {
    /// Identifier exactly as written in the source file.
    pub id: String,
    /// Room files carry no name of their own; this is the room-type name.
    pub name: String,
    pub type_id: u32,
    pub type_name: String,
    pub home_id: u32,
    pub objects: Vec<ObjectRecord>,
    pub relations: Vec<ObjectRelation>,
    pub observations: Vec<Observation>,
}

impl Room {
    pub fn object(&self, id: u32) -> Option<&ObjectRecord> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Relations in which `object_id` takes part, on either side.
    pub fn relations_of(&self, object_id: u32) -> impl Iterator<Item = &ObjectRelation> + '_ {
        self.relations
            .iter()
            .filter(move |r| r.obj1_id == object_id || r.obj2_id == object_id)
    }

    /// Observations whose object list references `object_id`.
    pub fn observations_of(&self, object_id: u32) -> impl Iterator<Item = &Observation> + '_ {
        self.observations
            .iter()
            .filter(move |o| o.objects_id.contains(&object_id))
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, ({} objects), ({} relations), ({} observations)",
            self.id,
            self.name,
            self.type_id,
            self.type_name,
            self.home_id,
            self.objects.len(),
            self.relations.len(),
            self.observations.len()
        )
    }
}

/// A segmented object with its 32-slot descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectRecord {
    pub id: u32,
    pub name: String,
    pub type_id: u32,
    pub type_name: String,
    pub room_id: String,
    pub features: FeatureVector,
}

impl fmt::Display for ObjectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, ({} features)",
            self.id,
            self.name,
            self.type_id,
            self.type_name,
            self.room_id,
            self.features.len()
        )
    }
}

/// A directed pair of objects with an 11-slot relation descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectRelation {
    pub id: String,
    pub obj1_id: u32,
    pub obj1_name: String,
    pub obj1_type: String,
    pub obj2_id: u32,
    pub obj2_name: String,
    pub obj2_type: String,
    pub features: FeatureVector,
}

impl ObjectRelation {
    /// The other end of the relation, if `object_id` is one of its ends.
    pub fn peer_of(&self, object_id: u32) -> Option<u32> {
        if self.obj1_id == object_id {
            Some(self.obj2_id)
        } else if self.obj2_id == object_id {
            Some(self.obj1_id)
        } else {
            None
        }
    }
}

impl fmt::Display for ObjectRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, ({}, {}, {})-({}, {}, {}), ({}) features",
            self.id,
            self.obj1_name,
            self.obj1_id,
            self.obj1_type,
            self.obj2_name,
            self.obj2_id,
            self.obj2_type,
            self.features.len()
        )
    }
}

/// A single sensor capture referencing the objects visible in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Observation {
    pub id: String,
    pub sensor_name: String,
    pub objects_id: Vec<u32>,
    pub features: FeatureVector,
    pub scan_features: FeatureVector,
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, ({} objects), ({} features), ({} scan features)",
            self.id,
            self.sensor_name,
            self.objects_id.len(),
            self.features.len(),
            self.scan_features.len()
        )
    }
}

/// Sum relations across a slice; handy for unit-level summaries.
pub fn relation_count(sessions: &[HomeSession]) -> usize {
    sessions
        .iter()
        .flat_map(|s| &s.rooms)
        .map(|r| r.relations.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureKind;

    fn fv(kind: FeatureKind) -> FeatureVector {
        FeatureVector::from_values(kind, vec![0.0; kind.arity()]).unwrap()
    }

    fn room() -> Room {
        Room {
            id: "12".to_string(),
            name: "bathroom".to_string(),
            type_id: 7,
            type_name: "bathroom".to_string(),
            home_id: 3,
            objects: vec![ObjectRecord {
                id: 17,
                name: "chair".to_string(),
                type_id: 3,
                type_name: "5".to_string(),
                room_id: "12".to_string(),
                features: fv(FeatureKind::Object),
            }],
            relations: vec![ObjectRelation {
                id: "0".to_string(),
                obj1_id: 17,
                obj1_name: "chair".to_string(),
                obj1_type: "3".to_string(),
                obj2_id: 18,
                obj2_name: "table".to_string(),
                obj2_type: "4".to_string(),
                features: fv(FeatureKind::Relation),
            }],
            observations: vec![Observation {
                id: "5".to_string(),
                sensor_name: "RGBD_1".to_string(),
                objects_id: vec![17],
                features: fv(FeatureKind::Observation),
                scan_features: fv(FeatureKind::ObservationScan),
            }],
        }
    }

    #[test]
    fn room_queries_follow_object_references() {
        let r = room();
        assert_eq!(r.object(17).map(|o| o.name.as_str()), Some("chair"));
        assert_eq!(r.relations_of(18).count(), 1);
        assert_eq!(r.relations_of(99).count(), 0);
        assert_eq!(r.observations_of(17).count(), 1);
        assert_eq!(r.relations[0].peer_of(18), Some(17));
    }

    #[test]
    fn room_display_reports_section_sizes() {
        let s = room().to_string();
        assert!(s.contains("(1 objects), (1 relations), (1 observations)"), "{s}");
    }

    #[test]
    fn session_serializes_to_json() {
        let session = HomeSession {
            id: 3,
            name: "alma-s1".to_string(),
            rooms: vec![room()],
        };
        let json = serde_json::to_string(&session).unwrap();
        let back: HomeSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
        assert_eq!(relation_count(&[back]), 1);
    }
}
