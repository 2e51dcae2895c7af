//! Characterized-elements hierarchy builder.
//!
//! Each room file is a fixed sequence of count-headed sections:
//!
//! ```text
//! Home <home> <home-id> Room_type <type-name> <type-id> ID <room-id> N_objects <n> N_objectFeatures 32
//! <n object lines>
//! N_relations <n> N_relationFeatures 11
//! <n relation lines>
//! N_observations <n> N_roomFeatures 48 N_scanFeatures 9
//! <n observation lines>
//! ```
//!
//! A header's count fixes exactly how many detail lines follow. Any count,
//! width or arity mismatch aborts the whole unit load.

use std::io::BufRead;
use std::path::Path;

use rah_types::{
    DatasetError, FeatureKind, HomeSession, ObjectRecord, ObjectRelation, Observation, Room,
    Section,
};
use tracing::{debug, info, warn};

use crate::categories::{unresolved, CategoryRegistry};
use crate::reader::{file_name, sorted_entries, LineReader, Record};

/// Name of the categories file at the root of the unit.
pub const CATEGORIES_FILE: &str = "types.txt";

// Room header positions.
const HEADER_HOME_ID: usize = 2;
const HEADER_TYPE_NAME: usize = 4;
const HEADER_TYPE_ID: usize = 5;
const HEADER_ROOM_ID: usize = 7;
const HEADER_OBJECT_COUNT: usize = 9;
const HEADER_OBJECT_ARITY: usize = 11;

// Object line prefix: name, id, type name, type id.
const OBJECT_NAME: usize = 0;
const OBJECT_ID: usize = 1;
const OBJECT_TYPE_NAME: usize = 2;
const OBJECT_TYPE_ID: usize = 3;
const OBJECT_PREFIX: usize = 4;

const RELATIONS_KEYWORD: &str = "N_relations";
const OBSERVATIONS_KEYWORD: &str = "N_observations";

const RELATION_PREFIX: usize = 7;
const OBSERVATION_PREFIX: usize = 3;

/// Load every home session under `root`.
///
/// Each sub-folder of `root` is a home session whose name must appear in
/// the registry's home group; every file inside is one room.
///
/// # Errors
///
/// [`DatasetError::UnresolvedParentReference`] for a folder the registry
/// does not know, plus any parse error of [`parse_room`].
pub fn load_characterized_elements(
    root: &Path,
    registry: &CategoryRegistry,
) -> Result<Vec<HomeSession>, DatasetError> {
    let homes = registry.home_sessions();
    let mut sessions = Vec::new();

    for folder in sorted_entries(root)? {
        if !folder.is_dir() {
            continue;
        }
        let name = file_name(&folder).to_string();
        let id = homes
            .and_then(|g| g.id_of(&name))
            .ok_or_else(|| unresolved("home session", &name, &folder))?;

        let mut rooms = Vec::new();
        for room_file in sorted_entries(&folder)? {
            if !room_file.is_file() {
                warn!(path = %room_file.display(), "skipping non-file entry in home folder");
                continue;
            }
            rooms.push(load_room_file(&room_file, id)?);
        }
        debug!(home = %name, rooms = rooms.len(), "home session loaded");
        sessions.push(HomeSession { id, name, rooms });
    }

    if let Some(group) = homes {
        for (id, name) in group.entries() {
            if !sessions.iter().any(|s| s.id == *id) {
                warn!(home = %name, id, "home session listed in categories has no folder");
            }
        }
    }
    sessions.sort_by_key(|s| s.id);

    info!(
        root = %root.display(),
        sessions = sessions.len(),
        rooms = sessions.iter().map(|s| s.rooms.len()).sum::<usize>(),
        "characterized elements loaded"
    );
    Ok(sessions)
}

/// Parse a single room file belonging to home `home_id`.
pub fn load_room_file(path: &Path, home_id: u32) -> Result<Room, DatasetError> {
    let mut reader = LineReader::open(path)?;
    parse_room(&mut reader, home_id)
}

/// Parse one room from `reader`, consuming the whole input.
pub fn parse_room<R: BufRead>(
    reader: &mut LineReader<R>,
    home_id: u32,
) -> Result<Room, DatasetError> {
    let header = reader.read_record(HEADER_OBJECT_ARITY + 1, Section::RoomHeader)?;
    let declared_home: u32 = header.parse(HEADER_HOME_ID, "home id")?;
    if declared_home != home_id {
        warn!(
            location = %header.location,
            declared_home,
            home_id,
            "room header home id differs from its folder's category id"
        );
    }
    let room_id = header.token(HEADER_ROOM_ID).to_string();
    let type_name = header.token(HEADER_TYPE_NAME).to_string();
    let type_id: u32 = header.parse(HEADER_TYPE_ID, "room type id")?;
    let object_count: usize = header.parse(HEADER_OBJECT_COUNT, "object count")?;
    check_arity(&header, HEADER_OBJECT_ARITY, FeatureKind::Object, Section::RoomHeader)?;

    let objects = (0..object_count)
        .map(|_| read_object(reader, &room_id))
        .collect::<Result<Vec<_>, _>>()?;

    let relations_header = reader.read_record(4, Section::RelationsHeader)?;
    expect_keyword(&relations_header, RELATIONS_KEYWORD, Section::Objects, object_count)?;
    let relation_count: usize = relations_header.parse(1, "relation count")?;
    check_arity(&relations_header, 3, FeatureKind::Relation, Section::RelationsHeader)?;
    let relations = (0..relation_count)
        .map(|_| read_relation(reader))
        .collect::<Result<Vec<_>, _>>()?;

    let observations_header = reader.read_record(6, Section::ObservationsHeader)?;
    expect_keyword(
        &observations_header,
        OBSERVATIONS_KEYWORD,
        Section::Relations,
        relation_count,
    )?;
    let observation_count: usize = observations_header.parse(1, "observation count")?;
    check_arity(
        &observations_header,
        3,
        FeatureKind::Observation,
        Section::ObservationsHeader,
    )?;
    check_arity(
        &observations_header,
        5,
        FeatureKind::ObservationScan,
        Section::ObservationsHeader,
    )?;
    let observations = (0..observation_count)
        .map(|_| read_observation(reader))
        .collect::<Result<Vec<_>, _>>()?;

    reader.expect_end()?;

    debug!(
        path = %reader.path().display(),
        room = %room_id,
        objects = objects.len(),
        relations = relations.len(),
        observations = observations.len(),
        "room parsed"
    );

    Ok(Room {
        id: room_id,
        name: type_name.clone(),
        type_id,
        type_name,
        home_id,
        objects,
        relations,
        observations,
    })
}

// A declared arity is verified against the layout, never trusted.
fn check_arity(
    record: &Record,
    index: usize,
    kind: FeatureKind,
    section: Section,
) -> Result<(), DatasetError> {
    let declared: usize = record.parse(index, "feature arity")?;
    if declared != kind.arity() {
        return Err(DatasetError::SchemaMismatch {
            location: record.location.clone(),
            section,
            expected: kind.arity(),
            declared,
        });
    }
    Ok(())
}

// A section header must sit right after the previous section's declared
// lines; anything else means that count was too small.
fn expect_keyword(
    record: &Record,
    keyword: &'static str,
    previous: Section,
    declared: usize,
) -> Result<(), DatasetError> {
    if record.token(0) == keyword {
        return Ok(());
    }
    Err(DatasetError::SectionOverrun {
        location: record.location.clone(),
        section: previous,
        declared,
        keyword,
    })
}

fn read_object<R: BufRead>(
    reader: &mut LineReader<R>,
    room_id: &str,
) -> Result<ObjectRecord, DatasetError> {
    let line = reader.read_record(
        OBJECT_PREFIX + FeatureKind::Object.arity(),
        Section::Objects,
    )?;
    Ok(ObjectRecord {
        id: line.parse(OBJECT_ID, "object id")?,
        name: line.token(OBJECT_NAME).to_string(),
        type_id: line.parse(OBJECT_TYPE_ID, "object type id")?,
        type_name: line.token(OBJECT_TYPE_NAME).to_string(),
        room_id: room_id.to_string(),
        features: line.features(OBJECT_PREFIX, FeatureKind::Object)?,
    })
}

fn read_relation<R: BufRead>(reader: &mut LineReader<R>) -> Result<ObjectRelation, DatasetError> {
    let line = reader.read_record(
        RELATION_PREFIX + FeatureKind::Relation.arity(),
        Section::Relations,
    )?;
    Ok(ObjectRelation {
        id: line.token(2).to_string(),
        obj1_id: line.parse(3, "relation object id")?,
        obj1_name: line.token(0).to_string(),
        obj1_type: line.token(5).to_string(),
        obj2_id: line.parse(4, "relation object id")?,
        obj2_name: line.token(1).to_string(),
        obj2_type: line.token(6).to_string(),
        features: line.features(RELATION_PREFIX, FeatureKind::Relation)?,
    })
}

// The only section whose width depends on data: token 2 counts the object
// ids that precede the two feature blocks.
fn read_observation<R: BufRead>(reader: &mut LineReader<R>) -> Result<Observation, DatasetError> {
    let line = reader.read_record(OBSERVATION_PREFIX, Section::Observations)?;
    let object_count: usize = line.parse(2, "observed object count")?;

    let features_start = OBSERVATION_PREFIX + object_count;
    let scan_start = features_start + FeatureKind::Observation.arity();
    let required = scan_start + FeatureKind::ObservationScan.arity();
    if line.len() < required {
        return Err(DatasetError::FieldCountMismatch {
            location: line.location.clone(),
            section: Section::Observations,
            expected: required,
            found: line.len(),
        });
    }

    let objects_id = (OBSERVATION_PREFIX..features_start)
        .map(|i| line.parse(i, "observed object id"))
        .collect::<Result<Vec<u32>, _>>()?;

    Ok(Observation {
        id: line.token(1).to_string(),
        sensor_name: line.token(0).to_string(),
        objects_id,
        features: line.features(features_start, FeatureKind::Observation)?,
        scan_features: line.features(scan_start, FeatureKind::ObservationScan)?,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// `n` numeric tokens joined by spaces.
    pub fn values(n: usize, seed: usize) -> String {
        (0..n)
            .map(|i| format!("{}.25", seed + i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn object_line(label: &str, id: u32, type_name: &str, type_id: u32) -> String {
        format!("{label} {id} {type_name} {type_id} {}", values(32, 0))
    }

    pub fn relation_line(id: u32, a: u32, b: u32) -> String {
        format!("obj{a} obj{b} {id} {a} {b} 3 5 {}", values(11, 100))
    }

    pub fn observation_line(sensor: &str, id: u32, objects: &[u32]) -> String {
        let ids: Vec<String> = objects.iter().map(u32::to_string).collect();
        let mut line = format!("{sensor} {id} {}", objects.len());
        if !ids.is_empty() {
            line.push(' ');
            line.push_str(&ids.join(" "));
        }
        format!("{line} {} {}", values(48, 200), values(9, 300))
    }

    /// Room file of Scenario A: 2 objects, 1 relation, 1 observation.
    pub fn scenario_a() -> String {
        [
            "Home alma 3 Room_type bathroom 7 ID 12 N_objects 2 N_objectFeatures 32".to_string(),
            object_line("chair", 17, "5", 3),
            object_line("table", 18, "6", 4),
            "N_relations 1 N_relationFeatures 11".to_string(),
            relation_line(0, 17, 18),
            "N_observations 1 N_roomFeatures 48 N_scanFeatures 9".to_string(),
            observation_line("RGBD_1", 40, &[17, 18]),
        ]
        .join("\n")
            + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<Room, DatasetError> {
        let mut reader = LineReader::new(Cursor::new(text.as_bytes().to_vec()), "bathroom1.txt");
        parse_room(&mut reader, 3)
    }

    #[test]
    fn scenario_a_builds_full_room() {
        let room = parse(&scenario_a()).unwrap();
        assert_eq!(room.id, "12");
        assert_eq!(room.name, "bathroom");
        assert_eq!(room.type_id, 7);
        assert_eq!(room.home_id, 3);
        assert_eq!(room.objects.len(), 2);
        assert_eq!(room.relations.len(), 1);
        assert_eq!(room.observations.len(), 1);
        assert_eq!(room.observations[0].objects_id, vec![17, 18]);
        assert!(room.objects.iter().all(|o| o.room_id == "12"));
    }

    #[test]
    fn object_type_id_comes_from_token_three() {
        let room = parse(&scenario_a()).unwrap();
        let chair = &room.objects[0];
        assert_eq!(chair.id, 17);
        assert_eq!(chair.name, "chair");
        assert_eq!(chair.type_id, 3);
        assert_eq!(chair.type_name, "5");
        assert_eq!(chair.features[0], 0.25);
    }

    #[test]
    fn relation_fields_follow_line_order() {
        let room = parse(&scenario_a()).unwrap();
        let rel = &room.relations[0];
        assert_eq!(rel.id, "0");
        assert_eq!((rel.obj1_id, rel.obj2_id), (17, 18));
        assert_eq!((rel.obj1_name.as_str(), rel.obj2_name.as_str()), ("obj17", "obj18"));
        assert_eq!((rel.obj1_type.as_str(), rel.obj2_type.as_str()), ("3", "5"));
        assert_eq!(rel.features[0], 100.25);
        assert_eq!(rel.features.len(), 11);
    }

    #[test]
    fn observation_slices_depend_on_inline_count() {
        let text = scenario_a().replace(
            &observation_line("RGBD_1", 40, &[17, 18]),
            &observation_line("RGBD_1", 40, &[17, 18, 19, 20, 21]),
        );
        let room = parse(&text).unwrap();
        let obs = &room.observations[0];
        assert_eq!(obs.objects_id.len(), 5);
        assert_eq!(obs.features[0], 200.25);
        assert_eq!(obs.features[47], 247.25);
        assert_eq!(obs.scan_features[0], 300.25);
        assert_eq!(obs.scan_features.len(), 9);
    }

    #[test]
    fn observation_without_objects_is_accepted() {
        let text = scenario_a().replace(
            &observation_line("RGBD_1", 40, &[17, 18]),
            &observation_line("RGBD_1", 40, &[]),
        );
        let room = parse(&text).unwrap();
        assert!(room.observations[0].objects_id.is_empty());
        assert_eq!(room.observations[0].features[0], 200.25);
    }

    #[test]
    fn extra_trailing_tokens_never_enter_vectors() {
        let text = scenario_a().replace(
            &object_line("chair", 17, "5", 3),
            &format!("{} 999 999", object_line("chair", 17, "5", 3)),
        );
        let room = parse(&text).unwrap();
        assert_eq!(room.objects[0].features.len(), 32);
        assert_eq!(room.objects[0].features[31], 31.25);
    }

    #[test]
    fn missing_object_line_is_detected() {
        let text = scenario_a().replace("N_objects 2", "N_objects 3");
        let err = parse(&text).unwrap_err();
        assert!(
            matches!(
                err,
                DatasetError::FieldCountMismatch { section: Section::Objects, .. }
                    | DatasetError::TruncatedRecord { .. }
            ),
            "{err:?}"
        );
        assert_eq!(err.location().map(|l| l.line), Some(4));
    }

    #[test]
    fn undercounted_objects_name_the_section_boundary() {
        let text = scenario_a().replace("N_objects 2", "N_objects 1");
        let err = parse(&text).unwrap_err();
        assert!(
            matches!(
                err,
                DatasetError::SectionOverrun {
                    section: Section::Objects,
                    declared: 1,
                    keyword: "N_relations",
                    ..
                }
            ),
            "{err:?}"
        );
        assert_eq!(err.location().map(|l| l.line), Some(3));
    }

    #[test]
    fn undercounted_relations_name_the_section_boundary() {
        let text = scenario_a().replace("N_relations 1", "N_relations 0");
        let err = parse(&text).unwrap_err();
        assert!(
            matches!(
                err,
                DatasetError::SectionOverrun {
                    section: Section::Relations,
                    declared: 0,
                    keyword: "N_observations",
                    ..
                }
            ),
            "{err:?}"
        );
        assert_eq!(err.location().map(|l| l.line), Some(5));
        assert!(err.to_string().contains("expected 'N_observations' after 0 relation lines"));
    }

    #[test]
    fn wrong_object_arity_is_schema_mismatch() {
        let text = scenario_a().replace("N_objectFeatures 32", "N_objectFeatures 31");
        assert!(matches!(
            parse(&text),
            Err(DatasetError::SchemaMismatch { expected: 32, declared: 31, .. })
        ));
    }

    #[test]
    fn wrong_relation_and_scan_arity_are_schema_mismatch() {
        let rel = scenario_a().replace("N_relationFeatures 11", "N_relationFeatures 12");
        assert!(matches!(
            parse(&rel),
            Err(DatasetError::SchemaMismatch { section: Section::RelationsHeader, .. })
        ));
        let scan = scenario_a().replace("N_scanFeatures 9", "N_scanFeatures 8");
        assert!(matches!(
            parse(&scan),
            Err(DatasetError::SchemaMismatch { section: Section::ObservationsHeader, expected: 9, .. })
        ));
    }

    #[test]
    fn short_observation_line_reports_required_width() {
        let text = scenario_a().replace(
            &observation_line("RGBD_1", 40, &[17, 18]),
            &format!("RGBD_1 40 2 17 18 {}", values(48, 0)),
        );
        assert!(matches!(
            parse(&text),
            Err(DatasetError::FieldCountMismatch { expected: 62, found: 53, .. })
        ));
    }

    #[test]
    fn content_after_last_section_is_rejected() {
        let text = scenario_a() + "leftover line\n";
        assert!(matches!(
            parse(&text),
            Err(DatasetError::TrailingRecords { .. })
        ));
    }

    #[test]
    fn load_resolves_home_folders_through_registry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES_FILE), "N_homes 1\n3 alma-s1\n").unwrap();
        let home = dir.path().join("alma-s1");
        std::fs::create_dir(&home).unwrap();
        std::fs::write(home.join("bathroom1.txt"), scenario_a()).unwrap();

        let registry = CategoryRegistry::load(&dir.path().join(CATEGORIES_FILE)).unwrap();
        let sessions = load_characterized_elements(dir.path(), &registry).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, 3);
        assert_eq!(sessions[0].name, "alma-s1");
        assert_eq!(sessions[0].rooms[0].home_id, 3);
    }

    #[test]
    fn unknown_home_folder_is_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES_FILE), "N_homes 1\n3 alma-s1\n").unwrap();
        std::fs::create_dir(dir.path().join("rx2-s1")).unwrap();

        let registry = CategoryRegistry::load(&dir.path().join(CATEGORIES_FILE)).unwrap();
        let err = load_characterized_elements(dir.path(), &registry).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::UnresolvedParentReference { ref reference, .. } if reference == "rx2-s1"
        ));
    }

    #[test]
    fn one_bad_room_fails_the_whole_unit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES_FILE), "N_homes 1\n3 alma-s1\n").unwrap();
        let home = dir.path().join("alma-s1");
        std::fs::create_dir(&home).unwrap();
        std::fs::write(home.join("a.txt"), scenario_a()).unwrap();
        std::fs::write(home.join("b.txt"), scenario_a().replace("N_objects 2", "N_objects 3")).unwrap();

        let registry = CategoryRegistry::load(&dir.path().join(CATEGORIES_FILE)).unwrap();
        assert!(load_characterized_elements(dir.path(), &registry).is_err());
    }
}
