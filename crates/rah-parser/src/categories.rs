//! Category registry.
//!
//! The categories file is a flat list of group headers and numbered
//! entries:
//!
//! ```text
//! N_homes 3
//! 0 alma-s1
//! 1 anto-s1
//! N_typesOfRooms 2
//! 0 bathroom
//! 1 bedroom
//! ```
//!
//! A line whose first token is purely numeric is an `<id> <name>` entry of
//! the most recent group; any other line opens a new group named by its
//! first token. Groups are discovered by substring (see
//! [`CategoryRegistry::group_containing`]) because their exact names vary
//! across dataset releases.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use rah_types::DatasetError;
use tracing::debug;

use crate::reader::LineReader;

const HOME_KEY: &str = "home";
const ROOM_KEY: &str = "room";
const OBJECT_KEY: &str = "object";

/// One named `id → name` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    name: String,
    entries: BTreeMap<u32, String>,
}

impl CategoryGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &BTreeMap<u32, String> {
        &self.entries
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    /// Inverse lookup: id of the first entry called `name`.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find_map(|(id, entry)| (entry == name).then_some(*id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named groups of categories in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
    groups: Vec<CategoryGroup>,
}

impl CategoryRegistry {
    /// Load the registry from a categories file on disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let mut reader = LineReader::open(path)?;
        let registry = Self::parse(&mut reader)?;
        debug!(
            path = %path.display(),
            groups = registry.groups.len(),
            "category registry loaded"
        );
        Ok(registry)
    }

    /// Parse categories from an already-open reader.
    ///
    /// # Errors
    ///
    /// [`DatasetError::MalformedCategoryFile`] when an entry precedes every
    /// group header, an entry has no name, an id does not fit in `u32`, or
    /// an id repeats inside its group.
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Self, DatasetError> {
        let mut groups: Vec<CategoryGroup> = Vec::new();

        while let Some((location, line)) = reader.next_nonblank_line()? {
            let mut words = line.split_whitespace();
            let Some(first) = words.next() else { continue };

            if !first.bytes().all(|b| b.is_ascii_digit()) {
                groups.push(CategoryGroup {
                    name: first.to_string(),
                    entries: BTreeMap::new(),
                });
                continue;
            }

            let malformed = |details: String| DatasetError::MalformedCategoryFile {
                location: location.clone(),
                details,
            };
            let group = groups
                .last_mut()
                .ok_or_else(|| malformed(format!("entry '{first}' appears before any group header")))?;
            let id: u32 = first
                .parse()
                .map_err(|_| malformed(format!("id '{first}' is out of range")))?;
            let name = words
                .next()
                .ok_or_else(|| malformed(format!("entry {id} has no name")))?;
            if group.entries.insert(id, name.to_string()).is_some() {
                return Err(malformed(format!("id {id} repeats in group '{}'", group.name)));
            }
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// Group whose name is exactly `name`.
    pub fn group(&self, name: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// First group whose name contains `substring`, case-insensitively.
    pub fn group_containing(&self, substring: &str) -> Option<&CategoryGroup> {
        let needle = substring.to_lowercase();
        self.groups
            .iter()
            .find(|g| g.name.to_lowercase().contains(&needle))
    }

    pub fn home_sessions(&self) -> Option<&CategoryGroup> {
        self.group_containing(HOME_KEY)
    }

    pub fn room_types(&self) -> Option<&CategoryGroup> {
        self.group_containing(ROOM_KEY)
    }

    pub fn object_types(&self) -> Option<&CategoryGroup> {
        self.group_containing(OBJECT_KEY)
    }

    /// Distinct home names, cutting each session name at its first `-s`
    /// (`alma-s1` → `alma`). First-seen order.
    pub fn home_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for session in self.home_sessions().into_iter().flat_map(|g| g.entries.values()) {
            let home = session.split("-s").next().unwrap_or(session);
            if !names.iter().any(|n| n == home) {
                names.push(home.to_string());
            }
        }
        names
    }
}

/// Build the error used when a parent id cannot be resolved.
pub(crate) fn unresolved(parent: &'static str, reference: &str, path: &Path) -> DatasetError {
    DatasetError::UnresolvedParentReference {
        parent,
        reference: reference.to_string(),
        path: path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<CategoryRegistry, DatasetError> {
        let mut reader = LineReader::new(Cursor::new(text.as_bytes().to_vec()), "types.txt");
        CategoryRegistry::parse(&mut reader)
    }

    const TYPES: &str = "\
N_homes 3
0 alma-s1
1 anto-s1
2 alma-s2
N_typesOfRooms 2
0 bathroom
1 bedroom
N_typesOfObjects 2
0 bottle
1 chair
";

    #[test]
    fn groups_are_kept_in_file_order() {
        let reg = parse(TYPES).unwrap();
        let names: Vec<&str> = reg.groups().iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["N_homes", "N_typesOfRooms", "N_typesOfObjects"]);
        assert_eq!(reg.room_types().unwrap().get(1), Some("bedroom"));
        assert_eq!(reg.object_types().unwrap().len(), 2);
    }

    #[test]
    fn group_containing_is_case_insensitive() {
        let reg = parse("Home_something\n0 alma\n1 bob\n").unwrap();
        let group = reg.group_containing("home").unwrap();
        let expected: BTreeMap<u32, String> =
            [(0, "alma".to_string()), (1, "bob".to_string())].into_iter().collect();
        assert_eq!(group.entries(), &expected);
        assert!(reg.group_containing("HOME").is_some());
        assert!(reg.group_containing("room").is_none());
    }

    #[test]
    fn entry_before_any_header_is_malformed() {
        let err = parse("0 alma\nN_homes 1\n").unwrap_err();
        match err {
            DatasetError::MalformedCategoryFile { location, .. } => assert_eq!(location.line, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn leading_blank_lines_are_ignored() {
        let reg = parse("\n\n  \nN_homes 1\n0 alma-s1\n").unwrap();
        assert_eq!(reg.home_sessions().unwrap().id_of("alma-s1"), Some(0));
    }

    #[test]
    fn duplicate_id_in_group_is_malformed() {
        assert!(matches!(
            parse("N_homes 2\n0 alma-s1\n0 anto-s1\n"),
            Err(DatasetError::MalformedCategoryFile { .. })
        ));
    }

    #[test]
    fn entry_without_name_is_malformed() {
        assert!(matches!(
            parse("N_homes 1\n4\n"),
            Err(DatasetError::MalformedCategoryFile { .. })
        ));
    }

    #[test]
    fn home_names_strip_session_suffix() {
        let reg = parse(TYPES).unwrap();
        assert_eq!(reg.home_names(), vec!["alma".to_string(), "anto".to_string()]);
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.txt");
        std::fs::write(&path, TYPES).unwrap();
        let reg = CategoryRegistry::load(&path).unwrap();
        assert_eq!(reg.home_sessions().unwrap().get(2), Some("alma-s2"));
        assert!(reg.group("N_homes").is_some());
    }
}
