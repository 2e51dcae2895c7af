//! Id / name indexing over plain slices of records.

use std::collections::HashMap;
use std::hash::Hash;

use crate::model::{HomeSession, ObjectRecord, ObjectRelation, Observation, Room};

/// A record with an identity key and a human label.
pub trait Keyed {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> &Self::Key;

    fn label(&self) -> &str;
}

pub fn by_id<'a, T: Keyed>(items: &'a [T], key: &T::Key) -> Option<&'a T> {
    items.iter().find(|item| item.key() == key)
}

/// First record carrying `label`; labels are not unique in general.
pub fn by_name<'a, T: Keyed>(items: &'a [T], label: &str) -> Option<&'a T> {
    items.iter().find(|item| item.label() == label)
}

pub fn ids<T: Keyed>(items: &[T]) -> Vec<T::Key> {
    items.iter().map(|item| item.key().clone()).collect()
}

pub fn names<T: Keyed>(items: &[T]) -> Vec<&str> {
    items.iter().map(Keyed::label).collect()
}

/// Map every key to its record. Later duplicates win, as with a dict build.
pub fn index_by_id<T: Keyed>(items: &[T]) -> HashMap<T::Key, &T> {
    items.iter().map(|item| (item.key().clone(), item)).collect()
}

impl Keyed for HomeSession {
    type Key = u32;
    fn key(&self) -> &u32 {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Keyed for Room {
    type Key = String;
    fn key(&self) -> &String {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Keyed for ObjectRecord {
    type Key = u32;
    fn key(&self) -> &u32 {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl Keyed for Observation {
    type Key = String;
    fn key(&self) -> &String {
        &self.id
    }
    fn label(&self) -> &str {
        &self.sensor_name
    }
}

impl Keyed for ObjectRelation {
    type Key = String;
    fn key(&self) -> &String {
        &self.id
    }
    fn label(&self) -> &str {
        &self.obj1_name
    }
}

pub fn obj1_ids(relations: &[ObjectRelation]) -> Vec<u32> {
    relations.iter().map(|r| r.obj1_id).collect()
}

pub fn obj2_ids(relations: &[ObjectRelation]) -> Vec<u32> {
    relations.iter().map(|r| r.obj2_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessions() -> Vec<HomeSession> {
        vec![
            HomeSession { id: 0, name: "alma-s1".into(), rooms: vec![] },
            HomeSession { id: 1, name: "anto-s1".into(), rooms: vec![] },
            HomeSession { id: 2, name: "alma-s1".into(), rooms: vec![] },
        ]
    }

    #[test]
    fn lookups_by_id_and_name() {
        let s = sessions();
        assert_eq!(by_id(&s, &1).map(|h| h.name.as_str()), Some("anto-s1"));
        assert_eq!(by_name(&s, "alma-s1").map(|h| h.id), Some(0));
        assert!(by_id(&s, &7).is_none());
        assert_eq!(ids(&s), vec![0, 1, 2]);
        assert_eq!(names(&s), vec!["alma-s1", "anto-s1", "alma-s1"]);
    }

    #[test]
    fn index_by_id_covers_every_record() {
        let s = sessions();
        let index = index_by_id(&s);
        assert_eq!(index.len(), 3);
        assert_eq!(index[&2].name, "alma-s1");
    }
}
