//! [`Dataset`]: the unit catalog rooted at a local directory, plus the
//! per-unit loaders.
//!
//! Each loader reads one unit wholesale. A failure is scoped to that unit;
//! other units can still be loaded from the same `Dataset`.

use std::fmt;
use std::path::{Path, PathBuf};

use rah_parser::{
    load_characterized_elements, load_geometric_maps, load_topologies, CategoryRegistry,
    GeometricHome, HomeTopology, CATEGORIES_FILE,
};
use rah_sensors::{load_raw_data, RawHomeSession};
use rah_types::{DatasetError, HomeSession};
use tracing::info;

use crate::catalog::{DatasetUnit, UnitLayout, UNITS};
use crate::size::human_size;

pub const DEFAULT_NAME: &str = "MyRobot@Home";

/// Registry and home sessions of the characterized-elements unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterizedElements {
    pub categories: CategoryRegistry,
    pub sessions: Vec<HomeSession>,
}

impl CharacterizedElements {
    pub fn session(&self, name: &str) -> Option<&HomeSession> {
        self.sessions.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    root: PathBuf,
    units: Vec<DatasetUnit>,
}

impl Dataset {
    /// Catalog every unit under `root`. Nothing is read from disk.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let units = UNITS.iter().map(|spec| DatasetUnit::from_spec(spec, &root)).collect();
        Self {
            name: name.into(),
            root,
            units,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn unit(&self, key: &str) -> Option<&DatasetUnit> {
        self.units.iter().find(|u| u.key == key)
    }

    /// Units in catalog order.
    pub fn units(&self) -> &[DatasetUnit] {
        &self.units
    }

    pub fn total_expected_size(&self) -> u64 {
        self.units.iter().map(|u| u.expected_size).sum()
    }

    fn unit_with(&self, key: &str, layout: UnitLayout) -> Result<&DatasetUnit, DatasetError> {
        let unit = self.unit(key).ok_or_else(|| DatasetError::UnknownUnit {
            key: key.to_string(),
        })?;
        if unit.layout != layout {
            return Err(DatasetError::UnsupportedUnit {
                key: key.to_string(),
                expected: layout.as_str(),
            });
        }
        Ok(unit)
    }

    fn first_with(&self, layout: UnitLayout) -> Result<&DatasetUnit, DatasetError> {
        self.units
            .iter()
            .find(|u| u.layout == layout)
            .ok_or_else(|| DatasetError::UnknownUnit {
                key: layout.as_str().to_string(),
            })
    }

    /// Load the categories and home sessions of `chelmnts`.
    pub fn load_characterized_elements(&self) -> Result<CharacterizedElements, DatasetError> {
        let unit = self.first_with(UnitLayout::CharacterizedElements)?;
        let categories = self.load_categories()?;
        let sessions = load_characterized_elements(&unit.path, &categories)?;
        info!(unit = %unit.key, sessions = sessions.len(), "unit loaded");
        Ok(CharacterizedElements {
            categories,
            sessions,
        })
    }

    /// Only the categories file of `chelmnts`.
    pub fn load_categories(&self) -> Result<CategoryRegistry, DatasetError> {
        let unit = self.first_with(UnitLayout::CharacterizedElements)?;
        CategoryRegistry::load(&unit.path.join(CATEGORIES_FILE))
    }

    /// Load a raw-protocol unit (`raw` or `lsrscan`).
    pub fn load_raw_data(&self, key: &str) -> Result<Vec<RawHomeSession>, DatasetError> {
        let unit = self.unit_with(key, UnitLayout::RawData)?;
        load_raw_data(&unit.path)
    }

    pub fn load_topologies(&self) -> Result<Vec<HomeTopology>, DatasetError> {
        load_topologies(&self.first_with(UnitLayout::Topologies)?.path)
    }

    pub fn load_geometric_maps(&self) -> Result<Vec<GeometricHome>, DatasetError> {
        load_geometric_maps(&self.first_with(UnitLayout::GeometricMaps)?.path)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}\n{}\n", self.name, "*".repeat(self.name.chars().count()))?;
        writeln!(f, "Units\n=====\n")?;
        for unit in &self.units {
            writeln!(f, "{unit}")?;
        }
        let total = self.total_expected_size();
        writeln!(f, "\nTotal expected size = {total} ({})", human_size(total))
    }
}
