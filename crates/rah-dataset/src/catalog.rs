//! The ten downloadable Robot@Home units.

use std::fmt;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::size::human_size;

/// How a unit's folder is laid out, and therefore which loader reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnitLayout {
    /// Catalogued for download and integrity checks only.
    Opaque,
    CharacterizedElements,
    GeometricMaps,
    Topologies,
    RawData,
}

impl UnitLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitLayout::Opaque => "opaque",
            UnitLayout::CharacterizedElements => "characterized elements",
            UnitLayout::GeometricMaps => "geometric maps",
            UnitLayout::Topologies => "topologies",
            UnitLayout::RawData => "raw data",
        }
    }
}

impl fmt::Display for UnitLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a published unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub folder: &'static str,
    /// SHA-1 of the folder index, see [`LocalProbe`][crate::integrity::LocalProbe].
    pub sha1: &'static str,
    pub size: u64,
    pub layout: UnitLayout,
}

pub const UNITS: [UnitSpec; 10] = [
    UnitSpec {
        key: "rgbd",
        name: "RGB-D data",
        url: "https://ananas.isa.uma.es:10002/sharing/sJUC06jFJ",
        folder: "Robot@Home-dataset_rgbd_data-plain_text-all",
        sha1: "b934e53d16580a62e0f4f1532d1efaa0567232ae",
        size: 19_896_608_308,
        layout: UnitLayout::Opaque,
    },
    UnitSpec {
        key: "recscn",
        name: "Reconstructed scenes",
        url: "https://ananas.isa.uma.es:10002/sharing/sFCGRu1LN",
        folder: "Robot@Home-dataset_reconstructed-scenes_plain-text_all",
        sha1: "5dc5aed9dfebf6e14890eb2418d3f518d0f55c6d",
        size: 7_947_567_151,
        layout: UnitLayout::Opaque,
    },
    UnitSpec {
        key: "lblscn",
        name: "Labeled scenes",
        url: "https://ananas.isa.uma.es:10002/sharing/KS6kscXb3",
        folder: "Robot@Home-dataset_labelled-scenes_plain-text_all",
        sha1: "394dc6c8f4d19b2887007e6ee66f2e7cb64f930f",
        size: 7_947_369_064,
        layout: UnitLayout::Opaque,
    },
    UnitSpec {
        key: "lblrgbd",
        name: "Labeled RGB-D data",
        url: "https://ananas.isa.uma.es:10002/sharing/jVVI92AJn",
        folder: "Robot@Home-dataset_labelled-rgbd-data_plain-text_all",
        sha1: "6834f930a16bb5d968d55b0b647703d952384e91",
        size: 16_739_353_847,
        layout: UnitLayout::Opaque,
    },
    UnitSpec {
        key: "chelmnts",
        name: "Characterized elements",
        url: "https://ananas.isa.uma.es:10002/sharing/t6zVblP3w",
        folder: "Robot@Home-dataset_characterized-elements",
        sha1: "9d46bc3b33d2c6b84c04bd3db12cc415c17b4ae8",
        size: 33_345_659,
        layout: UnitLayout::CharacterizedElements,
    },
    UnitSpec {
        key: "2dgeomap",
        name: "2D geometric maps",
        url: "https://ananas.isa.uma.es:10002/sharing/PUZHG28p6",
        folder: "Robot@Home-dataset_2d_geometric_maps",
        sha1: "a00bb33bc628e0fdb9df6822915b9eafcf67998f",
        size: 8_323_899,
        layout: UnitLayout::GeometricMaps,
    },
    UnitSpec {
        key: "2dgeomapl",
        name: "2D geometric maps + logs",
        url: "https://ananas.isa.uma.es:10002/sharing/VLWRJUJGY",
        folder: "Robot@Home-dataset_2d_geometric_maps+logs",
        sha1: "f8b3dadd9181291a59f589033521708d4399d12b",
        size: 216_384_106,
        layout: UnitLayout::Opaque,
    },
    UnitSpec {
        key: "hometopo",
        name: "Home's topologies",
        url: "https://ananas.isa.uma.es:10002/sharing/EBXypqYAV",
        folder: "Robot@Home-dataset_homes-topologies",
        sha1: "652087d30c05ff4eaec9a0770307a2ced7fe5064",
        size: 40_872,
        layout: UnitLayout::Topologies,
    },
    UnitSpec {
        key: "raw",
        name: "Raw data",
        url: "https://ananas.isa.uma.es:10002/sharing/PAJxeUT0q",
        folder: "Robot@Home-dataset_raw_data-plain_text-all",
        sha1: "4823b61180bbf8ce5458ad43ad709069edb0e8f3",
        size: 20_002_442_369,
        layout: UnitLayout::RawData,
    },
    UnitSpec {
        key: "lsrscan",
        name: "Laser scans",
        url: "https://ananas.isa.uma.es:10002/sharing/pMVKQb5hl",
        folder: "Robot@Home-dataset_laser_scans-plain_text-all",
        sha1: "0f188931b2bce1926d0faaac13be78614749ec72",
        size: 227_829_791,
        layout: UnitLayout::RawData,
    },
];

/// A catalogued unit with its folder resolved under a dataset root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DatasetUnit {
    pub key: String,
    pub name: String,
    pub url: String,
    pub path: PathBuf,
    pub expected_hash: String,
    pub expected_size: u64,
    pub layout: UnitLayout,
}

impl DatasetUnit {
    pub fn from_spec(spec: &UnitSpec, root: &Path) -> Self {
        Self {
            key: spec.key.to_string(),
            name: spec.name.to_string(),
            url: spec.url.to_string(),
            path: root.join(spec.folder),
            expected_hash: spec.sha1.to_string(),
            expected_size: spec.size,
            layout: spec.layout,
        }
    }
}

impl fmt::Display for DatasetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(self.name.chars().count());
        writeln!(f, "{rule}\n{}\n{rule}", self.name)?;
        writeln!(f, "  url           = {}", self.url)?;
        writeln!(f, "  path          = {}", self.path.display())?;
        writeln!(f, "  expected hash = {}", self.expected_hash)?;
        writeln!(
            f,
            "  expected size = {} bytes  ({})",
            self.expected_size,
            human_size(self.expected_size)
        )
    }
}
