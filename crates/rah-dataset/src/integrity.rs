//! Unit integrity checks.
//!
//! A unit is intact when its folder exists and its files add up to the
//! published byte count. An in-depth check also compares the folder digest:
//! every file under the folder is hashed, the `relative/path=hexdigest`
//! lines are joined with `\n` in path order, and that index is hashed
//! again. SHA-1 throughout, lower-case hex.

use std::fs;
use std::path::Path;

use rah_types::DatasetError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog::DatasetUnit;

/// Filesystem facts an integrity check needs.
pub trait UnitProbe {
    fn exists(&self, path: &Path) -> bool;

    /// Recursive sum of file sizes under `path`.
    fn directory_size(&self, path: &Path) -> Result<u64, DatasetError>;

    /// Folder digest as described in the module docs.
    fn content_hash(&self, path: &Path) -> Result<String, DatasetError>;
}

/// [`UnitProbe`] over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProbe;

impl LocalProbe {
    fn files(root: &Path) -> Result<Vec<walkdir::DirEntry>, DatasetError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                DatasetError::io(&path, e.into())
            })?;
            if entry.file_type().is_file() {
                files.push(entry);
            }
        }
        Ok(files)
    }
}

impl UnitProbe for LocalProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn directory_size(&self, path: &Path) -> Result<u64, DatasetError> {
        Self::files(path)?.iter().try_fold(0u64, |total, entry| {
            let meta = entry
                .metadata()
                .map_err(|e| DatasetError::io(entry.path(), e.into()))?;
            Ok(total + meta.len())
        })
    }

    fn content_hash(&self, path: &Path) -> Result<String, DatasetError> {
        let files = Self::files(path)?;
        let mut relative: Vec<(String, &Path)> = Vec::with_capacity(files.len());
        for entry in &files {
            let rel = entry.path().strip_prefix(path).unwrap_or(entry.path());
            relative.push((rel.to_string_lossy().into_owned(), entry.path()));
        }
        // String order, not component order: `a-b` sorts before `a/b`.
        relative.sort_by(|a, b| a.0.cmp(&b.0));

        let mut lines = Vec::with_capacity(relative.len());
        for (rel, full) in relative {
            let bytes = fs::read(full).map_err(|e| DatasetError::io(full, e))?;
            lines.push(format!("{rel}={}", hex::encode(Sha1::digest(&bytes))));
        }
        let index = lines.join("\n");
        debug!(path = %path.display(), files = lines.len(), "folder index built");
        Ok(hex::encode(Sha1::digest(index.as_bytes())))
    }
}

/// Outcome of [`check_integrity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntegrityReport {
    pub unit: String,
    pub folder_exists: bool,
    pub expected_size: u64,
    pub actual_size: Option<u64>,
    pub expected_hash: String,
    /// Only computed for in-depth checks of an existing folder.
    pub actual_hash: Option<String>,
}

impl IntegrityReport {
    pub fn size_matches(&self) -> bool {
        self.actual_size == Some(self.expected_size)
    }

    /// `None` when the digest was not computed.
    pub fn hash_matches(&self) -> Option<bool> {
        self.actual_hash.as_ref().map(|h| *h == self.expected_hash)
    }

    pub fn is_ok(&self) -> bool {
        self.folder_exists && self.size_matches() && self.hash_matches() != Some(false)
    }
}

pub fn check_integrity(
    unit: &DatasetUnit,
    probe: &dyn UnitProbe,
    in_depth: bool,
) -> Result<IntegrityReport, DatasetError> {
    let mut report = IntegrityReport {
        unit: unit.key.clone(),
        folder_exists: probe.exists(&unit.path),
        expected_size: unit.expected_size,
        actual_size: None,
        expected_hash: unit.expected_hash.clone(),
        actual_hash: None,
    };
    if !report.folder_exists {
        warn!(unit = %unit.key, path = %unit.path.display(), "unit folder not found");
        return Ok(report);
    }

    report.actual_size = Some(probe.directory_size(&unit.path)?);
    if in_depth {
        report.actual_hash = Some(probe.content_hash(&unit.path)?);
    }
    info!(
        unit = %unit.key,
        size_ok = report.size_matches(),
        hash_ok = ?report.hash_matches(),
        "integrity checked"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UnitLayout;
    use std::path::PathBuf;

    fn unit(path: PathBuf, size: u64, hash: &str) -> DatasetUnit {
        DatasetUnit {
            key: "hometopo".into(),
            name: "Home's topologies".into(),
            url: "https://example.invalid/unit".into(),
            path,
            expected_hash: hash.into(),
            expected_size: size,
            layout: UnitLayout::Topologies,
        }
    }

    struct FixedProbe {
        size: u64,
        hash: &'static str,
    }

    impl UnitProbe for FixedProbe {
        fn exists(&self, _: &Path) -> bool {
            true
        }
        fn directory_size(&self, _: &Path) -> Result<u64, DatasetError> {
            Ok(self.size)
        }
        fn content_hash(&self, _: &Path) -> Result<String, DatasetError> {
            Ok(self.hash.to_string())
        }
    }

    #[test]
    fn missing_folder_is_reported_not_raised() {
        let u = unit(PathBuf::from("/no/such/unit"), 10, "abc");
        let report = check_integrity(&u, &LocalProbe, true).unwrap();
        assert!(!report.folder_exists);
        assert!(report.actual_size.is_none());
        assert!(!report.is_ok());
    }

    #[test]
    fn size_counts_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("alma")).unwrap();
        std::fs::write(dir.path().join("alma.txt"), b"12345").unwrap();
        std::fs::write(dir.path().join("alma").join("kitchen.txt"), b"123").unwrap();
        assert_eq!(LocalProbe.directory_size(dir.path()).unwrap(), 8);

        let report = check_integrity(&unit(dir.path().to_path_buf(), 8, "x"), &LocalProbe, false).unwrap();
        assert!(report.size_matches());
        assert!(report.hash_matches().is_none());
        assert!(report.is_ok());
    }

    #[test]
    fn content_hash_of_single_file_matches_index_construction() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        // sha1("abc") = a9993e36...; the folder digest hashes "a.txt=<that>".
        let index = "a.txt=a9993e364706816aba3e25717850c26c9cd0d89d";
        let expected = hex::encode(Sha1::digest(index.as_bytes()));
        assert_eq!(LocalProbe.content_hash(dir.path()).unwrap(), expected);
    }

    #[test]
    fn content_hash_sorts_by_path_string() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("a").join("b"), b"1").unwrap();
        std::fs::write(dir.path().join("a-c"), b"2").unwrap();
        let h1 = hex::encode(Sha1::digest(b"1"));
        let h2 = hex::encode(Sha1::digest(b"2"));
        let index = format!("a-c={h2}\na/b={h1}");
        assert_eq!(
            LocalProbe.content_hash(dir.path()).unwrap(),
            hex::encode(Sha1::digest(index.as_bytes()))
        );
    }

    #[test]
    fn in_depth_flags_digest_mismatch() {
        let u = unit(PathBuf::from("unit"), 42, "expected");
        let probe = FixedProbe { size: 42, hash: "other" };
        let quick = check_integrity(&u, &probe, false).unwrap();
        assert!(quick.is_ok());
        let deep = check_integrity(&u, &probe, true).unwrap();
        assert_eq!(deep.hash_matches(), Some(false));
        assert!(!deep.is_ok());
    }
}
