//! Download collaborator.
//!
//! The library never talks to the network itself; a host plugs in a
//! [`Downloader`] (the `rah` binary uses an HTTP client).

use std::path::{Path, PathBuf};

use rah_types::DatasetError;
use tracing::info;

use crate::catalog::DatasetUnit;

pub trait Downloader {
    /// Fetch `url` into `dest_dir` and return the path of the written file.
    fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, DatasetError>;
}

/// Download `unit`'s archive into `dest_dir`.
pub fn fetch_unit(
    unit: &DatasetUnit,
    downloader: &dyn Downloader,
    dest_dir: &Path,
) -> Result<PathBuf, DatasetError> {
    std::fs::create_dir_all(dest_dir).map_err(|e| DatasetError::io(dest_dir, e))?;
    info!(unit = %unit.key, url = %unit.url, dest = %dest_dir.display(), "downloading unit");
    let path = downloader.download(&unit.url, dest_dir)?;
    info!(unit = %unit.key, path = %path.display(), "unit downloaded");
    Ok(path)
}
