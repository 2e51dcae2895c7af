//! HTTP [`Downloader`] backed by a blocking `reqwest` client.
//!
//! Certificate verification stays on.

use std::fs::File;
use std::path::{Path, PathBuf};

use rah_dataset::Downloader;
use rah_types::DatasetError;
use reqwest::header::CONTENT_DISPOSITION;

#[derive(Debug, Default)]
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, DatasetError> {
        let failed = |details: String| DatasetError::Download {
            url: url.to_string(),
            details,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| failed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| url_filename(url));
        let path = dest_dir.join(name);

        let mut file = File::create(&path).map_err(|e| DatasetError::io(&path, e))?;
        response
            .copy_to(&mut file)
            .map_err(|e| failed(e.to_string()))?;
        Ok(path)
    }
}

/// `filename` parameter of a `Content-Disposition` header.
fn disposition_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .filter(|name| !matches!(*name, "" | "." | "..") && !name.contains(['/', '\\']))
        .map(str::to_string)
}

/// Last path segment of `url`, or `download` when there is none.
fn url_filename(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(|u| u.trim_end_matches('/').rsplit('/').next())
        .filter(|s| !matches!(*s, "" | "." | "..") && !s.contains(':'))
        .unwrap_or("download")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_filename_is_unquoted() {
        assert_eq!(
            disposition_filename("attachment; filename=\"Robot@Home-dataset_homes-topologies.zip\""),
            Some("Robot@Home-dataset_homes-topologies.zip".to_string())
        );
        assert_eq!(disposition_filename("inline"), None);
        assert_eq!(disposition_filename("attachment; filename=\"../x\""), None);
        assert_eq!(disposition_filename("attachment; filename=\"..\""), None);
        assert_eq!(disposition_filename("attachment; filename=."), None);
    }

    #[test]
    fn url_filename_takes_last_segment() {
        assert_eq!(url_filename("https://ananas.isa.uma.es:10002/sharing/EBXypqYAV"), "EBXypqYAV");
        assert_eq!(url_filename("https://host/a/b.zip?x=1"), "b.zip");
        assert_eq!(url_filename("https://host:8080"), "download");
        assert_eq!(url_filename("https://host/a/.."), "download");
    }
}
