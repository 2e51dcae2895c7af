//! [`SensorDescriptor`] and the sensor kind resolver.
//!
//! A descriptor starts out as plain metadata read from a room index. The
//! first time its files are requested the room folder is listed, the files
//! whose name prefix (before the first `_`) equals the sensor id are kept,
//! and the sensor is classified from those names. The result is stored in a
//! [`OnceCell`] and never recomputed.
//!
//! Callers reach kind-specific operations through [`SensorAccess`], a closed
//! tagged enum, instead of down-casting.

use std::cell::OnceCell;
use std::fmt;
use std::path::PathBuf;

use rah_parser::reader::{file_name, sorted_entries};
use rah_types::{Channel, DatasetError, Keyed};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scan::{load_laser_scan, LaserScan};

/// Substring that marks a laser-scanner file.
pub const SCAN_MARKER: &str = "scan";

/// What a sensor turned out to be once its files were listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// No files matched; nothing kind-specific is available.
    Generic,
    Camera,
    LaserScanner,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SensorKind::Generic => "generic",
            SensorKind::Camera => "camera",
            SensorKind::LaserScanner => "laser scanner",
        })
    }
}

/// Cached outcome of [`resolve`]: the kind and the matching file names,
/// sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Resolution {
    pub kind: SensorKind,
    pub files: Vec<String>,
}

/// Classify `sensor_id` against a room folder `listing`.
///
/// Pure: the same listing always gives the same answer.
///
/// ```
/// use rah_sensors::descriptor::{resolve, SensorKind};
///
/// let listing = ["3_scan.txt", "30_depth.png", "4_intensity.png"];
/// let r = resolve("3", &listing);
/// assert_eq!(r.kind, SensorKind::LaserScanner);
/// assert_eq!(r.files, vec!["3_scan.txt".to_string()]);
/// ```
pub fn resolve<S: AsRef<str>>(sensor_id: &str, listing: &[S]) -> Resolution {
    let mut files: Vec<String> = listing
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.split('_').next() == Some(sensor_id))
        .map(str::to_string)
        .collect();
    files.sort();

    let kind = if files.is_empty() {
        SensorKind::Generic
    } else if files.iter().any(|f| f.contains(SCAN_MARKER)) {
        SensorKind::LaserScanner
    } else {
        SensorKind::Camera
    };
    Resolution { kind, files }
}

/// 6-DoF pose exactly as written in the index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SensorPose {
    pub x: String,
    pub y: String,
    /// Mirrors `x`. Downstream consumers of the dataset rely on this; the
    /// recorded value is in [`recorded_z`](Self::recorded_z).
    pub z: String,
    pub yaw: String,
    pub pitch: String,
    pub roll: String,
    pub recorded_z: String,
}

impl SensorPose {
    pub fn new(
        x: &str,
        y: &str,
        z: &str,
        yaw: &str,
        pitch: &str,
        roll: &str,
    ) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
            z: x.to_string(),
            yaw: yaw.to_string(),
            pitch: pitch.to_string(),
            roll: roll.to_string(),
            recorded_z: z.to_string(),
        }
    }
}

/// One physical sensor instance of a raw room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SensorDescriptor {
    pub id: String,
    pub name: String,
    pub pose: SensorPose,
    pub time_stamp: String,
    /// Folder holding this room's sensor files.
    pub folder: PathBuf,
    #[serde(skip)]
    #[schemars(skip)]
    resolution: OnceCell<Resolution>,
}

impl SensorDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pose: SensorPose,
        time_stamp: impl Into<String>,
        folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pose,
            time_stamp: time_stamp.into(),
            folder: folder.into(),
            resolution: OnceCell::new(),
        }
    }

    /// Cached resolution, if files were already requested.
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.get()
    }

    /// Kind, or `None` while still unresolved.
    pub fn kind(&self) -> Option<SensorKind> {
        self.resolution.get().map(|r| r.kind)
    }

    /// List the room folder once and resolve this sensor's files.
    ///
    /// Later calls return the cached list without touching the disk.
    pub fn load_files(&self) -> Result<&[String], DatasetError> {
        if let Some(r) = self.resolution.get() {
            return Ok(&r.files);
        }
        let listing: Vec<String> = sorted_entries(&self.folder)?
            .iter()
            .map(|p| file_name(p).to_string())
            .collect();
        Ok(&self.resolve_with(&listing).files)
    }

    /// Resolve against a caller-supplied listing. A no-op once resolved.
    pub fn resolve_with<S: AsRef<str>>(&self, listing: &[S]) -> &Resolution {
        self.resolution.get_or_init(|| {
            let r = resolve(&self.id, listing);
            debug!(sensor = %self.id, kind = %r.kind, files = r.files.len(), "sensor resolved");
            r
        })
    }

    /// Kind-specific view, resolving from disk first if needed.
    pub fn access(&self) -> Result<SensorAccess<'_>, DatasetError> {
        self.load_files()?;
        Ok(self.view())
    }

    // Only called after resolution.
    fn view(&self) -> SensorAccess<'_> {
        match self.kind() {
            Some(SensorKind::Camera) => SensorAccess::Camera(CameraSensor { sensor: self }),
            Some(SensorKind::LaserScanner) => {
                SensorAccess::LaserScanner(LaserScanner { sensor: self })
            }
            _ => SensorAccess::Generic(self),
        }
    }

    fn files(&self) -> &[String] {
        self.resolution.get().map(|r| r.files.as_slice()).unwrap_or_default()
    }
}

impl Keyed for SensorDescriptor {
    type Key = String;
    fn key(&self) -> &String {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SensorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind().map(|k| k.to_string());
        write!(
            f,
            "{} {}, {}, pose ({}, {}, {}, {}, {}, {}), t={}",
            kind.as_deref().unwrap_or("unresolved"),
            self.id,
            self.name,
            self.pose.x,
            self.pose.y,
            self.pose.z,
            self.pose.yaw,
            self.pose.pitch,
            self.pose.roll,
            self.time_stamp
        )?;
        if let Some(r) = self.resolution() {
            write!(f, ", files {:?}", r.files)?;
        }
        Ok(())
    }
}

/// Capability surface of a resolved sensor.
#[derive(Debug, Clone, Copy)]
pub enum SensorAccess<'a> {
    Generic(&'a SensorDescriptor),
    Camera(CameraSensor<'a>),
    LaserScanner(LaserScanner<'a>),
}

impl<'a> SensorAccess<'a> {
    pub fn descriptor(&self) -> &'a SensorDescriptor {
        match *self {
            SensorAccess::Generic(s) => s,
            SensorAccess::Camera(c) => c.sensor,
            SensorAccess::LaserScanner(l) => l.sensor,
        }
    }

    pub fn kind(&self) -> SensorKind {
        match self {
            SensorAccess::Generic(_) => SensorKind::Generic,
            SensorAccess::Camera(_) => SensorKind::Camera,
            SensorAccess::LaserScanner(_) => SensorKind::LaserScanner,
        }
    }
}

/// RGB-D camera view.
#[derive(Debug, Clone, Copy)]
pub struct CameraSensor<'a> {
    sensor: &'a SensorDescriptor,
}

impl CameraSensor<'_> {
    pub fn depth_file(&self) -> Result<PathBuf, DatasetError> {
        self.channel_file(Channel::Depth)
    }

    pub fn intensity_file(&self) -> Result<PathBuf, DatasetError> {
        self.channel_file(Channel::Intensity)
    }

    /// First file, in name order, whose name carries the channel marker.
    pub fn channel_file(&self, channel: Channel) -> Result<PathBuf, DatasetError> {
        self.sensor
            .files()
            .iter()
            .find(|f| f.contains(channel.marker()))
            .map(|f| self.sensor.folder.join(f))
            .ok_or_else(|| DatasetError::MissingChannelFile {
                sensor_id: self.sensor.id.clone(),
                channel,
            })
    }
}

/// 2-D laser scanner view.
#[derive(Debug, Clone, Copy)]
pub struct LaserScanner<'a> {
    sensor: &'a SensorDescriptor,
}

impl LaserScanner<'_> {
    /// Path of the scan file: the first matched file carrying the marker.
    pub fn scan_file(&self) -> PathBuf {
        let files = self.sensor.files();
        let name = files
            .iter()
            .find(|f| f.contains(SCAN_MARKER))
            .or_else(|| files.first());
        match name {
            Some(name) => self.sensor.folder.join(name),
            None => self.sensor.folder.clone(),
        }
    }

    /// Re-open and parse the scan file.
    pub fn laser_scan(&self) -> Result<LaserScan, DatasetError> {
        load_laser_scan(&self.scan_file())
    }
}
