//! Laser scan files.
//!
//! Counting only non-comment lines: line 1 holds the aperture, line 2 the
//! maximum range, line 4 the range readings and line 5 one validity flag per
//! reading. Any other line is ignored.

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use rah_parser::reader::{LineReader, Record};
use rah_types::{DatasetError, Section};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const APERTURE_LINE: usize = 1;
const MAX_RANGE_LINE: usize = 2;
const RANGES_LINE: usize = 4;
const VALID_LINE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LaserScan {
    /// Angular aperture in radians.
    pub aperture: f64,
    /// Maximum range in metres.
    pub max_range: f64,
    pub ranges: Vec<f64>,
    pub valid: Vec<bool>,
}

impl LaserScan {
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }

    /// `(range, valid)` pairs.
    pub fn readings(&self) -> impl Iterator<Item = (f64, bool)> + '_ {
        self.ranges.iter().copied().zip(self.valid.iter().copied())
    }
}

impl fmt::Display for LaserScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aperture {}, max range {}, {} readings, {} valid",
            self.aperture,
            self.max_range,
            self.ranges.len(),
            self.valid_count()
        )
    }
}

pub fn load_laser_scan(path: &Path) -> Result<LaserScan, DatasetError> {
    let mut reader = LineReader::open(path)?;
    parse_laser_scan(&mut reader)
}

/// # Errors
///
/// [`DatasetError::TruncatedRecord`] when one of lines 1, 2, 4 or 5 is
/// missing, [`DatasetError::FieldCountMismatch`] when the validity flags do
/// not pair up with the readings.
pub fn parse_laser_scan<R: BufRead>(reader: &mut LineReader<R>) -> Result<LaserScan, DatasetError> {
    let mut aperture = None;
    let mut max_range = None;
    let mut ranges: Option<Record> = None;
    let mut valid: Option<Record> = None;

    let mut n = 0;
    while let Some(record) = reader.next_data_record()? {
        n += 1;
        match n {
            APERTURE_LINE => aperture = Some(record.parse::<f64>(0, "aperture")?),
            MAX_RANGE_LINE => max_range = Some(record.parse::<f64>(0, "max range")?),
            RANGES_LINE => ranges = Some(record),
            VALID_LINE => valid = Some(record),
            _ => {}
        }
    }

    let truncated = || DatasetError::TruncatedRecord {
        location: reader.location(),
        section: Section::LaserScan,
    };
    let (Some(aperture), Some(max_range), Some(ranges), Some(valid)) =
        (aperture, max_range, ranges, valid)
    else {
        return Err(truncated());
    };

    if ranges.len() != valid.len() {
        return Err(DatasetError::FieldCountMismatch {
            location: valid.location.clone(),
            section: Section::LaserScan,
            expected: ranges.len(),
            found: valid.len(),
        });
    }

    let readings = (0..ranges.len())
        .map(|i| ranges.parse::<f64>(i, "range reading"))
        .collect::<Result<Vec<_>, _>>()?;
    let flags = (0..valid.len())
        .map(|i| valid.parse::<f64>(i, "validity flag").map(|v| v != 0.0))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LaserScan {
        aperture,
        max_range,
        ranges: readings,
        valid: flags,
    })
}
