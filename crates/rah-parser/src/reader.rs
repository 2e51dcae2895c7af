//! Tokenized line reader.
//!
//! Reads one logical record (line) at a time, splits it on runs of
//! whitespace and checks the token count against the minimum the caller's
//! positional schema needs. Token semantics are left to the caller.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rah_types::{DatasetError, FeatureKind, FeatureVector, Location, Section};

use crate::extract::extract;

/// One tokenized line together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub location: Location,
    pub tokens: Vec<String>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`; callers check the count through `read_record`.
    pub fn token(&self, index: usize) -> &str {
        &self.tokens[index]
    }

    /// Parse the token at `index` into `T`, naming `field` on failure.
    pub fn parse<T: FromStr>(&self, index: usize, field: &'static str) -> Result<T, DatasetError> {
        let raw = self.token(index);
        raw.parse().map_err(|_| DatasetError::InvalidField {
            location: self.location.clone(),
            field,
            value: raw.to_string(),
        })
    }

    /// Slice a fixed-arity feature vector starting at token `start`.
    pub fn features(&self, start: usize, kind: FeatureKind) -> Result<FeatureVector, DatasetError> {
        extract(&self.tokens, start, kind).map_err(|e| match e {
            DatasetError::InvalidFeatureValue { value, .. } => DatasetError::InvalidField {
                location: self.location.clone(),
                field: "feature value",
                value,
            },
            other => other,
        })
    }
}

/// Line-oriented reader over a single unit file.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    path: PathBuf,
    line: usize,
    buf: String,
}

impl LineReader<BufReader<File>> {
    /// Open `path` for reading.
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> LineReader<R> {
    /// Wrap an already-open reader; `path` is used for error reporting only.
    pub fn new(inner: R, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
            line: 0,
            buf: String::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based number of the last line read (0 before the first read).
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn location(&self) -> Location {
        Location::new(self.path.clone(), self.line)
    }

    // Advance one physical line. `None` at end of file.
    fn next_line(&mut self) -> Result<Option<&str>, DatasetError> {
        self.buf.clear();
        let n = self
            .inner
            .read_line(&mut self.buf)
            .map_err(|e| DatasetError::io(&self.path, e))?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;
        Ok(Some(self.buf.trim_end()))
    }

    fn record(&self, tokens: Vec<String>) -> Record {
        Record {
            location: self.location(),
            tokens,
        }
    }

    /// Read the next line as a record of the given `section`.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::TruncatedRecord`] at end of file or on a blank line.
    /// - [`DatasetError::FieldCountMismatch`] when fewer than
    ///   `expected_min_tokens` tokens are present.
    pub fn read_record(
        &mut self,
        expected_min_tokens: usize,
        section: Section,
    ) -> Result<Record, DatasetError> {
        let tokens: Vec<String> = match self.next_line()? {
            Some(line) => line.split_whitespace().map(str::to_string).collect(),
            None => {
                return Err(DatasetError::TruncatedRecord {
                    location: Location::new(self.path.clone(), self.line + 1),
                    section,
                });
            }
        };
        if tokens.is_empty() {
            return Err(DatasetError::TruncatedRecord {
                location: self.location(),
                section,
            });
        }
        if tokens.len() < expected_min_tokens {
            return Err(DatasetError::FieldCountMismatch {
                location: self.location(),
                section,
                expected: expected_min_tokens,
                found: tokens.len(),
            });
        }
        Ok(self.record(tokens))
    }

    /// Next record that is neither blank nor a `#` comment, or `None` at
    /// end of file. Used by the free-form index, scan and category files.
    pub fn next_data_record(&mut self) -> Result<Option<Record>, DatasetError> {
        loop {
            let tokens: Vec<String> = match self.next_line()? {
                Some(line) => {
                    let trimmed = line.trim_start();
                    if trimmed.is_empty() || trimmed.starts_with('#') {
                        continue;
                    }
                    trimmed.split_whitespace().map(str::to_string).collect()
                }
                None => return Ok(None),
            };
            return Ok(Some(self.record(tokens)));
        }
    }

    /// Next non-blank raw line with its location, without tokenizing.
    pub fn next_nonblank_line(&mut self) -> Result<Option<(Location, String)>, DatasetError> {
        loop {
            let line = match self.next_line()? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => line.trim().to_string(),
                None => return Ok(None),
            };
            return Ok(Some((self.location(), line)));
        }
    }

    /// Fail with [`DatasetError::TrailingRecords`] if anything other than
    /// blank lines remains.
    pub fn expect_end(&mut self) -> Result<(), DatasetError> {
        match self.next_nonblank_line()? {
            Some((location, _)) => Err(DatasetError::TrailingRecords { location }),
            None => Ok(()),
        }
    }
}

/// Entries of `dir` sorted by file name, so load order never depends on
/// the platform's directory iteration order.
pub fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| DatasetError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatasetError::io(dir, e))?;
    entries.sort();
    Ok(entries)
}

/// File name of `path` as UTF-8, or an empty string.
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}
