//! Memory Trace Reader.
//!
//! Traces are plain text, one request per line:
//!
//! ```text
//! r 7b032f08
//! w 0x7b032f0c
//! ```
//!
//! The first field is the request type (`r` or `w`), the second a 32-bit
//! hexadecimal address with an optional `0x` prefix. Blank lines are skipped.
//! Any other record is an error; reading stops there.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::common::{AccessType, TraceError};

/// One request from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Request type.
    pub op: AccessType,
    /// Byte address.
    pub addr: u32,
}

impl TraceRecord {
    /// Creates a record.
    pub const fn new(op: AccessType, addr: u32) -> Self {
        Self { op, addr }
    }

    /// Parses the text of trace line `line`.
    ///
    /// Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// Fails with the matching [`TraceError`] variant for a record without
    /// exactly two fields, an unknown request type, or a bad address.
    pub fn parse(line: usize, text: &str) -> Result<Option<Self>, TraceError> {
        let mut fields = text.split_whitespace();
        let Some(tag) = fields.next() else {
            return Ok(None);
        };
        let (Some(addr), None) = (fields.next(), fields.next()) else {
            return Err(TraceError::MalformedRecord {
                line,
                text: text.trim().to_owned(),
            });
        };

        let op = AccessType::from_tag(tag).ok_or_else(|| TraceError::UnknownOperation {
            line,
            op: tag.to_owned(),
        })?;

        let digits = addr
            .strip_prefix("0x")
            .or_else(|| addr.strip_prefix("0X"))
            .unwrap_or(addr);
        let addr = u32::from_str_radix(digits, 16).map_err(|_| TraceError::InvalidAddress {
            line,
            text: addr.to_owned(),
        })?;

        Ok(Some(Self { op, addr }))
    }
}

/// Formats the record in trace syntax, e.g. `w 7b032f0c`.
impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x}", self.op.tag(), self.addr)
    }
}

/// Iterator over the records of a trace.
///
/// Yields `Err` once for the first bad line and then ends.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line: usize,
    failed: bool,
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Open`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Reads records from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            failed: false,
        }
    }

    /// Number of lines consumed so far.
    pub const fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            };
            self.line += 1;
            match TraceRecord::parse(self.line, &text) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
