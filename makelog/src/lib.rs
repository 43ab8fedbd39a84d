//! CSV logs of the processes spawned by a build
//!
//! Each row of a build log describes one process, in order of completion:
//!
//! ```text
//! pid,ppid,start,end,tool,cmdline,target
//! 12,1,0.25,3.5,gcc,gcc -c foo.c -o foo.o,foo.o
//! 1,,0.0,4.0,make,make -j8,
//! ```
//!
//! Timestamps are in seconds. The toplevel build process has an empty `ppid`,
//! and `target` is empty when the make target is unknown.

#![deny(missing_docs)]

use jobtrace::{ProcessRecord, Timestamp};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
};
use thiserror::Error;

/// Default build log location
pub const DEFAULT_LOCATION: &str = "./makejobs.csv";

/// Open a previously recorded build log
pub fn open(path: impl AsRef<Path>) -> Result<RecordReader<File>, LogLoadError> {
    let path = path.as_ref();
    let reader = match csv::Reader::from_path(path) {
        Err(e) => match e.kind() {
            csv::ErrorKind::Io(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LogLoadError::FileNotFound)
            }
            _other => return Err(LogLoadError::ParseError(e)),
        },
        other => other?,
    };
    debug!("Opened build log at {}", path.display());
    Ok(RecordReader::new(reader)?)
}

/// Load a whole build log into memory
pub fn load(path: impl AsRef<Path>) -> Result<Vec<ProcessRecord>, LogLoadError> {
    let records = open(path)?.collect::<Result<Vec<_>, _>>()?;
    debug!("Loaded {} process records", records.len());
    Ok(records)
}

/// Failure to open a build log
#[derive(Debug, Error)]
pub enum LogLoadError {
    /// Build log file not found
    #[error("build log not found")]
    FileNotFound,

    /// Failed to process the build log for another reason
    #[error("failed to process build log ({0})")]
    ParseError(#[from] csv::Error),

    /// A record of the build log is invalid
    #[error(transparent)]
    BadRecord(#[from] LogReadError),
}

/// Streaming reader of build log records
#[derive(Debug)]
pub struct RecordReader<R: Read> {
    /// Underlying CSV reader
    reader: csv::Reader<R>,

    /// Column names
    headers: csv::StringRecord,

    /// Buffer for the current row
    row: csv::StringRecord,
}
//
impl<R: Read> RecordReader<R> {
    /// Read build log records from an arbitrary source
    pub fn from_reader(source: R) -> Result<Self, csv::Error> {
        Self::new(csv::Reader::from_reader(source))
    }

    /// Set up the reader, starting with the header row
    fn new(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let headers = reader.headers()?.clone();
        Ok(Self {
            reader,
            headers,
            row: csv::StringRecord::new(),
        })
    }

    /// Annotate a CSV error with the position of the faulty row
    fn error(&self, source: csv::Error) -> LogReadError {
        let line = match source.position().or(self.row.position()) {
            Some(position) => position.line(),
            None => self.reader.position().line(),
        };
        LogReadError { line, source }
    }
}
//
impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<ProcessRecord, LogReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => Some(
                self.row
                    .deserialize::<LogRow>(Some(&self.headers))
                    .map(ProcessRecord::from)
                    .map_err(|source| self.error(source)),
            ),
            Err(source) => Some(Err(self.error(source))),
        }
    }
}

/// Failure to read a build log record
#[derive(Debug, Error)]
#[error("bad build log record near line {line} ({source})")]
pub struct LogReadError {
    /// Line of the build log that was being read
    line: u64,

    /// What went wrong
    source: csv::Error,
}
//
impl LogReadError {
    /// Line of the build log that was being read
    pub fn line(&self) -> u64 {
        self.line
    }
}

/// Writer of build logs
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    /// Underlying CSV writer
    writer: csv::Writer<W>,
}
//
impl RecordWriter<File> {
    /// Create a build log file, overwriting any previous content
    pub fn create(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}
//
impl<W: Write> RecordWriter<W> {
    /// Write a build log to an arbitrary destination
    pub fn from_writer(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    /// Append a record to the build log
    pub fn write(&mut self, record: &ProcessRecord) -> Result<(), csv::Error> {
        self.writer.serialize(LogRowRef::from(record))
    }

    /// Flush buffered records to the destination
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush buffered records and get back the destination
    pub fn into_inner(self) -> Result<W, csv::IntoInnerError<csv::Writer<W>>> {
        self.writer.into_inner()
    }
}

/// Row of the build log CSV file
#[derive(Debug, Deserialize)]
struct LogRow {
    /// Process identifier
    pid: Box<str>,

    /// Parent process identifier, empty for the toplevel build process
    ppid: Option<Box<str>>,

    /// Start time in seconds
    start: Timestamp,

    /// End time in seconds
    end: Timestamp,

    /// Executed tool
    #[serde(default)]
    tool: Box<str>,

    /// Full command line
    #[serde(default)]
    cmdline: Box<str>,

    /// Make target, if known
    #[serde(default)]
    target: Option<Box<str>>,
}
//
impl From<LogRow> for ProcessRecord {
    fn from(row: LogRow) -> Self {
        Self {
            pid: row.pid,
            ppid: row.ppid,
            start: row.start,
            end: row.end,
            tool: row.tool,
            cmdline: row.cmdline,
            make_target: row.target,
        }
    }
}

/// Row of the build log CSV file, borrowed from a record
#[derive(Debug, Serialize)]
struct LogRowRef<'a> {
    pid: &'a str,
    ppid: Option<&'a str>,
    start: Timestamp,
    end: Timestamp,
    tool: &'a str,
    cmdline: &'a str,
    target: Option<&'a str>,
}
//
impl<'a> From<&'a ProcessRecord> for LogRowRef<'a> {
    fn from(record: &'a ProcessRecord) -> Self {
        Self {
            pid: &record.pid,
            ppid: record.ppid.as_deref(),
            start: record.start,
            end: record.end,
            tool: &record.tool,
            cmdline: &record.cmdline,
            target: record.make_target.as_deref(),
        }
    }
}
