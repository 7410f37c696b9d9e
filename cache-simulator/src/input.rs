//! Input data handling for cache simulation
//!
//! Reads `timestamp_ms,key` traces with the `csv` crate. The input may be a
//! single file or a directory, in which case every `.csv` file in it is
//! streamed in name order.

use crate::models::Request;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Error types for trace parsing
#[derive(Debug)]
pub enum LogParseError {
    IoError(io::Error),
    CsvError(csv::Error),
    /// Timestamps must never go backwards
    OutOfOrder { previous: u64, found: u64 },
}

impl fmt::Display for LogParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogParseError::IoError(e) => write!(f, "i/o error: {e}"),
            LogParseError::CsvError(e) => write!(f, "malformed trace: {e}"),
            LogParseError::OutOfOrder { previous, found } => {
                write!(f, "timestamp {found} precedes earlier timestamp {previous}")
            }
        }
    }
}

impl std::error::Error for LogParseError {}

impl From<io::Error> for LogParseError {
    fn from(err: io::Error) -> Self {
        LogParseError::IoError(err)
    }
}

impl From<csv::Error> for LogParseError {
    fn from(err: csv::Error) -> Self {
        LogParseError::CsvError(err)
    }
}

/// Reader for trace files
pub struct LogReader {
    input: PathBuf,
}

impl LogReader {
    /// Create a new reader for a trace file or directory
    pub fn new<P: AsRef<Path>>(input: P) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
        }
    }

    /// Get all trace files, sorted by name
    pub fn get_log_files(&self) -> io::Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        let mut log_files = Vec::new();
        for entry in fs::read_dir(&self.input)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                log_files.push(path);
            }
        }

        // Sort files by name for consistent ordering
        log_files.sort();
        Ok(log_files)
    }

    /// Stream every request without loading the trace into memory
    pub fn stream_requests(&self) -> Result<RequestIterator, LogParseError> {
        let log_files = self.get_log_files()?;
        Ok(RequestIterator::new(log_files))
    }
}

/// Iterator over the requests of several trace files
pub struct RequestIterator {
    files: Vec<PathBuf>,
    current_file_index: usize,
    current_reader: Option<csv::DeserializeRecordsIntoIter<File, Request>>,
    last_timestamp: u64,
}

impl RequestIterator {
    fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            current_file_index: 0,
            current_reader: None,
            last_timestamp: 0,
        }
    }

    /// Open the next file for reading
    fn open_next_file(&mut self) -> Result<bool, LogParseError> {
        let Some(path) = self.files.get(self.current_file_index) else {
            return Ok(false);
        };
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(path)?;
        self.current_reader = Some(reader.into_deserialize());
        self.current_file_index += 1;
        Ok(true)
    }
}

impl Iterator for RequestIterator {
    type Item = Result<Request, LogParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_reader.is_none() {
                match self.open_next_file() {
                    Ok(true) => {}
                    Ok(false) => return None,
                    Err(e) => return Some(Err(e)),
                }
            }

            let reader = self.current_reader.as_mut()?;
            match reader.next() {
                None => {
                    // EOF on current file, move to next
                    self.current_reader = None;
                }
                Some(Err(e)) => return Some(Err(e.into())),
                Some(Ok(request)) => {
                    if request.timestamp_ms < self.last_timestamp {
                        return Some(Err(LogParseError::OutOfOrder {
                            previous: self.last_timestamp,
                            found: request.timestamp_ms,
                        }));
                    }
                    self.last_timestamp = request.timestamp_ms;
                    return Some(Ok(request));
                }
            }
        }
    }
}
