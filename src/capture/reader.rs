//! Capture file decoding
//!
//! Provides [`CaptureReader`], a lazy record-by-record decoder over any `Read`, and
//! [`Capture`], the fully materialised sample sequence built on top of it.
//!
//! ## File Format
//!
//! The file is a flat run of 9-byte records with no header or footer:
//!
//! ```text
//! bytes[0..8) : timestamp, u64 little-endian
//! byte[8]     : channel_state bitmask
//! ```
//!
//! Decoding stops at EOF. A trailing fragment shorter than one record is dropped
//! without error; its length is kept in `discarded_bytes()`. Timestamps are not
//! checked for ordering.

use super::sample::{RECORD_SIZE, Sample};
use crate::Result;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info};

/// Streaming decoder yielding one [`Sample`] per record
///
/// Memory use is constant regardless of capture size, so this is the way to walk
/// captures with tens of millions of records. The iterator is finite and is not
/// restartable: open the source again to re-read it.
///
/// After the first I/O error the iterator yields that error once and then ends.
///
/// # Example
/// ```no_run
/// use logic_capture::CaptureReader;
///
/// for sample in CaptureReader::open("capture.bin")? {
///     let sample = sample?;
///     println!("{}", sample);
/// }
/// # Ok::<(), logic_capture::CaptureError>(())
/// ```
pub struct CaptureReader<R> {
    reader: BufReader<R>,
    records_read: u64,
    discarded_bytes: usize,
    finished: bool,
}

impl CaptureReader<File> {
    /// Open a capture file for streaming
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("Opened capture file {}", path.display());
        Ok(Self::new(file))
    }
}

impl<R: Read> CaptureReader<R> {
    /// Wrap any byte source
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            records_read: 0,
            discarded_bytes: 0,
            finished: false,
        }
    }

    /// Number of complete records decoded so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Length of the dropped trailing fragment, once the stream is exhausted
    pub fn discarded_bytes(&self) -> usize {
        self.discarded_bytes
    }

    /// Fill one record, tolerating short reads. `Ok(None)` at end of stream.
    fn read_record(&mut self) -> Result<Option<Sample>> {
        let mut record = [0u8; RECORD_SIZE];
        let mut filled = 0;

        while filled < RECORD_SIZE {
            match self.reader.read(&mut record[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled < RECORD_SIZE {
            if filled > 0 {
                debug!(
                    "Discarding {} trailing bytes after record {}",
                    filled, self.records_read
                );
                self.discarded_bytes = filled;
            }
            return Ok(None);
        }

        self.records_read += 1;
        Ok(Some(Sample::from_bytes(&record)))
    }
}

impl<R: Read> Iterator for CaptureReader<R> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_record() {
            Ok(Some(sample)) => Some(Ok(sample)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// A fully decoded capture, in file order
///
/// Order is chronological and carries the transition history, so samples are
/// never sorted or deduplicated. The capture is immutable once built and can be
/// shared by reference between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    samples: Vec<Sample>,
    discarded_bytes: usize,
}

impl Capture {
    /// Decode a capture file into memory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::drain(CaptureReader::open(path)?)
    }

    /// Decode every record from a byte source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::drain(CaptureReader::new(reader))
    }

    /// Decode an in-memory file image
    pub fn from_bytes(data: &[u8]) -> Self {
        let records = data.chunks_exact(RECORD_SIZE);
        let discarded_bytes = records.remainder().len();
        let samples = records
            .map(|chunk| {
                let mut record = [0u8; RECORD_SIZE];
                record.copy_from_slice(chunk);
                Sample::from_bytes(&record)
            })
            .collect();

        Self {
            samples,
            discarded_bytes,
        }
    }

    fn drain<R: Read>(mut reader: CaptureReader<R>) -> Result<Self> {
        let samples = reader.by_ref().collect::<Result<Vec<_>>>()?;
        let capture = Self {
            samples,
            discarded_bytes: reader.discarded_bytes(),
        };

        info!(
            "Decoded {} samples ({} trailing bytes discarded)",
            capture.len(),
            capture.discarded_bytes
        );
        Ok(capture)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the capture holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in file order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterate samples in file order
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Length of the trailing fragment dropped during decode
    pub fn discarded_bytes(&self) -> usize {
        self.discarded_bytes
    }

    /// Timestamp of the final sample
    pub fn last_timestamp(&self) -> Option<u64> {
        self.samples.last().map(|s| s.timestamp)
    }
}

impl From<Vec<Sample>> for Capture {
    fn from(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            discarded_bytes: 0,
        }
    }
}

impl FromIterator<Sample> for Capture {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a Capture {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
