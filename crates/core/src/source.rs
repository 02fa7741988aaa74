//! Seekable program source shared between the caller and the code renderer.
//!
//! The console only reads and rewinds it. A stream that failed to open is
//! still a value (mirroring a file handle whose open failed) so callers can
//! hand it over and get a reported failure instead of a panic.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::warn;

pub struct SourceStream<R> {
    inner: Option<BufReader<R>>,
}

impl SourceStream<File> {
    /// Open `path` for reading. Failure yields a closed stream.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => Self::from_reader(file),
            Err(e) => {
                warn!(target: "console.code", file = %path.display(), error = %e, "source_open_failed");
                Self::closed()
            }
        }
    }
}

impl<R: Read + Seek> SourceStream<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            inner: Some(BufReader::new(reader)),
        }
    }

    pub fn closed() -> Self {
        Self { inner: None }
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Drop the underlying reader.
    pub fn close(&mut self) {
        self.inner = None;
    }

    /// Seek back to the first byte. No-op on a closed stream.
    pub fn rewind(&mut self) -> io::Result<()> {
        if let Some(r) = self.inner.as_mut() {
            r.seek(SeekFrom::Start(0))?;
        }
        Ok(())
    }

    /// Read one line including its terminator; `Ok(0)` at end of stream.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.reader()?.read_line(buf)
    }

    /// Read one line as raw bytes, terminator included; `Ok(0)` at end of
    /// stream. Does not require the text to be UTF-8.
    pub fn read_line_bytes(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.reader()?.read_until(b'\n', buf)
    }

    /// Number of lines in the stream. Leaves it rewound on success.
    pub fn count_lines(&mut self) -> io::Result<usize> {
        self.rewind()?;
        let mut count = 0;
        let mut buf = Vec::new();
        while self.read_line_bytes(&mut buf)? > 0 {
            count += 1;
            buf.clear();
        }
        self.rewind()?;
        Ok(count)
    }

    fn reader(&mut self) -> io::Result<&mut BufReader<R>> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "source stream is not open"))
    }
}

impl<R: Read + Seek> Read for SourceStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader()?.read(buf)
    }
}
