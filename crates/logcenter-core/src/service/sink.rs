//! File destinations and their `MakeWriter` adapter

use parking_lot::{Mutex, MutexGuard};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;

use super::rotating_file::{open_append, RotatingFile, RotationPolicy};
use crate::domain::{LogCenterConfig, SinkKind};
use crate::error::LogCenterError;

/// The file half of a log center's destination
pub enum FileSink {
    Rotating(RotatingFile),
    Append(File),
}

impl FileSink {
    /// Open the sink selected by the configuration
    pub fn open(config: &LogCenterConfig) -> Result<Self, LogCenterError> {
        let path = config.resolved_file_path();
        let sink = match config.sink {
            SinkKind::Rotating => {
                RotatingFile::open(&path, RotationPolicy::from(config)).map(FileSink::Rotating)
            }
            SinkKind::Append => open_append(&path).map(FileSink::Append),
        };
        sink.map_err(|source| LogCenterError::Sink { path, source })
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileSink::Rotating(file) => file.write(buf),
            FileSink::Append(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileSink::Rotating(file) => file.flush(),
            FileSink::Append(file) => file.flush(),
        }
    }
}

/// Shared handle to a [`FileSink`]; every record locks it for one write
#[derive(Clone)]
pub struct SinkWriter {
    inner: Arc<Mutex<FileSink>>,
}

impl SinkWriter {
    pub fn new(sink: FileSink) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sink)),
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// Write guard handed out per record
pub struct SinkGuard<'a>(MutexGuard<'a, FileSink>);

impl Write for SinkGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkGuard(self.inner.lock())
    }
}

/// Combine the file sink with stdout when the console is enabled
pub fn destination(file: SinkWriter, console: bool) -> BoxMakeWriter {
    if console {
        BoxMakeWriter::new(file.and(io::stdout))
    } else {
        BoxMakeWriter::new(file)
    }
}

/// Path the sink writes to, for diagnostics
pub fn describe(path: &Path, kind: SinkKind) -> String {
    match kind {
        SinkKind::Rotating => format!("{} (rotating)", path.display()),
        SinkKind::Append => format!("{} (append)", path.display()),
    }
}
