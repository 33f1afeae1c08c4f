//! Moving bytes between file descriptors and the ring.

use crate::error::EngineError;
use spool_ring::{ReadView, StreamReader, StreamWriter};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Opens the input file, or standard input when `path` is `None`.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>, EngineError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| EngineError::OpenInput {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Creates (or truncates) an output file for writing.
pub(crate) fn create_output(path: &Path) -> Result<File, EngineError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| EngineError::CreateOutput {
            path: path.to_path_buf(),
            source,
        })
}

/// Where one consumer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => f.write_str("standard output"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl OutputTarget {
    /// Opens the target and drains `reader` into it. Runs on the consumer
    /// thread, since the stdout lock must stay on the thread that took it.
    pub(crate) fn write_all_from(&self, mut reader: StreamReader) -> Result<u64, EngineError> {
        let target = self.to_string();
        match self {
            OutputTarget::Stdout => drain(&mut reader, &mut io::stdout().lock(), &target),
            OutputTarget::File(path) => {
                let mut file = create_output(path)?;
                drain(&mut reader, &mut file, &target)
            }
        }
    }
}

/// Reads `source` into the ring until it is exhausted, then signals end of
/// stream. Returns the number of bytes read.
///
/// On error the writer is left without end of stream; the caller cancels or
/// drops it so readers do not wait forever.
pub fn pump<R: Read>(mut source: R, writer: &mut StreamWriter) -> Result<u64, EngineError> {
    let mut total = 0u64;
    loop {
        let mut view = writer.wait_input()?;
        let got = loop {
            match source.read_vectored(&mut view.io_slices_mut()) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(EngineError::Read(e)),
            }
        };
        if got == 0 {
            break;
        }
        trace!(got, space = view.len(), "read");
        view.commit(got);
        total += got as u64;
    }
    writer.signal_eof();
    debug!(bytes = total, "input exhausted");
    Ok(total)
}

/// Writes everything `reader` receives to `sink` until end of stream.
/// Returns the number of bytes written.
pub fn drain<W: Write>(
    reader: &mut StreamReader,
    sink: &mut W,
    target: &str,
) -> Result<u64, EngineError> {
    let mut total = 0u64;
    loop {
        let view = reader.wait_output()?;
        if view.is_empty() {
            break;
        }
        let put = write_view(sink, &view, target)?;
        view.commit(put);
        total += put as u64;
    }
    sink.flush().map_err(|source| EngineError::Write {
        target: target.to_owned(),
        source,
    })?;
    debug!(output = target, bytes = total, "output complete");
    Ok(total)
}

/// One vectored write of `view`; returns the bytes actually written.
pub(crate) fn write_view<W: Write>(
    sink: &mut W,
    view: &ReadView<'_>,
    target: &str,
) -> Result<usize, EngineError> {
    loop {
        match sink.write_vectored(&view.io_slices()) {
            Ok(0) => {
                return Err(EngineError::Write {
                    target: target.to_owned(),
                    source: ErrorKind::WriteZero.into(),
                });
            }
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(EngineError::Write {
                    target: target.to_owned(),
                    source,
                });
            }
        }
    }
}
