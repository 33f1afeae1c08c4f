//! One input, cut into fixed-size, sequentially named files.
//!
//! A single consumer thread writes `chunk_size` bytes to the current file,
//! closes it, advances the file name (and every link name) with the odometer
//! rule, and carries on with the next one. Each chunk can be hard-linked
//! under extra names as soon as it is created.

use crate::error::{EngineError, root_cause};
use crate::io::{create_output, open_input, pump, write_view};
use spool_ring::{RingConfig, StreamReader, StreamWriter};
use spool_util::next_path;
use std::fs::{self, File};
use std::io::Read;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info};

pub struct Splitter {
    buffer_size: usize,
    chunk_size: usize,
    input: Option<PathBuf>,
    base: PathBuf,
    links: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub bytes: u64,
    /// Chunk files created, in order. Links are not listed.
    pub files: Vec<PathBuf>,
}

impl Splitter {
    /// # Panics
    /// Panics if `chunk_size` is zero.
    pub fn new(buffer_size: usize, chunk_size: usize, base: PathBuf) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            buffer_size,
            chunk_size,
            input: None,
            base,
            links: Vec::new(),
        }
    }

    pub fn input(mut self, path: Option<PathBuf>) -> Self {
        self.input = path;
        self
    }

    pub fn links<I: IntoIterator<Item = PathBuf>>(mut self, links: I) -> Self {
        self.links.extend(links);
        self
    }

    pub fn run(self) -> Result<SplitReport, EngineError> {
        let source = open_input(self.input.as_deref())?;
        self.run_with(source)
    }

    pub fn run_with<R: Read>(self, source: R) -> Result<SplitReport, EngineError> {
        let mut writer = StreamWriter::create(RingConfig::new(self.buffer_size));
        let reader = writer.add_reader();
        let chunks = ChunkWriter {
            chunk_size: self.chunk_size,
            base: self.base,
            links: self.links,
            files: Vec::new(),
        };

        let name = "spliff-out".to_owned();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || chunks.run(reader))
            .map_err(EngineError::Spawn)?;
        debug!(chunk = self.chunk_size, buffer = self.buffer_size, "split started");

        let pumped = pump(source, &mut writer);
        if pumped.is_err() {
            writer.cancel();
        }

        // The consumer's file list comes back through the join.
        let (files, mut errors) = match handle.join() {
            Ok(Ok(files)) => (files, Vec::new()),
            Ok(Err(err)) => (Vec::new(), vec![err]),
            Err(_) => (Vec::new(), vec![EngineError::Panicked(name)]),
        };
        let bytes = match pumped {
            Ok(bytes) => bytes,
            Err(err) => {
                errors.insert(0, err);
                0
            }
        };
        if let Some(err) = root_cause(errors) {
            return Err(err);
        }

        writer.close();
        info!(bytes, chunks = files.len(), "split complete");
        Ok(SplitReport { bytes, files })
    }
}

struct ChunkWriter {
    chunk_size: usize,
    base: PathBuf,
    links: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

/// The file currently being filled.
struct Chunk {
    file: File,
    remaining: usize,
}

impl ChunkWriter {
    fn run(mut self, mut reader: StreamReader) -> Result<Vec<PathBuf>, EngineError> {
        let mut current: Option<Chunk> = None;
        loop {
            let mut view = reader.wait_output()?;
            if view.is_empty() {
                break;
            }
            let mut chunk = match current.take() {
                Some(chunk) => chunk,
                None => self.open_next()?,
            };

            view.clip(chunk.remaining);
            let put = write_view(&mut chunk.file, &view, &self.base.display().to_string())?;
            view.commit(put);
            chunk.remaining -= put;

            // A full chunk is closed by dropping it.
            if chunk.remaining > 0 {
                current = Some(chunk);
            }
        }
        Ok(self.files)
    }

    /// Creates the next chunk file and its links. The first chunk uses the
    /// names as given; every later one advances them first.
    fn open_next(&mut self) -> Result<Chunk, EngineError> {
        if !self.files.is_empty() {
            self.base = next_path(&self.base)?;
            for link in &mut self.links {
                *link = next_path(link)?;
            }
        }

        let file = create_output(&self.base)?;
        info!("writing {}", self.base.display());

        for link in &self.links {
            fs::hard_link(&self.base, link).map_err(|source| EngineError::Link {
                target: self.base.clone(),
                link: link.clone(),
                source,
            })?;
            info!("    and {}", link.display());
        }

        self.files.push(self.base.clone());
        Ok(Chunk {
            file,
            remaining: self.chunk_size,
        })
    }
}
