//! One input, many identical outputs.
//!
//! Every output gets its own reader and its own thread; the calling thread
//! pumps the input. Outputs progress independently and the ring only holds
//! the producer back when the slowest output is a full buffer behind.

use crate::error::{EngineError, root_cause};
use crate::io::{OutputTarget, open_input, pump};
use spool_ring::{RingConfig, StreamWriter};
use std::io::Read;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

pub struct Fanout {
    buffer_size: usize,
    input: Option<PathBuf>,
    outputs: Vec<OutputTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanoutReport {
    /// Bytes read from the input (and written to every output).
    pub bytes: u64,
    pub outputs: usize,
}

impl Fanout {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            input: None,
            outputs: Vec::new(),
        }
    }

    /// Reads from `path` instead of standard input.
    pub fn input(mut self, path: Option<PathBuf>) -> Self {
        self.input = path;
        self
    }

    pub fn output(mut self, target: OutputTarget) -> Self {
        self.outputs.push(target);
        self
    }

    pub fn files<I: IntoIterator<Item = PathBuf>>(mut self, paths: I) -> Self {
        self.outputs
            .extend(paths.into_iter().map(OutputTarget::File));
        self
    }

    /// Copies the configured input to every output (standard output when
    /// none were given).
    pub fn run(self) -> Result<FanoutReport, EngineError> {
        let source = open_input(self.input.as_deref())?;
        self.run_with(source)
    }

    /// As [`run`](Self::run), reading from `source`.
    pub fn run_with<R: Read>(self, source: R) -> Result<FanoutReport, EngineError> {
        let mut writer = StreamWriter::create(RingConfig::new(self.buffer_size));
        let targets = if self.outputs.is_empty() {
            vec![OutputTarget::Stdout]
        } else {
            self.outputs
        };
        let outputs = targets.len();

        // All readers exist before the first byte is committed.
        let mut consumers = Vec::with_capacity(outputs);
        for (i, target) in targets.into_iter().enumerate() {
            let reader = writer.add_reader();
            let name = format!("fatcat-out-{i}");
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || target.write_all_from(reader))
                .map_err(EngineError::Spawn)?;
            consumers.push((name, handle));
        }
        debug!(outputs, buffer = self.buffer_size, "fan-out started");

        let pumped = pump(source, &mut writer);
        if pumped.is_err() {
            writer.cancel();
        }

        let mut errors: Vec<EngineError> = join_consumers(consumers);
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
        info!(bytes, outputs, "fan-out complete");
        Ok(FanoutReport { bytes, outputs })
    }
}

/// Joins every consumer, collecting their failures in spawn order.
fn join_consumers(
    consumers: Vec<(String, JoinHandle<Result<u64, EngineError>>)>,
) -> Vec<EngineError> {
    consumers
        .into_iter()
        .filter_map(|(name, handle)| match handle.join() {
            Ok(Ok(_)) => None,
            Ok(Err(err)) => Some(err),
            Err(_) => Some(EngineError::Panicked(name)),
        })
        .collect()
}
