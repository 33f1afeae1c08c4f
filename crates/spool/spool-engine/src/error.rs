use spool_ring::RingError;
use spool_util::NameError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("can't read {}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't write {}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error reading input")]
    Read(#[source] io::Error),

    #[error("I/O error writing {target}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("can't link {} to {}", target.display(), link.display())]
    Link {
        target: PathBuf,
        link: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Name(#[from] NameError),

    #[error("stream cancelled by a failing peer")]
    Cancelled(#[from] RingError),

    #[error("can't start consumer thread")]
    Spawn(#[source] io::Error),

    #[error("consumer thread '{0}' panicked")]
    Panicked(String),
}

impl EngineError {
    /// Whether this error only reflects another thread's failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled(_))
    }
}

/// Picks the error to report from everything that went wrong: the first root
/// cause, or a cancellation if that is all there is.
pub(crate) fn root_cause(errors: Vec<EngineError>) -> Option<EngineError> {
    let mut fallback = None;
    for err in errors {
        if !err.is_cancelled() {
            return Some(err);
        }
        fallback.get_or_insert(err);
    }
    fallback
}
