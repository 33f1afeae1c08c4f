use thiserror::Error;

/// The only failure a ring operation reports.
///
/// Contract violations (over-long commits, double EOF, closing an undrained
/// stream) panic instead; they are caller bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// A peer cancelled the stream, explicitly or by dropping its handle
    /// before reaching end of stream.
    #[error("stream cancelled")]
    Cancelled,
}
