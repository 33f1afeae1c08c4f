//! Stream drivers over `spool-ring`: the producer pump, per-output consumers,
//! and the two tool pipelines built from them.

mod error;
mod fanout;
mod io;
mod splitter;

pub use error::EngineError;
pub use fanout::{Fanout, FanoutReport};
pub use io::{OutputTarget, drain, open_input, pump};
pub use splitter::{SplitReport, Splitter};
