//! Single-producer, multi-consumer byte ring with independent read cursors.
//!
//! One [`StreamWriter`] appends bytes; any number of [`StreamReader`]s, each
//! owned by its own thread, consume the identical byte sequence at their own
//! pace. Storage is shared, never copied per reader, and space is reclaimed
//! only once the slowest reader has passed it.

mod cursor;
mod error;
mod ring;
mod scatter;
mod store;
mod stream;
mod sync;

pub use cursor::{CursorSnapshot, StreamState};
pub use error::RingError;
pub use ring::{RingConfig, input_space, offset_to_index, output_avail};
pub use scatter::{MAX_SEGMENTS, ScatterDescriptor, Segment};
pub use stream::{ReadView, StreamReader, StreamWriter, WriteView};
