//! The cursor table: the producer's write offset plus one read offset per
//! registered reader, and the end-of-stream flags.
//!
//! Each cursor is advanced only by the thread that owns it, but all of them
//! are read by the synchronization core to compute space and availability,
//! so the table only ever lives behind the ring's lock.

use crate::ring::{input_space, output_avail};

/// Index of a reader's entry in the cursor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReaderId(pub(crate) usize);

/// Lifecycle of a stream.
///
/// ```text
/// Open ──signal_eof──▶ EofSignaled ──(all readers drained)──▶ Drained ──close──▶ Closed
///   │                       │
///   └───────cancel──────────┴──▶ Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Open,
    EofSignaled,
    Drained,
    Closed,
    Cancelled,
}

/// A consistent copy of the cursor table taken under the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSnapshot {
    pub write_offset: u64,
    /// Offset of the slowest reader, or `write_offset` when there are none.
    pub min_read_offset: u64,
    pub readers: usize,
    pub state: StreamState,
}

impl CursorSnapshot {
    /// How far the producer is ahead of the slowest reader.
    pub fn ahead(&self) -> u64 {
        self.write_offset - self.min_read_offset
    }
}

#[derive(Debug)]
struct ReaderCursor {
    offset: u64,
    /// Set once the reader has been handed its zero-length result.
    finished: bool,
}

#[derive(Debug, Default)]
pub(crate) struct CursorTable {
    write_offset: u64,
    readers: Vec<ReaderCursor>,
    eof: bool,
    closed: bool,
    cancelled: bool,
}

impl CursorTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a cursor positioned at the current write offset. Bytes already
    /// committed are never visible to it.
    pub(crate) fn register(&mut self) -> ReaderId {
        assert!(!self.closed, "reader registered on a closed stream");
        self.readers.push(ReaderCursor {
            offset: self.write_offset,
            finished: false,
        });
        ReaderId(self.readers.len() - 1)
    }

    #[inline]
    pub(crate) fn write_offset(&self) -> u64 {
        self.write_offset
    }

    #[inline]
    pub(crate) fn read_offset(&self, id: ReaderId) -> u64 {
        self.readers[id.0].offset
    }

    /// With no readers there is nothing to protect, so the minimum is the
    /// writer itself and the producer never blocks.
    pub(crate) fn min_read(&self) -> u64 {
        self.readers
            .iter()
            .map(|r| r.offset)
            .min()
            .unwrap_or(self.write_offset)
    }

    pub(crate) fn input_space(&self, capacity: u64) -> u64 {
        input_space(self.write_offset, self.min_read(), capacity)
    }

    pub(crate) fn output_avail(&self, id: ReaderId) -> u64 {
        output_avail(self.write_offset, self.read_offset(id))
    }

    pub(crate) fn advance_write(&mut self, n: u64, capacity: u64) {
        assert!(!self.eof, "commit after end of stream");
        assert!(
            n <= self.input_space(capacity),
            "commit of {n} bytes exceeds free space"
        );
        self.write_offset += n;
    }

    /// Advances a reader and reports whether the slowest cursor moved, i.e.
    /// whether the producer may have gained space.
    pub(crate) fn advance_read(&mut self, id: ReaderId, n: u64) -> bool {
        assert!(
            n <= self.output_avail(id),
            "commit of {n} bytes exceeds unread data"
        );
        let before = self.min_read();
        self.readers[id.0].offset += n;
        n > 0 && self.min_read() != before
    }

    pub(crate) fn finish(&mut self, id: ReaderId) {
        let reader = &mut self.readers[id.0];
        assert!(!reader.finished, "end of stream observed twice");
        reader.finished = true;
    }

    pub(crate) fn set_eof(&mut self) {
        assert!(!self.eof, "end of stream signalled twice");
        self.eof = true;
    }

    #[inline]
    pub(crate) fn eof(&self) -> bool {
        self.eof
    }

    pub(crate) fn set_cancelled(&mut self) {
        self.cancelled = true;
    }

    #[inline]
    pub(crate) fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn set_closed(&mut self) {
        assert_eq!(
            self.state(),
            StreamState::Drained,
            "stream closed while readers are still active"
        );
        self.closed = true;
    }

    fn drained(&self) -> bool {
        self.eof && self.readers.iter().all(|r| r.offset == self.write_offset)
    }

    pub(crate) fn state(&self) -> StreamState {
        if self.cancelled {
            StreamState::Cancelled
        } else if self.closed {
            StreamState::Closed
        } else if self.drained() {
            StreamState::Drained
        } else if self.eof {
            StreamState::EofSignaled
        } else {
            StreamState::Open
        }
    }

    pub(crate) fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            write_offset: self.write_offset,
            min_read_offset: self.min_read(),
            readers: self.readers.len(),
            state: self.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_reader_starts_at_writer() {
        let mut t = CursorTable::new();
        let early = t.register();
        t.advance_write(5, 8);
        let late = t.register();
        assert_eq!(t.read_offset(early), 0);
        assert_eq!(t.read_offset(late), 5);
        assert_eq!(t.min_read(), 0);
    }

    #[test]
    fn only_the_slowest_reader_frees_space() {
        let mut t = CursorTable::new();
        let a = t.register();
        let b = t.register();
        t.advance_write(8, 8);
        assert_eq!(t.input_space(8), 0);
        assert!(!t.advance_read(a, 4));
        assert_eq!(t.input_space(8), 0);
        assert!(t.advance_read(b, 2));
        assert_eq!(t.input_space(8), 2);
    }

    #[test]
    fn readerless_table_never_fills() {
        let mut t = CursorTable::new();
        t.advance_write(8, 8);
        t.advance_write(8, 8);
        assert_eq!(t.input_space(8), 8);
    }

    #[test]
    fn state_machine_walks_forward() {
        let mut t = CursorTable::new();
        let r = t.register();
        t.advance_write(3, 8);
        assert_eq!(t.state(), StreamState::Open);
        t.set_eof();
        assert_eq!(t.state(), StreamState::EofSignaled);
        t.advance_read(r, 3);
        assert_eq!(t.state(), StreamState::Drained);
        t.set_closed();
        assert_eq!(t.state(), StreamState::Closed);
    }

    #[test]
    #[should_panic(expected = "exceeds free space")]
    fn over_commit_panics() {
        let mut t = CursorTable::new();
        t.register();
        t.advance_write(9, 8);
    }

    #[test]
    #[should_panic(expected = "signalled twice")]
    fn double_eof_panics() {
        let mut t = CursorTable::new();
        t.set_eof();
        t.set_eof();
    }
}
