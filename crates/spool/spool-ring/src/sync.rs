//! Synchronization core: one lock over the cursor table plus two wait
//! conditions.
//!
//! - `space`: the producer waits here while the ring is full relative to the
//!   slowest reader.
//! - `data`: readers wait here while they have nothing unread and the stream
//!   has not ended.
//!
//! Every read or write of a cursor, of the EOF/closed/cancelled flags, and the
//! minimum-cursor scan happen with the lock held.

use crate::cursor::{CursorSnapshot, CursorTable, ReaderId, StreamState};
use crate::error::RingError;
use crate::ring::offset_to_index;
use crate::scatter::ScatterDescriptor;
use crate::store::RingStore;
use parking_lot::{Condvar, Mutex};
use tracing::debug;

pub(crate) struct Shared {
    pub(crate) store: RingStore,
    capacity: u64,
    table: Mutex<CursorTable>,
    space: Condvar,
    data: Condvar,
}

impl Shared {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            store: RingStore::new(capacity),
            capacity: capacity as u64,
            table: Mutex::new(CursorTable::new()),
            space: Condvar::new(),
            data: Condvar::new(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.store.capacity()
    }

    fn descriptor(&self, offset: u64, len: u64) -> ScatterDescriptor {
        let start = offset_to_index(offset, self.capacity) as usize;
        ScatterDescriptor::build(start, len as usize, self.store.capacity())
    }

    pub(crate) fn register(&self) -> ReaderId {
        self.table.lock().register()
    }

    /// Blocks until the producer has free space, then describes all of it.
    pub(crate) fn wait_space(&self) -> Result<ScatterDescriptor, RingError> {
        let mut table = self.table.lock();
        loop {
            if table.cancelled() {
                return Err(RingError::Cancelled);
            }
            assert!(!table.eof(), "input requested after end of stream");
            let space = table.input_space(self.capacity);
            if space > 0 {
                return Ok(self.descriptor(table.write_offset(), space));
            }
            self.space.wait(&mut table);
        }
    }

    pub(crate) fn commit_space(&self, n: usize) {
        if n == 0 {
            return;
        }
        self.table.lock().advance_write(n as u64, self.capacity);
        self.data.notify_all();
    }

    /// Blocks until `id` has unread bytes, then describes all of them. Returns
    /// an empty descriptor exactly once, when the stream has ended and the
    /// reader has consumed everything.
    pub(crate) fn wait_data(&self, id: ReaderId) -> Result<ScatterDescriptor, RingError> {
        let mut table = self.table.lock();
        loop {
            if table.cancelled() {
                return Err(RingError::Cancelled);
            }
            let read = table.read_offset(id);
            let avail = table.output_avail(id);
            if avail > 0 {
                return Ok(self.descriptor(read, avail));
            }
            if table.eof() {
                table.finish(id);
                let start = offset_to_index(read, self.capacity) as usize;
                return Ok(ScatterDescriptor::empty(start));
            }
            self.data.wait(&mut table);
        }
    }

    pub(crate) fn commit_data(&self, id: ReaderId, n: usize) {
        let freed = self.table.lock().advance_read(id, n as u64);
        if freed {
            // Only one producer ever waits on `space`.
            self.space.notify_one();
        }
    }

    pub(crate) fn signal_eof(&self) {
        let mut table = self.table.lock();
        table.set_eof();
        debug!(bytes = table.write_offset(), "end of stream");
        drop(table);
        self.data.notify_all();
    }

    pub(crate) fn cancel(&self) {
        let mut table = self.table.lock();
        if table.cancelled() {
            return;
        }
        table.set_cancelled();
        debug!(
            write_offset = table.write_offset(),
            min_read = table.min_read(),
            "stream cancelled"
        );
        drop(table);
        self.space.notify_all();
        self.data.notify_all();
    }

    pub(crate) fn close(&self) {
        let mut table = self.table.lock();
        table.set_closed();
        debug!(bytes = table.write_offset(), "stream closed");
    }

    pub(crate) fn state(&self) -> StreamState {
        self.table.lock().state()
    }

    pub(crate) fn snapshot(&self) -> CursorSnapshot {
        self.table.lock().snapshot()
    }
}
