//! Producer and reader handles over a shared byte ring.
//!
//! # Design
//! - **Writer**: [`StreamWriter`] is the only handle that appends. It is
//!   `Send` but each method takes `&mut self`, so a single thread drives it.
//! - **Readers**: each [`StreamReader`] owns one cursor and is moved to its
//!   consumer thread. Readers never block each other; they only hold the
//!   producer back once the slowest of them is `capacity` bytes behind.
//! - **Views**: [`WriteView`] and [`ReadView`] borrow their handle mutably and
//!   expose the granted range as at most two slices. Committing consumes the
//!   view, so no slice outlives the grant it was made from.
//!
//! # Usage
//! ```
//! use spool_ring::{RingConfig, StreamWriter};
//!
//! let mut writer = StreamWriter::create(RingConfig::new(16));
//! let mut reader = writer.add_reader();
//!
//! let mut input = writer.wait_input().unwrap();
//! let (head, _) = input.slices_mut();
//! head[..5].copy_from_slice(b"hello");
//! input.commit(5);
//! writer.signal_eof();
//!
//! let output = reader.wait_output().unwrap();
//! assert_eq!(output.to_vec(), b"hello");
//! output.commit(5);
//! assert!(reader.wait_output().unwrap().is_empty());
//! writer.close();
//! ```
//!
//! # Cancellation
//! Dropping the writer before [`StreamWriter::signal_eof`], or a reader before
//! it has seen its end of stream, cancels the stream: every blocked or future
//! wait returns [`RingError::Cancelled`]. A failing peer therefore never
//! leaves its siblings blocked forever.

use crate::cursor::{CursorSnapshot, ReaderId, StreamState};
use crate::error::RingError;
use crate::ring::RingConfig;
use crate::scatter::ScatterDescriptor;
use crate::sync::Shared;
use std::io::{IoSlice, IoSliceMut};
use std::sync::Arc;

/// The producer side of a byte ring.
pub struct StreamWriter {
    shared: Arc<Shared>,
    /// Set once end of stream has been signalled.
    eof: bool,
}

/// One consumer's handle on a byte ring.
pub struct StreamReader {
    shared: Arc<Shared>,
    id: ReaderId,
    /// Set once the zero-length terminal view has been handed out.
    done: bool,
}

/// Writable space granted by [`StreamWriter::wait_input`].
pub struct WriteView<'a> {
    writer: &'a mut StreamWriter,
    desc: ScatterDescriptor,
}

/// Unread bytes granted by [`StreamReader::wait_output`].
pub struct ReadView<'a> {
    reader: &'a mut StreamReader,
    desc: ScatterDescriptor,
}

impl StreamWriter {
    /// Allocates the storage and returns the only writer for it.
    pub fn create(cfg: RingConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(cfg.capacity)),
            eof: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }

    /// Registers a reader positioned at the current write offset.
    ///
    /// Readers should be registered before the first commit; a reader added
    /// later sees only bytes committed after its registration.
    pub fn add_reader(&self) -> StreamReader {
        StreamReader {
            id: self.shared.register(),
            shared: Arc::clone(&self.shared),
            done: false,
        }
    }

    /// Blocks until at least one byte of space is free, then grants all free
    /// space. The grant may be smaller than the data the caller has; callers
    /// loop.
    ///
    /// # Errors
    /// [`RingError::Cancelled`] if any peer cancelled the stream.
    pub fn wait_input(&mut self) -> Result<WriteView<'_>, RingError> {
        assert!(!self.eof, "input requested after end of stream");
        let desc = self.shared.wait_space()?;
        Ok(WriteView { writer: self, desc })
    }

    /// Marks the end of the stream and wakes every reader.
    ///
    /// # Panics
    /// Panics if called twice.
    pub fn signal_eof(&mut self) {
        assert!(!self.eof, "end of stream signalled twice");
        self.shared.signal_eof();
        self.eof = true;
    }

    /// Cancels the stream for every handle.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Tears the stream down.
    ///
    /// # Panics
    /// Panics unless end of stream was signalled and every reader has drained
    /// to the final write offset.
    pub fn close(self) {
        self.shared.close();
    }

    pub fn state(&self) -> StreamState {
        self.shared.state()
    }

    pub fn snapshot(&self) -> CursorSnapshot {
        self.shared.snapshot()
    }
}

impl Drop for StreamWriter {
    fn drop(&mut self) {
        if !self.eof {
            self.shared.cancel();
        }
    }
}

impl StreamReader {
    /// Blocks until there are unread bytes and grants all of them, or returns
    /// an empty view once the stream has ended and everything was consumed.
    ///
    /// The empty view is the only end-of-stream signal and is handed out once.
    ///
    /// # Errors
    /// [`RingError::Cancelled`] if any peer cancelled the stream.
    ///
    /// # Panics
    /// Panics if called again after the empty view.
    pub fn wait_output(&mut self) -> Result<ReadView<'_>, RingError> {
        assert!(!self.done, "output requested after end of stream");
        let desc = self.shared.wait_data(self.id)?;
        if desc.is_empty() {
            self.done = true;
        }
        Ok(ReadView { reader: self, desc })
    }

    /// Cancels the stream for every handle.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Whether this reader has received its end of stream.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn state(&self) -> StreamState {
        self.shared.state()
    }
}

impl Drop for StreamReader {
    fn drop(&mut self) {
        if !self.done {
            self.shared.cancel();
        }
    }
}

impl WriteView<'_> {
    pub fn descriptor(&self) -> &ScatterDescriptor {
        &self.desc
    }

    pub fn len(&self) -> usize {
        self.desc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.desc.is_empty()
    }

    /// The granted space as two slices; the second is empty unless the grant
    /// wraps.
    pub fn slices_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        let store = &self.writer.shared.store;
        let segs = self.desc.segments();
        // SAFETY: the grant lies beyond every reader's unread range, the two
        // segments are disjoint, and `&mut self` keeps the borrows unique.
        unsafe {
            let head = store.segment_mut(segs[0]);
            let tail: &mut [u8] = match segs.get(1) {
                Some(seg) => store.segment_mut(*seg),
                None => &mut [],
            };
            (head, tail)
        }
    }

    /// The granted space for `Read::read_vectored`.
    pub fn io_slices_mut(&mut self) -> [IoSliceMut<'_>; 2] {
        let (head, tail) = self.slices_mut();
        [IoSliceMut::new(head), IoSliceMut::new(tail)]
    }

    /// Copies as much of `src` as fits and returns the count copied. The
    /// bytes are not visible to readers until [`commit`](Self::commit).
    pub fn fill_from(&mut self, src: &[u8]) -> usize {
        let (head, tail) = self.slices_mut();
        let a = src.len().min(head.len());
        head[..a].copy_from_slice(&src[..a]);
        let b = (src.len() - a).min(tail.len());
        tail[..b].copy_from_slice(&src[a..a + b]);
        a + b
    }

    /// Publishes the first `n` granted bytes to every reader.
    ///
    /// # Panics
    /// Panics if `n` exceeds the grant.
    pub fn commit(self, n: usize) {
        assert!(n <= self.desc.len(), "commit of {n} bytes exceeds grant of {}", self.desc.len());
        self.writer.shared.commit_space(n);
    }
}

impl ReadView<'_> {
    pub fn descriptor(&self) -> &ScatterDescriptor {
        &self.desc
    }

    pub fn len(&self) -> usize {
        self.desc.len()
    }

    /// An empty view means end of stream.
    pub fn is_empty(&self) -> bool {
        self.desc.is_empty()
    }

    /// Limits the view to its first `limit` bytes.
    pub fn clip(&mut self, limit: usize) {
        self.desc.clip(limit);
    }

    pub fn slices(&self) -> (&[u8], &[u8]) {
        let store = &self.reader.shared.store;
        let segs = self.desc.segments();
        // SAFETY: these bytes are committed and sit between this reader's
        // offset and the write offset; the producer cannot be granted them
        // until this reader commits, which consumes the view.
        unsafe {
            let head = store.segment(segs[0]);
            let tail: &[u8] = match segs.get(1) {
                Some(seg) => store.segment(*seg),
                None => &[],
            };
            (head, tail)
        }
    }

    /// The unread bytes for `Write::write_vectored`.
    pub fn io_slices(&self) -> [IoSlice<'_>; 2] {
        let (head, tail) = self.slices();
        [IoSlice::new(head), IoSlice::new(tail)]
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let (head, tail) = self.slices();
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(head);
        out.extend_from_slice(tail);
        out
    }

    /// Marks the first `n` bytes consumed by this reader.
    ///
    /// # Panics
    /// Panics if `n` exceeds the (possibly clipped) view.
    pub fn commit(self, n: usize) {
        assert!(n <= self.desc.len(), "commit of {n} bytes exceeds view of {}", self.desc.len());
        self.reader.shared.commit_data(self.reader.id, n);
    }
}
