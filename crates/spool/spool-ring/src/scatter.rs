//! Scatter/gather descriptors over ring storage.
//!
//! A logical byte range of at most `capacity` bytes occupies either one
//! contiguous run of storage or, when it straddles the wrap point, two:
//!
//! ```text
//! capacity = 8, start index = 6, len = 5
//!
//!   index:  0 1 2 3 4 5 6 7
//!           [ 2nd ]     [1st]
//!           └─ 0..3     └─ 6..8
//! ```

/// Upper bound on the number of segments in a descriptor.
pub const MAX_SEGMENTS: usize = 2;

/// One contiguous run of storage: `[start, start + len)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub len: usize,
}

impl Segment {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// An ordered list of one or two storage segments describing one logical
/// byte range. The segments concatenated, in order, are the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterDescriptor {
    segs: [Segment; MAX_SEGMENTS],
    count: usize,
}

impl ScatterDescriptor {
    /// Describes `len` bytes beginning at storage index `start` in a ring of
    /// `capacity` bytes.
    ///
    /// # Panics
    /// Panics if `start >= capacity` or `len > capacity`.
    ///
    /// # Example
    /// ```
    /// use spool_ring::{ScatterDescriptor, Segment};
    /// let d = ScatterDescriptor::build(6, 5, 8);
    /// assert_eq!(d.segments(), &[Segment { start: 6, len: 2 }, Segment { start: 0, len: 3 }]);
    /// ```
    pub fn build(start: usize, len: usize, capacity: usize) -> Self {
        assert!(start < capacity, "start index {start} outside a {capacity} byte ring");
        assert!(len <= capacity, "range of {len} bytes exceeds a {capacity} byte ring");

        let head = capacity - start;
        if len <= head {
            Self {
                segs: [Segment { start, len }, Segment::default()],
                count: 1,
            }
        } else {
            Self {
                segs: [
                    Segment { start, len: head },
                    Segment {
                        start: 0,
                        len: len - head,
                    },
                ],
                count: 2,
            }
        }
    }

    /// A zero-length descriptor anchored at `start`.
    pub fn empty(start: usize) -> Self {
        Self {
            segs: [Segment { start, len: 0 }, Segment::default()],
            count: 1,
        }
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segs[..self.count]
    }

    /// Total bytes across all segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments().iter().map(|s| s.len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shortens the described range to at most `limit` bytes, dropping the
    /// second segment if the limit falls inside the first.
    pub fn clip(&mut self, limit: usize) {
        if limit >= self.len() {
            return;
        }
        let head = self.segs[0].len;
        if limit <= head {
            self.segs[0].len = limit;
            self.segs[1] = Segment::default();
            self.count = 1;
        } else {
            self.segs[1].len = limit - head;
        }
    }
}
