//! Ring buffer configuration and logical-offset arithmetic.
//!
//! Every position in the stream is a monotonically increasing `u64` logical
//! offset. Offsets never wrap; only their mapping onto storage does, and that
//! mapping is computed at the point of memory access by [`offset_to_index`].

/// Configuration for a byte ring.
#[derive(Debug, Copy, Clone)]
pub struct RingConfig {
    /// Size of the storage region in bytes. Must be non-zero.
    pub capacity: usize,
}

impl RingConfig {
    /// Creates a new ring configuration with the specified capacity.
    ///
    /// Unlike slot rings, a byte ring has no power-of-two requirement: the
    /// physical index is a plain modulo.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    ///
    /// # Example
    /// ```
    /// use spool_ring::RingConfig;
    /// let cfg = RingConfig::new(1000);
    /// assert_eq!(cfg.capacity, 1000);
    /// ```
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be non-zero");
        Self { capacity }
    }
}

impl Default for RingConfig {
    /// One mebibyte, the default buffer size of both command-line tools.
    fn default() -> Self {
        Self::new(1024 * 1024)
    }
}

/// Converts a logical offset to a storage index.
///
/// With `capacity = 8`:
/// ```text
/// offset =  0 → 0
/// offset =  5 → 5
/// offset =  8 → 0  (wraps around)
/// offset = 15 → 7
/// ```
///
/// # Example
/// ```
/// use spool_ring::offset_to_index;
/// assert_eq!(offset_to_index(13, 8), 5);
/// ```
#[inline(always)]
pub fn offset_to_index(offset: u64, capacity: u64) -> u64 {
    offset % capacity
}

/// Bytes the producer may write without overwriting unread data.
///
/// `min_read` is the offset of the slowest reader. The producer is never more
/// than `capacity` bytes ahead of it, so the result is always in
/// `0..=capacity`.
#[inline(always)]
pub fn input_space(write: u64, min_read: u64, capacity: u64) -> u64 {
    let ahead = write - min_read;
    debug_assert!(ahead <= capacity, "producer {ahead} bytes ahead of a {capacity} byte ring");
    capacity - ahead
}

/// Bytes committed but not yet consumed by a reader at `read`.
#[inline(always)]
pub fn output_avail(write: u64, read: u64) -> u64 {
    debug_assert!(read <= write, "reader at {read} is past the writer at {write}");
    write - read
}
