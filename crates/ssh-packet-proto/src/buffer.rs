//! Growable byte buffer with prepend/append/consume/peek.
//!
//! `Buffer` is the sole owner of its backing storage. Every operation that
//! can reallocate (`allocate`, `append`, `prepend` past the front slack) is
//! documented as invalidating slices returned by earlier calls; callers in
//! this workspace never retain a `peek()`/`allocate()` slice across a
//! mutating call.

/// Growable byte container used for in-flight packet assembly.
///
/// Internally this is a `Vec<u8>` plus a `start` cursor so that
/// `consume_front` is O(1) amortized (it just advances the cursor) instead
/// of shifting the whole buffer on every packet.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    data: Vec<u8>,
    start: usize,
}

impl Buffer {
    /// Create a new, empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new(), start: 0 }
    }

    /// Create an empty buffer with room for at least `capacity` bytes
    /// without reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity), start: 0 }
    }

    /// Reset the buffer to empty, retaining its allocated capacity.
    pub fn reinit(&mut self) {
        self.data.clear();
        self.start = 0;
    }

    /// Number of valid (unconsumed) bytes currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() - self.start
    }

    /// True if there are no valid bytes left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the valid bytes without consuming them.
    #[must_use]
    pub fn peek(&self) -> &[u8] {
        &self.data[self.start..]
    }

    /// Borrow the valid bytes mutably without consuming them.
    pub fn peek_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.start..]
    }

    /// Append `bytes` to the end of the buffer.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Grow the buffer by `n` zero-filled bytes and return a mutable slice
    /// over exactly those new bytes, for the caller to fill in place.
    pub fn allocate(&mut self, n: usize) -> &mut [u8] {
        let old_len = self.data.len();
        self.data.resize(old_len + n, 0);
        &mut self.data[old_len..]
    }

    /// Insert `bytes` before the current front of the buffer.
    ///
    /// If there is unused slack before `start` (left over from a previous
    /// `consume_front`), the bytes are written in place with no
    /// reallocation. Otherwise a new backing vector is built.
    pub fn prepend(&mut self, bytes: &[u8]) {
        if bytes.len() <= self.start {
            let new_start = self.start - bytes.len();
            self.data[new_start..self.start].copy_from_slice(bytes);
            self.start = new_start;
            return;
        }

        let mut rebuilt = Vec::with_capacity(bytes.len() + self.len());
        rebuilt.extend_from_slice(bytes);
        rebuilt.extend_from_slice(&self.data[self.start..]);
        self.data = rebuilt;
        self.start = 0;
    }

    /// Drop the first `n` valid bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds `len()`. Callers only ever consume bytes they
    /// have already validated as present.
    pub fn consume_front(&mut self, n: usize) {
        assert!(n <= self.len(), "consume_front: n exceeds buffer length");
        self.start += n;
        if self.start == self.data.len() {
            self.reinit();
        }
    }

    /// Drop the last `n` valid bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds `len()`.
    pub fn consume_back(&mut self, n: usize) {
        assert!(n <= self.len(), "consume_back: n exceeds buffer length");
        let new_len = self.data.len() - n;
        self.data.truncate(new_len);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Buffer;

    #[test]
    fn append_then_peek_round_trips() {
        let mut buf = Buffer::new();
        buf.append(b"hello");
        assert_eq!(buf.peek(), b"hello");
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn prepend_with_slack_is_in_place() {
        let mut buf = Buffer::new();
        buf.append(b"world");
        buf.consume_front(0); // no-op, just establishes start = 0
        buf.prepend(b"hi-");
        assert_eq!(buf.peek(), b"hi-world");
    }

    #[test]
    fn consume_front_then_prepend_reuses_slack() {
        let mut buf = Buffer::new();
        buf.append(b"XXXhello");
        buf.consume_front(3);
        assert_eq!(buf.peek(), b"hello");
        buf.prepend(b"abc");
        assert_eq!(buf.peek(), b"abchello");
    }

    #[test]
    fn consume_back_trims_tail() {
        let mut buf = Buffer::new();
        buf.append(b"hello-pad");
        buf.consume_back(4);
        assert_eq!(buf.peek(), b"hello");
    }

    #[test]
    fn allocate_returns_zeroed_writable_tail() {
        let mut buf = Buffer::new();
        buf.append(b"abc");
        let slot = buf.allocate(2);
        slot.copy_from_slice(b"de");
        assert_eq!(buf.peek(), b"abcde");
    }

    #[test]
    fn reinit_clears_but_keeps_capacity() {
        let mut buf = Buffer::with_capacity(64);
        buf.append(&[0u8; 40]);
        buf.reinit();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    proptest! {
        #[test]
        fn append_and_consume_front_is_fifo(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..16)) {
            let mut buf = Buffer::new();
            let mut model: Vec<u8> = Vec::new();

            for chunk in &chunks {
                buf.append(chunk);
                model.extend_from_slice(chunk);
            }
            prop_assert_eq!(buf.peek(), model.as_slice());

            while !model.is_empty() {
                let take = model.len().min(7);
                let expected: Vec<u8> = model.drain(..take).collect();
                prop_assert_eq!(&buf.peek()[..take], expected.as_slice());
                buf.consume_front(take);
            }
            prop_assert!(buf.is_empty());
        }
    }
}
