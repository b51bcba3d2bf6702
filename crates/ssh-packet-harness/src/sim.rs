//! Deterministic socket simulation for framing tests.
//!
//! `SimSocket` holds a queue of bytes to deliver and a chunking strategy
//! that decides how many bytes arrive per `feed` call. The same wire
//! bytes exercised one-at-a-time, whole, or split at arbitrary points must
//! all produce the same observable session behavior: chunking is not
//! semantically visible.

use ssh_packet_session::{ByteSink, Session};

/// How a [`SimSocket`] slices its pending bytes across calls to `feed`.
#[derive(Debug, Clone)]
pub enum ChunkStrategy {
    /// Deliver the entire remaining buffer in one call.
    Whole,
    /// Deliver exactly one byte per call, the strategy most likely to
    /// expose a framer that assumes a full header always arrives intact.
    OneByteAtATime,
    /// Deliver bytes in fixed-size chunks, the last one possibly short.
    Fixed(usize),
    /// Deliver chunks of these exact sizes, in order; once exhausted,
    /// falls back to delivering everything remaining in one call.
    Exact(Vec<usize>),
}

/// A simulated incoming byte stream driving a [`Session`] under test.
pub struct SimSocket {
    pending: Vec<u8>,
    cursor: usize,
    strategy: ChunkStrategy,
    step: usize,
}

impl SimSocket {
    /// Build a socket that will deliver `bytes` according to `strategy`.
    #[must_use]
    pub fn new(bytes: Vec<u8>, strategy: ChunkStrategy) -> Self {
        Self { pending: bytes, cursor: 0, strategy, step: 0 }
    }

    fn remaining(&self) -> &[u8] {
        &self.pending[self.cursor..]
    }

    fn next_chunk_len(&mut self) -> usize {
        let remaining = self.pending.len() - self.cursor;
        if remaining == 0 {
            return 0;
        }
        let wanted = match &self.strategy {
            ChunkStrategy::Whole => remaining,
            ChunkStrategy::OneByteAtATime => 1,
            ChunkStrategy::Fixed(n) => *n,
            ChunkStrategy::Exact(sizes) => {
                let size = sizes.get(self.step).copied().unwrap_or(remaining);
                self.step += 1;
                size
            },
        };
        wanted.min(remaining).max(1)
    }

    /// Drive `session` until every pending byte has been consumed.
    ///
    /// At each step, a chunk is appended to whatever the session left
    /// unconsumed from the previous step before calling `feed` again. This
    /// is the retained-remainder contract real socket code follows.
    pub fn drive<S: ByteSink>(&mut self, session: &mut Session<S>) {
        let mut held = Vec::new();
        loop {
            if self.cursor >= self.pending.len() && held.is_empty() {
                break;
            }
            let chunk_len = self.next_chunk_len();
            if chunk_len > 0 {
                held.extend_from_slice(&self.pending[self.cursor..self.cursor + chunk_len]);
                self.cursor += chunk_len;
            }
            if held.is_empty() {
                break;
            }
            let consumed = session.feed(&held);
            if consumed == 0 && self.cursor >= self.pending.len() {
                // No progress possible and nothing left to add: the
                // remaining bytes are an incomplete trailing packet.
                break;
            }
            held.drain(..consumed);
        }
    }

    /// Bytes not yet delivered to the session.
    #[must_use]
    pub fn undelivered(&self) -> &[u8] {
        self.remaining()
    }
}

#[cfg(test)]
mod tests {
    use ssh_packet_core::Role;
    use ssh_packet_session::SessionConfig;

    use super::{ChunkStrategy, SimSocket};

    fn ignore_packet() -> Vec<u8> {
        vec![0x00, 0x00, 0x00, 0x0C, 0x0A, 0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    }

    #[test]
    fn one_byte_at_a_time_still_frames_correctly() {
        let mut session = Session::new(Vec::<u8>::new(), SessionConfig::new(Role::Server));
        let mut socket = SimSocket::new(ignore_packet(), ChunkStrategy::OneByteAtATime);
        socket.drive(&mut session);
        assert_eq!(session.sequence().recv_seq, 1);
    }

    #[test]
    fn whole_buffer_in_one_call_matches_byte_at_a_time() {
        let mut session = Session::new(Vec::<u8>::new(), SessionConfig::new(Role::Server));
        let mut socket = SimSocket::new(ignore_packet(), ChunkStrategy::Whole);
        socket.drive(&mut session);
        assert_eq!(session.sequence().recv_seq, 1);
    }

    #[test]
    fn two_packets_at_once_both_frame() {
        let mut session = Session::new(Vec::<u8>::new(), SessionConfig::new(Role::Server));
        let mut both = ignore_packet();
        both.extend_from_slice(&ignore_packet());
        let mut socket = SimSocket::new(both, ChunkStrategy::Whole);
        socket.drive(&mut session);
        assert_eq!(session.sequence().recv_seq, 2);
    }
}
