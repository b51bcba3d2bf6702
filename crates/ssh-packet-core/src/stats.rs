//! Sequence counters and optional raw byte/packet counters.

/// Per-direction monotonic packet sequence numbers.
///
/// Both counters start at zero and wrap on overflow: wrapping is accepted
/// behavior, matching the wire protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceCounters {
    /// Number of packets sent so far.
    pub send_seq: u32,
    /// Number of packets received so far.
    pub recv_seq: u32,
}

impl SequenceCounters {
    /// Fresh counters for a new session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a packet sent, returning the sequence number it was sent
    /// under (pre-increment value).
    pub fn record_send(&mut self) -> u32 {
        let seq = self.send_seq;
        self.send_seq = self.send_seq.wrapping_add(1);
        seq
    }

    /// Record a packet received, returning the sequence number it was
    /// received under (pre-increment value).
    pub fn record_recv(&mut self) -> u32 {
        let seq = self.recv_seq;
        self.recv_seq = self.recv_seq.wrapping_add(1);
        seq
    }
}

/// Optional raw byte/packet counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawCounters {
    /// Total bytes received on the wire (post-decryption accounting is not
    /// relevant here; this counts wire bytes).
    pub in_bytes: u64,
    /// Total bytes sent on the wire.
    pub out_bytes: u64,
    /// Total packets received.
    pub in_packets: u64,
    /// Total packets sent.
    pub out_packets: u64,
}

impl RawCounters {
    /// Fresh, zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `n` bytes and one packet received.
    pub fn record_in(&mut self, n: u64) {
        self.in_bytes = self.in_bytes.wrapping_add(n);
        self.in_packets = self.in_packets.wrapping_add(1);
    }

    /// Record `n` bytes and one packet sent.
    pub fn record_out(&mut self, n: u64) {
        self.out_bytes = self.out_bytes.wrapping_add(n);
        self.out_packets = self.out_packets.wrapping_add(1);
    }
}
