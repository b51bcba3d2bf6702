//! A recording [`PcapSink`](ssh_packet_session::PcapSink) test double.
//!
//! Sessions default to [`ssh_packet_session::NullPcapSink`], which discards
//! everything. Tests that need to assert on exactly which packets crossed
//! the wire (not just what a handler observed) install a [`VecPcapSink`]
//! instead and inspect its recorded entries afterward.

use std::sync::{Arc, Mutex};

use ssh_packet_session::PcapSink;

/// One packet observed by a [`VecPcapSink`], tagged with its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPacket {
    /// `true` for a packet this session sent; `false` for one it received.
    pub outgoing: bool,
    /// The cleartext payload, type byte included.
    pub payload: Vec<u8>,
    /// The sequence number the packet was sent/received under.
    pub seq: u32,
}

/// Records every packet passed to it, in order, for later inspection.
///
/// Cloning shares the same backing log (an `Arc<Mutex<_>>`), so a test can
/// install one clone into a `Session` and keep another to read back from
/// after driving it.
#[derive(Debug, Clone, Default)]
pub struct VecPcapSink {
    captured: Arc<Mutex<Vec<CapturedPacket>>>,
}

impl VecPcapSink {
    /// A fresh, empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every packet captured so far, in capture order.
    #[must_use]
    pub fn captured(&self) -> Vec<CapturedPacket> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CapturedPacket>> {
        self.captured.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl PcapSink for VecPcapSink {
    fn on_incoming(&mut self, cleartext_payload: &[u8], seq: u32) {
        self.lock().push(CapturedPacket {
            outgoing: false,
            payload: cleartext_payload.to_vec(),
            seq,
        });
    }

    fn on_outgoing(&mut self, cleartext_payload: &[u8], seq: u32) {
        self.lock().push(CapturedPacket { outgoing: true, payload: cleartext_payload.to_vec(), seq });
    }
}
