//! The I/O seams a [`crate::Session`] is driven through.
//!
//! Neither trait assumes a particular transport. The demo binary backs
//! [`ByteSink`] with a `std::net::TcpStream`; the harness backs it with an
//! in-memory buffer so tests can feed adversarial chunk sizes without a
//! real socket.

use std::io;

/// Where a session's outgoing wire bytes go.
///
/// Modeled on `std::io::Write` but kept as its own trait so a `Session` can
/// require exactly the one method it needs without dragging in the rest of
/// `Write`'s surface (`flush`, vectored writes, etc.), matching the
/// narrow-seam style this workspace's transport layer uses for its socket
/// abstraction.
pub trait ByteSink {
    /// Write the full contents of `bytes`, or fail.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<W: io::Write> ByteSink for W {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, bytes)
    }
}

/// Optional observer for every fully-framed packet crossing the wire in
/// either direction, independent of whether a handler consumed it.
///
/// Grounded on this workspace's packet-capture sink pattern: a tap that
/// cannot affect the protocol state machine, only observe it.
pub trait PcapSink: Send {
    /// Called after a complete packet has been parsed off the wire.
    fn on_incoming(&mut self, cleartext_payload: &[u8], seq: u32);

    /// Called just before a complete framed packet is written to the sink.
    fn on_outgoing(&mut self, cleartext_payload: &[u8], seq: u32);
}

/// A [`PcapSink`] that discards everything. The default for sessions that
/// do not need capture.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPcapSink;

impl PcapSink for NullPcapSink {
    fn on_incoming(&mut self, _cleartext_payload: &[u8], _seq: u32) {}
    fn on_outgoing(&mut self, _cleartext_payload: &[u8], _seq: u32) {}
}
