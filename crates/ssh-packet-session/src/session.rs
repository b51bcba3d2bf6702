//! The session driver: owns every piece of per-connection state and is the
//! single synchronous entry point both directions of traffic go through.
//!
//! `Session` itself holds no framing logic. [`crate::incoming`] and
//! [`crate::outgoing`] each contribute an `impl Session` block. This mirrors
//! the server driver's composition style in the lineage this crate was
//! built from: one owner struct, several files each responsible for one
//! slice of its behavior.

use ssh_packet_core::{FilterContext, PacketError, RawCounters, Role, SequenceCounters, SessionPhase};
use ssh_packet_crypto::{CryptoBinding, Deflator, Inflator, NullBinding};
use ssh_packet_proto::Buffer;

use crate::dispatch::HandlerRegistry;
use crate::flowcontrol::ChannelRegistry;
use crate::socket::{ByteSink, NullPcapSink, PcapSink};

/// Construction-time configuration for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Client or server.
    pub role: Role,
    /// `zlib` level (1-9) used once compression is enabled.
    pub compression_level: u32,
    /// Whether to maintain [`RawCounters`] (wire byte/packet totals).
    pub track_raw_counters: bool,
}

impl SessionConfig {
    /// Sensible defaults for `role`: compression level 6, raw counters on.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self { role, compression_level: 6, track_raw_counters: true }
    }
}

/// Per-direction cipher/MAC bindings and compression state. Neither
/// binding implements a cipher itself: both start as [`NullBinding`] and
/// are replaced once key exchange completes.
pub(crate) struct CryptoState {
    pub in_binding: Box<dyn CryptoBinding>,
    pub out_binding: Box<dyn CryptoBinding>,
    pub in_compress: Option<Inflator>,
    pub out_compress: Option<Deflator>,
    pub compression_level: u32,
}

/// Sub-step of framing one incoming packet, tracked only for observability.
/// No control-flow decision in this crate actually branches on it across
/// calls, since a
/// short read returns `0` without mutating anything and is retried from
/// scratch on the next `feed` with more bytes available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerState {
    /// Idle, ready to start parsing the next packet's length field.
    Init,
    /// Length parsed; waiting for/parsing the rest of the packet.
    SizeRead,
    /// A complete packet is being filtered and dispatched.
    Processing,
}

/// Everything needed to frame, encrypt/decrypt, filter, and dispatch SSH
/// binary packets over one connection, in one direction pair.
///
/// `Session` is generic over its outgoing sink so the demo binary can plug
/// in a `TcpStream` and the test harness can plug in an in-memory buffer
/// without either depending on the other.
pub struct Session<S: ByteSink> {
    pub(crate) sink: S,
    pub(crate) crypto: CryptoState,
    pub(crate) in_buffer: Buffer,
    pub(crate) out_buffer: Buffer,
    pub(crate) phase: SessionPhase,
    pub(crate) sequence: SequenceCounters,
    pub(crate) raw_counters: Option<RawCounters>,
    pub(crate) registry: HandlerRegistry,
    pub(crate) pcap: Box<dyn PcapSink>,
    pub(crate) channels: ChannelRegistry,
    pub(crate) filter_context: FilterContext,
    pub(crate) framer_state: FramerState,
    pub(crate) guard_active: bool,
    pub(crate) last_error: Option<PacketError>,
}

impl<S: ByteSink> Session<S> {
    /// Construct a fresh session, pre-key-exchange: [`NullBinding`] in both
    /// directions, no compression, sequence counters at zero.
    pub fn new(sink: S, config: SessionConfig) -> Self {
        Self {
            sink,
            crypto: CryptoState {
                in_binding: Box::new(NullBinding),
                out_binding: Box::new(NullBinding),
                in_compress: None,
                out_compress: None,
                compression_level: config.compression_level,
            },
            in_buffer: Buffer::new(),
            out_buffer: Buffer::new(),
            phase: SessionPhase::initial(config.role),
            sequence: SequenceCounters::new(),
            raw_counters: config.track_raw_counters.then(RawCounters::new),
            registry: HandlerRegistry::new(),
            pcap: Box::new(NullPcapSink),
            channels: ChannelRegistry::new(),
            filter_context: FilterContext::default(),
            framer_state: FramerState::Init,
            guard_active: false,
            last_error: None,
        }
    }

    /// Install new cipher/MAC bindings for each direction (called once key
    /// exchange produces session keys, and again on every subsequent
    /// re-key).
    pub fn install_crypto(
        &mut self,
        in_binding: Box<dyn CryptoBinding>,
        out_binding: Box<dyn CryptoBinding>,
    ) {
        self.crypto.in_binding = in_binding;
        self.crypto.out_binding = out_binding;
    }

    /// Enable incoming decompression. Idempotent-ish: replaces any existing
    /// stream, which loses its dictionary. Callers enable this exactly once,
    /// once "delayed compression" negotiation agrees the algorithm.
    pub fn enable_compression_in(&mut self) -> Result<(), PacketError> {
        self.crypto.in_compress = Some(Inflator::new().map_err(PacketError::from)?);
        Ok(())
    }

    /// Enable outgoing compression at the configured level.
    pub fn enable_compression_out(&mut self) -> Result<(), PacketError> {
        self.crypto.out_compress =
            Some(Deflator::new(self.crypto.compression_level).map_err(PacketError::from)?);
        Ok(())
    }

    /// Append another handler table to the dispatch registry.
    pub fn register_handler_table(&mut self, table: crate::dispatch::HandlerTable) {
        self.registry.register_table(table);
    }

    /// Replace the packet-capture sink. Defaults to a no-op sink.
    pub fn set_pcap_sink(&mut self, sink: Box<dyn PcapSink>) {
        self.pcap = sink;
    }

    /// Update the filter preconditions for pending global/channel requests.
    /// Owned by the channel multiplexer, out of scope here, but read by
    /// [`crate::incoming`] on every packet.
    pub fn set_filter_context(&mut self, ctx: FilterContext) {
        self.filter_context = ctx;
    }

    /// Channel flow-control fan-out registry.
    pub fn channels(&mut self) -> &mut ChannelRegistry {
        &mut self.channels
    }

    /// The socket reported `WRITE_WOULD_NOT_BLOCK`: fan that out to every
    /// registered channel. This is the session-side half of the downward
    /// `on_controlflow` callback the socket abstraction is expected to
    /// invoke; the socket glue itself lives outside this crate (the
    /// harness's `SimSocket` and the demo binary's `TcpStream` loop each
    /// decide when a write would have blocked).
    pub fn on_writable(&mut self) {
        self.channels.notify_all_writable();
    }

    /// Read-only view of the session phase the state filter consults.
    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Mutable view of the session phase, for the key-exchange/user-auth
    /// drivers that advance it.
    pub fn phase_mut(&mut self) -> &mut SessionPhase {
        &mut self.phase
    }

    /// Current send/receive sequence counters.
    #[must_use]
    pub fn sequence(&self) -> SequenceCounters {
        self.sequence
    }

    /// Current raw wire byte/packet counters, if enabled.
    #[must_use]
    pub fn raw_counters(&self) -> Option<RawCounters> {
        self.raw_counters
    }

    /// The last fatal error recorded, if the session has transitioned to
    /// the error state.
    #[must_use]
    pub fn last_error(&self) -> Option<&PacketError> {
        self.last_error.as_ref()
    }

    /// Sub-step of framing currently in progress (observability only).
    #[must_use]
    pub fn framer_state(&self) -> FramerState {
        self.framer_state
    }

    pub(crate) fn fail(&mut self, err: PacketError) {
        tracing::warn!(error = %err, "session entering error state");
        self.phase.force_error();
        self.last_error = Some(err);
    }
}

#[cfg(test)]
mod tests {
    use crate::flowcontrol::{ChannelId, ChannelSubscriber};

    use super::*;

    struct Counter(u32);

    impl ChannelSubscriber for Counter {
        fn on_writable(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn on_writable_fans_out_to_every_channel() {
        let mut session = Session::new(Vec::<u8>::new(), SessionConfig::new(Role::Server));
        session.channels().register(ChannelId(1), Box::new(Counter(0)));
        session.channels().register(ChannelId(2), Box::new(Counter(0)));

        session.on_writable();

        assert_eq!(session.channels().len(), 2);
    }
}
