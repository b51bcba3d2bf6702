//! The incoming framer: `INIT -> SIZEREAD -> PROCESSING`, driven one
//! packet at a time by [`Session::feed`].
//!
//! Every fallible step returns [`PacketError`], which [`Session::feed`]
//! turns into a forced transition to [`ssh_packet_core::SessionState::Error`]
//! rather than propagating. Once a session is in that state it stops
//! processing entirely.

use ssh_packet_core::{filter, FilterResult, PacketError, SessionState};
use ssh_packet_crypto::MacOrder;
use ssh_packet_proto::{MessageType, MAX_PACKET_LEN, MIN_PADDING_LEN};

use crate::dispatch::{DispatchOutcome, HandlerInput, SessionAction};
use crate::session::{FramerState, Session};
use crate::socket::ByteSink;

impl<S: ByteSink> Session<S> {
    /// Feed newly arrived wire bytes into the session.
    ///
    /// Returns the number of bytes consumed, `<= bytes.len()`. The caller
    /// retains whatever was not consumed and represents it, concatenated
    /// with any further bytes it reads, on a later call. This crate never
    /// buffers unconsumed input of its own. A call that arrives while a
    /// previous call is still on the stack (a handler driving I/O that
    /// loops back into `feed`) returns `0` immediately without touching
    /// session state.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        if self.phase.session_state == SessionState::Error {
            return 0;
        }
        if self.guard_active {
            tracing::warn!("feed called re-entrantly; ignoring until the outer call returns");
            return 0;
        }

        self.guard_active = true;
        let mut total_consumed = 0usize;
        loop {
            match self.try_consume_packet(&bytes[total_consumed..]) {
                Ok(0) => break,
                Ok(n) => {
                    total_consumed += n;
                    if total_consumed >= bytes.len() {
                        break;
                    }
                },
                Err(err) => {
                    self.fail(err);
                    total_consumed = bytes.len();
                    break;
                },
            }
        }
        self.guard_active = false;
        total_consumed
    }

    /// Attempt to parse and fully process exactly one packet from the
    /// front of `bytes`. Returns `Ok(0)` if `bytes` does not yet hold a
    /// complete packet (nothing is mutated in that case beyond scratch
    /// state that is reset at the top of the next attempt).
    fn try_consume_packet(&mut self, bytes: &[u8]) -> Result<usize, PacketError> {
        self.framer_state = FramerState::Init;

        let lfb = self.crypto.in_binding.lenfield_blocksize();
        let first_read = if lfb == 0 { 4 } else { lfb };
        if bytes.len() < first_read {
            return Ok(0);
        }

        self.in_buffer.reinit();
        let seq = self.sequence.recv_seq;

        let packet_length = if lfb == 0 {
            let mut len_bytes = [0u8; 4];
            len_bytes.copy_from_slice(&bytes[..4]);
            self.in_buffer.append(&bytes[..4]);
            u32::from_be_bytes(len_bytes)
        } else {
            let out = self.in_buffer.allocate(lfb);
            self.crypto.in_binding.decrypt_len(seq, &bytes[..lfb], out)?
        };

        if packet_length > MAX_PACKET_LEN {
            return Err(PacketError::LenTooLarge { len: packet_length, max: MAX_PACKET_LEN });
        }
        let signed_remaining = i64::from(packet_length) - (first_read as i64 - 4);
        if signed_remaining < 0 {
            return Err(PacketError::LenNegativeRemainder {
                len: packet_length,
                lenfield_blocksize: lfb,
            });
        }
        let packet_remaining = signed_remaining as usize;

        self.framer_state = FramerState::SizeRead;
        let mac_len = self.crypto.in_binding.mac_len();
        let total_needed = first_read + packet_remaining + mac_len;
        if bytes.len() < total_needed {
            return Ok(0);
        }

        let tail_ciphertext = &bytes[first_read..first_read + packet_remaining];
        let mac_bytes = &bytes[first_read + packet_remaining..total_needed];

        match self.crypto.in_binding.mac_order() {
            MacOrder::EncryptAndMac => {
                let out = self.in_buffer.allocate(packet_remaining);
                self.crypto.in_binding.decrypt(seq, out, tail_ciphertext, first_read)?;
                let ok = self.crypto.in_binding.hmac_verify(seq, self.in_buffer.peek(), mac_bytes)?;
                if !ok {
                    return Err(PacketError::MacFail);
                }
            },
            MacOrder::EncryptThenMac => {
                let ciphertext_region = &bytes[..first_read + packet_remaining];
                let ok = self.crypto.in_binding.hmac_verify(seq, ciphertext_region, mac_bytes)?;
                if !ok {
                    return Err(PacketError::MacFail);
                }
                let out = self.in_buffer.allocate(packet_remaining);
                self.crypto.in_binding.decrypt(seq, out, tail_ciphertext, first_read)?;
            },
            MacOrder::Aead => {
                let mut combined = Vec::with_capacity(tail_ciphertext.len() + mac_bytes.len());
                combined.extend_from_slice(tail_ciphertext);
                combined.extend_from_slice(mac_bytes);
                let out = self.in_buffer.allocate(packet_remaining);
                self.crypto.in_binding.decrypt(seq, out, &combined, first_read)?;
            },
        }

        // `in_buffer` now holds the cleartext 4-byte length field followed
        // by padding_length, payload, and padding.
        self.in_buffer.consume_front(4);
        if self.in_buffer.is_empty() {
            return Err(PacketError::PaddingInvalid { padding_length: 0, remaining: 0 });
        }
        let padding_length = self.in_buffer.peek()[0];
        self.in_buffer.consume_front(1);

        if padding_length < MIN_PADDING_LEN || usize::from(padding_length) > self.in_buffer.len() {
            return Err(PacketError::PaddingInvalid {
                padding_length,
                remaining: self.in_buffer.len(),
            });
        }
        self.in_buffer.consume_back(usize::from(padding_length));

        if let Some(inflator) = self.crypto.in_compress.as_mut() {
            let decompressed = inflator
                .decompress(self.in_buffer.peek(), MAX_PACKET_LEN as usize)
                .map_err(PacketError::from)?;
            if decompressed.is_empty() {
                return Err(PacketError::DecompCorrupt("decompressed to zero bytes".to_string()));
            }
            self.in_buffer.reinit();
            self.in_buffer.append(&decompressed);
        }

        if self.in_buffer.is_empty() {
            return Err(PacketError::PaddingInvalid { padding_length, remaining: 0 });
        }

        self.sequence.record_recv();
        if let Some(raw) = self.raw_counters.as_mut() {
            raw.record_in(total_needed as u64);
        }
        // Capture the full cleartext packet, type byte included, before
        // stripping it for dispatch — mirrors `on_outgoing`, which is
        // handed the complete framed packet.
        self.pcap.on_incoming(self.in_buffer.peek(), seq);

        let type_byte = self.in_buffer.peek()[0];
        self.in_buffer.consume_front(1);
        let msg_type = MessageType::from_u8(type_byte);

        self.framer_state = FramerState::Processing;
        self.process_one(msg_type, seq)?;
        self.framer_state = FramerState::Init;

        Ok(total_needed)
    }

    /// Filter then dispatch one fully-framed packet.
    fn process_one(&mut self, msg_type: MessageType, seq: u32) -> Result<(), PacketError> {
        match filter(msg_type, &self.phase, &self.filter_context) {
            FilterResult::Denied => Err(PacketError::FilterDenied { msg_type: msg_type.to_u8() }),
            FilterResult::Unknown => self.send_unimplemented(seq),
            FilterResult::Allowed => {
                let input = HandlerInput { msg_type, payload: self.in_buffer.peek(), recv_seq: seq };
                match self.registry.dispatch(&input) {
                    DispatchOutcome::Handled(actions) => self.apply_actions(actions),
                    DispatchOutcome::Unhandled(actions) => {
                        self.apply_actions(actions)?;
                        self.send_unimplemented(seq)
                    },
                }
            },
        }
    }

    fn apply_actions(&mut self, actions: Vec<SessionAction>) -> Result<(), PacketError> {
        for action in actions {
            match action {
                SessionAction::Send(payload) => self.send(&payload)?,
            }
        }
        Ok(())
    }
}
