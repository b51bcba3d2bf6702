//! The outgoing framer: pad, optionally compress first, encrypt,
//! authenticate, and write one complete packet.

use ssh_packet_core::{PacketError, SessionState};
use ssh_packet_crypto::MacOrder;
use ssh_packet_proto::{MessageType, MAX_PACKET_LEN, MIN_PADDING_LEN};

use crate::session::Session;
use crate::socket::ByteSink;

impl<S: ByteSink> Session<S> {
    /// Frame and send `payload` (message type byte followed by body).
    ///
    /// Compression runs before padding is chosen, since the padded length
    /// must be computed from the post-compression payload size (distilled
    /// §4.5). Padding is random once a cipher is active and zero-filled by
    /// [`ssh_packet_crypto::NullBinding`] before key exchange.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), PacketError> {
        if self.phase.session_state == SessionState::Error {
            return Err(PacketError::InvalidState("session is in the error state".to_string()));
        }

        self.out_buffer.reinit();
        self.out_buffer.append(payload);

        if let Some(deflator) = self.crypto.out_compress.as_mut() {
            let compressed = deflator.compress(self.out_buffer.peek()).map_err(PacketError::from)?;
            self.out_buffer.reinit();
            self.out_buffer.append(&compressed);
        }

        let blocksize = self.crypto.out_binding.blocksize().max(1);
        let lfb = self.crypto.out_binding.lenfield_blocksize();
        // The length field only counts toward the block-alignment target
        // when it travels encrypted alongside the rest of the packet
        // (classic ordering); AEAD/EtM ciphers carry it in the clear and
        // align only the padding_length+payload+padding region.
        let correction = if lfb == 0 { 0 } else { 4 };
        let base = 1 + self.out_buffer.len();

        let mut padding_length = blocksize - (base + correction) % blocksize;
        if padding_length == blocksize {
            padding_length = 0;
        }
        if padding_length < usize::from(MIN_PADDING_LEN) {
            padding_length += blocksize;
        }

        let mut padding = vec![0u8; padding_length];
        self.crypto.out_binding.prng_fill(&mut padding).map_err(PacketError::from)?;
        self.out_buffer.append(&padding);
        self.out_buffer.prepend(&[padding_length as u8]);

        let packet_length = self.out_buffer.len() as u32;
        if packet_length > MAX_PACKET_LEN {
            return Err(PacketError::LenTooLarge { len: packet_length, max: MAX_PACKET_LEN });
        }
        self.out_buffer.prepend(&packet_length.to_be_bytes());

        let seq = self.sequence.send_seq;
        let mac_order = self.crypto.out_binding.mac_order();
        let encrypt_from = if lfb == 0 { 4 } else { 0 };
        let region_len = self.out_buffer.len();

        let trailing = match mac_order {
            MacOrder::EncryptAndMac => {
                let mac = self
                    .crypto
                    .out_binding
                    .mac_compute(seq, self.out_buffer.peek())
                    .map_err(PacketError::from)?;
                let region = &mut self.out_buffer.peek_mut()[encrypt_from..region_len];
                self.crypto.out_binding.encrypt(seq, region).map_err(PacketError::from)?;
                mac
            },
            MacOrder::EncryptThenMac => {
                let region = &mut self.out_buffer.peek_mut()[encrypt_from..region_len];
                self.crypto.out_binding.encrypt(seq, region).map_err(PacketError::from)?;
                self.crypto.out_binding.mac_compute(seq, self.out_buffer.peek()).map_err(PacketError::from)?
            },
            MacOrder::Aead => {
                let region = &mut self.out_buffer.peek_mut()[encrypt_from..region_len];
                self.crypto.out_binding.encrypt(seq, region).map_err(PacketError::from)?.unwrap_or_default()
            },
        };
        if !trailing.is_empty() {
            self.out_buffer.append(&trailing);
        }

        self.sink
            .write_all(self.out_buffer.peek())
            .map_err(|err| PacketError::InvalidState(format!("sink write failed: {err}")))?;
        self.pcap.on_outgoing(self.out_buffer.peek(), seq);
        self.sequence.record_send();
        if let Some(raw) = self.raw_counters.as_mut() {
            raw.record_out(self.out_buffer.len() as u64);
        }
        self.out_buffer.reinit();
        Ok(())
    }

    /// Synthesize and send `SSH_MSG_UNIMPLEMENTED` referencing the packet
    /// received under `rejected_seq` (C7 fallback).
    pub(crate) fn send_unimplemented(&mut self, rejected_seq: u32) -> Result<(), PacketError> {
        let mut payload = Vec::with_capacity(5);
        payload.push(MessageType::Unimplemented.to_u8());
        payload.extend_from_slice(&rejected_seq.to_be_bytes());
        self.send(&payload)
    }
}
