//! Deterministic, non-cryptographic [`CryptoBinding`] fixtures.
//!
//! These exist purely to exercise the EncryptAndMac/EncryptThenMac/AEAD
//! branches of the incoming and outgoing framers in tests. They are a
//! reversible XOR stream plus an additive checksum, not a real cipher or
//! MAC, and must never be used outside `#[cfg(test)]`/harness contexts.

use ssh_packet_crypto::{CryptoBinding, CryptoError, MacOrder};

/// A fixture binding covering one of the three MAC orderings.
#[derive(Debug, Clone, Copy)]
pub struct FixtureBinding {
    blocksize: usize,
    lenfield_blocksize: usize,
    mac_len: usize,
    mac_order: MacOrder,
    key: u8,
}

impl FixtureBinding {
    /// Classic ordering: length field travels encrypted, block size 8,
    /// a 4-byte checksum MAC computed over the cleartext packet.
    #[must_use]
    pub fn encrypt_and_mac(key: u8) -> Self {
        Self { blocksize: 8, lenfield_blocksize: 8, mac_len: 4, mac_order: MacOrder::EncryptAndMac, key }
    }

    /// `*-etm@openssh.com` style: length field clear, checksum MAC
    /// computed over the ciphertext (including the clear length prefix).
    #[must_use]
    pub fn encrypt_then_mac(key: u8) -> Self {
        Self { blocksize: 8, lenfield_blocksize: 0, mac_len: 4, mac_order: MacOrder::EncryptThenMac, key }
    }

    /// AEAD style: length field clear, 4-byte tag produced/verified inside
    /// `encrypt`/`decrypt` itself.
    #[must_use]
    pub fn aead(key: u8) -> Self {
        Self { blocksize: 8, lenfield_blocksize: 0, mac_len: 4, mac_order: MacOrder::Aead, key }
    }

    fn keystream_byte(&self, seq: u32, pos: usize) -> u8 {
        let seq_bytes = seq.to_be_bytes();
        seq_bytes[pos % 4] ^ self.key ^ (pos as u8)
    }

    fn encrypt_offset(&self) -> usize {
        if self.lenfield_blocksize == 0 { 4 } else { 0 }
    }

    fn checksum(&self, seq: u32, data: &[u8]) -> Vec<u8> {
        let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        let seq_bytes = seq.to_be_bytes();
        (0..self.mac_len).map(|i| sum ^ seq_bytes[i % 4] ^ i as u8).collect()
    }
}

impl CryptoBinding for FixtureBinding {
    fn blocksize(&self) -> usize {
        self.blocksize
    }

    fn lenfield_blocksize(&self) -> usize {
        self.lenfield_blocksize
    }

    fn mac_len(&self) -> usize {
        self.mac_len
    }

    fn mac_order(&self) -> MacOrder {
        self.mac_order
    }

    fn decrypt_len(
        &mut self,
        seq: u32,
        ciphertext_first_block: &[u8],
        out_cleartext_first_block: &mut [u8],
    ) -> Result<u32, CryptoError> {
        for (i, byte) in ciphertext_first_block.iter().enumerate() {
            out_cleartext_first_block[i] = byte ^ self.keystream_byte(seq, i);
        }
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&out_cleartext_first_block[..4]);
        Ok(u32::from_be_bytes(len_bytes))
    }

    fn decrypt(
        &mut self,
        seq: u32,
        out: &mut [u8],
        input: &[u8],
        already_done: usize,
    ) -> Result<(), CryptoError> {
        let ciphertext = &input[..out.len()];
        if self.mac_order == MacOrder::Aead {
            let tag = &input[out.len()..];
            if self.checksum(seq, ciphertext) != tag {
                return Err(CryptoError::MacFail);
            }
        }
        for (i, byte) in ciphertext.iter().enumerate() {
            out[i] = byte ^ self.keystream_byte(seq, already_done + i);
        }
        Ok(())
    }

    fn encrypt(&mut self, seq: u32, packet: &mut [u8]) -> Result<Option<Vec<u8>>, CryptoError> {
        let offset = self.encrypt_offset();
        for (i, byte) in packet.iter_mut().enumerate() {
            *byte ^= self.keystream_byte(seq, offset + i);
        }
        if self.mac_order == MacOrder::Aead {
            Ok(Some(self.checksum(seq, packet)))
        } else {
            Ok(None)
        }
    }

    fn mac_compute(&mut self, seq: u32, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.checksum(seq, data))
    }

    fn hmac_verify(&mut self, seq: u32, data: &[u8], expected_mac: &[u8]) -> Result<bool, CryptoError> {
        Ok(self.checksum(seq, data) == expected_mac)
    }

    fn prng_fill(&mut self, dst: &mut [u8]) -> Result<(), CryptoError> {
        for (i, byte) in dst.iter_mut().enumerate() {
            *byte = self.key.wrapping_add(i as u8);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use ssh_packet_core::Role;
    use ssh_packet_session::dispatch::{HandlerResult, HandlerTable};
    use ssh_packet_session::{ByteSink, Session, SessionConfig};

    use super::FixtureBinding;

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl ByteSink for SharedSink {
        fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        }
    }

    fn round_trips(make: fn(u8) -> FixtureBinding) {
        let sink = SharedSink::default();
        let mut sender = Session::new(sink.clone(), SessionConfig::new(Role::Client));
        sender.install_crypto(Box::new(make(0x5A)), Box::new(make(0x5A)));
        sender.send(&[94, 1, 2, 3, 4]).expect("send should succeed");

        let wire_bytes = sink.0.lock().unwrap().clone();

        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = Arc::clone(&received);
        let mut receiver = Session::new(Vec::<u8>::new(), SessionConfig::new(Role::Server));
        receiver.install_crypto(Box::new(make(0x5A)), Box::new(make(0x5A)));
        let mut phase = *receiver.phase();
        phase.session_state = ssh_packet_core::SessionState::Authenticated;
        phase.dh_state = ssh_packet_core::DhState::Finished;
        *receiver.phase_mut() = phase;
        let mut table = HandlerTable::new(1, 100);
        table.register(
            94,
            Box::new(move |input| {
                received_clone.lock().unwrap().extend_from_slice(input.payload);
                HandlerResult::used()
            }),
        );
        receiver.register_handler_table(table);

        let consumed = receiver.feed(&wire_bytes);
        assert_eq!(consumed, wire_bytes.len());
        assert_eq!(receiver.last_error(), None);
        assert_eq!(&*received.lock().unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn encrypt_and_mac_round_trips() {
        round_trips(FixtureBinding::encrypt_and_mac);
    }

    #[test]
    fn encrypt_then_mac_round_trips() {
        round_trips(FixtureBinding::encrypt_then_mac);
    }

    #[test]
    fn aead_round_trips() {
        round_trips(FixtureBinding::aead);
    }
}
