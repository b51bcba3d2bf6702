//! Opaque crypto binding: the black-box interface the packet layer drives.
//!
//! The packet layer never implements a cipher or MAC itself. Instead it
//! drives whatever [`CryptoBinding`] the key-exchange
//! layer installed after a successful exchange. Three orderings are
//! supported, selected by [`CryptoBinding::mac_order`]:
//!
//! - [`MacOrder::EncryptAndMac`]: the classic SSH ordering. The MAC covers
//!   the sequence number and the *cleartext* packet; it can only be checked
//!   after decryption.
//! - [`MacOrder::EncryptThenMac`]: the `*-etm@openssh.com` ordering. The
//!   length field travels in the clear, and the MAC covers the sequence
//!   number and the *ciphertext* (including that cleartext length field).
//!   Verification happens *before* any decryption, so a forged packet is
//!   rejected without ever running attacker bytes through the cipher.
//! - [`MacOrder::Aead`]: AEAD ciphers (e.g. `chacha20-poly1305@openssh.com`,
//!   AES-GCM). The length field travels in the clear, there is no separate
//!   MAC call, and `decrypt`/`encrypt` verify/produce the authentication
//!   tag internally.

use crate::error::CryptoError;

/// How a [`CryptoBinding`] orders encryption and authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacOrder {
    /// MAC computed over `seq || cleartext`, checked after decryption.
    EncryptAndMac,
    /// MAC computed over `seq || ciphertext`, checked before decryption.
    EncryptThenMac,
    /// AEAD: authentication tag is integral to encrypt/decrypt.
    Aead,
}

/// Opaque handle to a cipher/MAC/PRNG triple installed for one direction of
/// one set of session keys.
///
/// Implementations are provided by the key-exchange layer (out of scope
/// here). This trait is the seam: everything above it is written
/// against this interface only.
pub trait CryptoBinding: Send {
    /// Cipher block size in bytes. `8` when no cipher is active (pre-KEX).
    fn blocksize(&self) -> usize;

    /// Block size of the initial block containing the length field.
    /// `0` means the length field travels in the clear (AEAD and EtM).
    fn lenfield_blocksize(&self) -> usize;

    /// Length, in bytes, of the MAC/tag appended to each packet. `0` before
    /// keys are active.
    fn mac_len(&self) -> usize;

    /// Encryption/authentication ordering this binding uses.
    fn mac_order(&self) -> MacOrder;

    /// Decrypt exactly `lenfield_blocksize` bytes of the first block and
    /// return the big-endian `u32` packet length at offset 0 of the
    /// result. Only called when `lenfield_blocksize() > 0`.
    fn decrypt_len(
        &mut self,
        seq: u32,
        ciphertext_first_block: &[u8],
        out_cleartext_first_block: &mut [u8],
    ) -> Result<u32, CryptoError>;

    /// Decrypt (and, for AEAD, authenticate) `input` into `out`.
    ///
    /// `already_done` is the number of leading bytes of the logical packet
    /// that have already been decrypted by a prior `decrypt_len` call (for
    /// AEAD/EtM bindings this is always `0`, since the length field is
    /// cleartext and nothing has been decrypted yet).
    ///
    /// For [`MacOrder::Aead`], `input` is `ciphertext || tag`, longer than
    /// `out` by [`CryptoBinding::mac_len`] bytes. The implementation
    /// verifies the trailing tag and must return [`CryptoError::MacFail`]
    /// if it does not match before writing `out`. For the other two
    /// orderings `input.len() == out.len()`.
    fn decrypt(
        &mut self,
        seq: u32,
        out: &mut [u8],
        input: &[u8],
        already_done: usize,
    ) -> Result<(), CryptoError>;

    /// Encrypt `packet` in place. Returns `Some(tag)` only for
    /// [`MacOrder::Aead`] (the authentication tag to append). For
    /// [`MacOrder::EncryptAndMac`] and [`MacOrder::EncryptThenMac`] the
    /// return value is ignored. The caller computes the MAC itself via
    /// [`CryptoBinding::mac_compute`], over the cleartext packet before
    /// this call for `EncryptAndMac`, or over the ciphertext packet
    /// (including the cleartext length prefix) after this call for
    /// `EncryptThenMac`.
    fn encrypt(&mut self, seq: u32, packet: &mut [u8]) -> Result<Option<Vec<u8>>, CryptoError>;

    /// Compute the MAC/tag over `data`. For [`MacOrder::EncryptAndMac`]
    /// `data` is the cleartext packet; for [`MacOrder::EncryptThenMac`]
    /// `data` is the ciphertext packet including the length prefix. Never
    /// called for [`MacOrder::Aead`], where authentication is folded into
    /// `decrypt`/`encrypt`.
    fn mac_compute(&mut self, seq: u32, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verify `expected_mac` against `data` (the cleartext packet for
    /// `EncryptAndMac`, the ciphertext packet for `EncryptThenMac`; never
    /// called for `Aead`, where authentication is folded into
    /// `decrypt`/`encrypt`).
    fn hmac_verify(&mut self, seq: u32, data: &[u8], expected_mac: &[u8]) -> Result<bool, CryptoError>;

    /// Fill `dst` with cryptographically secure random bytes (used for
    /// padding once a cipher is active).
    fn prng_fill(&mut self, dst: &mut [u8]) -> Result<(), CryptoError>;
}

/// The "no crypto active" binding used before key exchange completes.
///
/// `blocksize = lenfield_blocksize = 8`, MAC length 0, no compression, no
/// padding randomness (padding is zero-filled).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBinding;

impl CryptoBinding for NullBinding {
    fn blocksize(&self) -> usize {
        8
    }

    fn lenfield_blocksize(&self) -> usize {
        8
    }

    fn mac_len(&self) -> usize {
        0
    }

    fn mac_order(&self) -> MacOrder {
        MacOrder::EncryptAndMac
    }

    fn decrypt_len(
        &mut self,
        _seq: u32,
        ciphertext_first_block: &[u8],
        out_cleartext_first_block: &mut [u8],
    ) -> Result<u32, CryptoError> {
        out_cleartext_first_block.copy_from_slice(ciphertext_first_block);
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&ciphertext_first_block[..4]);
        Ok(u32::from_be_bytes(len_bytes))
    }

    fn decrypt(
        &mut self,
        _seq: u32,
        out: &mut [u8],
        input: &[u8],
        _already_done: usize,
    ) -> Result<(), CryptoError> {
        out.copy_from_slice(input);
        Ok(())
    }

    fn encrypt(&mut self, _seq: u32, _packet: &mut [u8]) -> Result<Option<Vec<u8>>, CryptoError> {
        Ok(None)
    }

    fn mac_compute(&mut self, _seq: u32, _data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(Vec::new())
    }

    fn hmac_verify(
        &mut self,
        _seq: u32,
        _data: &[u8],
        expected_mac: &[u8],
    ) -> Result<bool, CryptoError> {
        Ok(expected_mac.is_empty())
    }

    fn prng_fill(&mut self, dst: &mut [u8]) -> Result<(), CryptoError> {
        dst.fill(0);
        Ok(())
    }
}
