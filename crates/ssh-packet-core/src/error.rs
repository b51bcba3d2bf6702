//! The packet-layer error taxonomy.
//!
//! `ShortRead` is deliberately *not* a variant here: "feed returns 0, retain
//! bytes" is modeled as a return value (`Consumed(0)`), not an error, since
//! it is local and recoverable. Every other kind is fatal: the session
//! transitions to [`crate::phase::SessionState::Error`] and does not retry
//! internally.

use ssh_packet_crypto::CryptoError;
use thiserror::Error;

/// Fatal packet-layer failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// Declared `packet_length` exceeded `MAX_PACKET_LEN`.
    #[error("packet length {len} exceeds maximum {max}")]
    LenTooLarge {
        /// The length the peer declared.
        len: u32,
        /// The configured maximum.
        max: u32,
    },

    /// The implied remainder after the length field would be negative.
    #[error("packet length {len} too small for length-field block size {lenfield_blocksize}")]
    LenNegativeRemainder {
        /// The length the peer declared.
        len: u32,
        /// The active length-field block size.
        lenfield_blocksize: usize,
    },

    /// Block cipher decryption failed.
    #[error("decryption failed: {0}")]
    DecryptFail(#[from] DecryptFailKind),

    /// MAC verification failed.
    #[error("MAC verification failed")]
    MacFail,

    /// `padding_length` exceeded the bytes remaining in the packet.
    #[error("padding length {padding_length} exceeds remaining bytes {remaining}")]
    PaddingInvalid {
        /// The padding length the peer declared.
        padding_length: u8,
        /// Bytes remaining in the packet at the point padding was read.
        remaining: usize,
    },

    /// Decompression would exceed the output cap.
    #[error("decompression overflow: {0}")]
    DecompOverflow(String),

    /// Decompression stream corrupt, or produced zero bytes: a zero-length
    /// decompressed payload is always a fatal framing error.
    #[error("decompression corrupt: {0}")]
    DecompCorrupt(String),

    /// Compression stream corrupt.
    #[error("compression corrupt: {0}")]
    CompCorrupt(String),

    /// PRNG could not supply padding bytes.
    #[error("PRNG fill failed")]
    PrngFail,

    /// Allocation failure while building a packet header.
    #[error("out of memory")]
    Oom,

    /// An operation was attempted that the current session state forbids
    /// (e.g. feeding bytes while the re-entrancy guard is held).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The state filter denied an incoming message for the current phase.
    #[error("filter denied message type {msg_type} in current phase")]
    FilterDenied {
        /// The wire type byte of the denied message.
        msg_type: u8,
    },
}

/// Distinguishes a cipher-level decrypt failure from a failed MAC check,
/// since both surface through `PacketError::DecryptFail`/`MacFail`
/// respectively but originate in the crypto binding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cipher reported a decryption fault")]
pub struct DecryptFailKind;

impl From<CryptoError> for PacketError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::DecryptFail => Self::DecryptFail(DecryptFailKind),
            CryptoError::MacFail => Self::MacFail,
            CryptoError::PrngFail => Self::PrngFail,
            CryptoError::CompressionInit(msg) => Self::CompCorrupt(msg),
            CryptoError::DecompOverflow { max_out } => {
                Self::DecompOverflow(format!("exceeded {max_out} bytes"))
            },
            CryptoError::DecompCorrupt => Self::DecompCorrupt("inflate status error".to_string()),
            CryptoError::CompCorrupt => Self::CompCorrupt("deflate status error".to_string()),
        }
    }
}
