//! Crypto/compression-layer error taxonomy.

use thiserror::Error;

/// Failures raised by a [`crate::binding::CryptoBinding`] or
/// [`crate::compression`] stream.
///
/// Framing-level error kinds (`LenTooLarge`, `FilterDenied`, ...) live in
/// `ssh-packet-core::error::PacketError`, which wraps this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Block cipher decryption failed (bad key schedule, internal fault).
    #[error("decryption failed")]
    DecryptFail,

    /// MAC/AEAD-tag verification failed.
    #[error("MAC verification failed")]
    MacFail,

    /// PRNG could not supply the requested random bytes.
    #[error("PRNG fill failed")]
    PrngFail,

    /// A `zlib` deflate/inflate stream could not be constructed (e.g. an
    /// invalid compression level, or allocation failure).
    #[error("failed to initialize compression stream: {0}")]
    CompressionInit(String),

    /// Decompression produced (or would produce) more than `max_out` bytes.
    #[error("decompressed output exceeded {max_out} byte limit")]
    DecompOverflow {
        /// The configured output cap that was exceeded.
        max_out: usize,
    },

    /// Decompression failed with a `zlib` status other than `Z_OK`/`Z_BUF_ERROR`.
    #[error("decompression stream corrupt")]
    DecompCorrupt,

    /// Compression failed with a `zlib` status other than `Z_OK`.
    #[error("compression stream corrupt")]
    CompCorrupt,
}
