//! Wire-format constants for the SSH binary packet protocol.

/// Maximum total packet length accepted by the incoming framer, matching
/// `MAX_PACKET_LEN` in the distilled specification. Packets declaring a
/// larger `packet_length` are rejected before any payload bytes are read.
pub const MAX_PACKET_LEN: u32 = 35_000;

/// Block size and length-field block size in effect before key exchange
/// completes ("pre-KEX"): no cipher is active, so framing proceeds as if
/// the block size were 8 and the length field were read in the clear.
pub const PRE_KEX_BLOCKSIZE: usize = 8;

/// Minimum padding length required by RFC 4253: at least 4 bytes of padding
/// must follow every payload, encrypted or not.
pub const MIN_PADDING_LEN: u8 = 4;
