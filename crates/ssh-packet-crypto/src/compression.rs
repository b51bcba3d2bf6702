//! Per-direction zlib streaming compression.
//!
//! `Deflator` and `Inflator` each wrap a raw (headerless) `zlib` stream and
//! live for the lifetime of one set of session keys. Every packet is
//! compressed/decompressed with a partial flush so that each packet is
//! independently decompressible in order while still sharing the sliding
//! window dictionary with every prior packet on the same stream. This is
//! what lets two SSH peers compress a long session's worth of chatty,
//! similar-looking messages far better than compressing each in isolation.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::error::CryptoError;

/// Output is produced in fixed-size chunks internally; this has no effect
/// on the returned `Vec`'s contents, only on how many `zlib` calls it takes
/// to drain a large packet.
const CHUNK_SIZE: usize = 4096;

/// Outgoing (deflate) compression stream for one session direction.
#[derive(Debug)]
pub struct Deflator {
    stream: Compress,
}

impl Deflator {
    /// Construct a new deflate stream at the given level (1-9).
    pub fn new(level: u32) -> Result<Self, CryptoError> {
        let level = level.clamp(1, 9);
        Ok(Self { stream: Compress::new(Compression::new(level), false) })
    }

    /// Compress `input`, returning the compressed bytes produced by a
    /// partial flush (all pending output emitted, dictionary state kept).
    pub fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut out = Vec::with_capacity(input.len());
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut consumed_total = 0usize;

        loop {
            let before_in = self.stream.total_in();
            let before_out = self.stream.total_out();

            let status = self
                .stream
                .compress(&input[consumed_total..], &mut chunk, FlushCompress::PartialFlush)
                .map_err(|_| CryptoError::CompCorrupt)?;

            let consumed = usize::try_from(self.stream.total_in() - before_in).unwrap_or(0);
            let produced = usize::try_from(self.stream.total_out() - before_out).unwrap_or(0);
            out.extend_from_slice(&chunk[..produced]);
            consumed_total += consumed;

            match status {
                Status::Ok | Status::BufError => {
                    let made_progress = consumed > 0 || produced > 0;
                    let input_exhausted = consumed_total >= input.len();
                    if input_exhausted && !made_progress {
                        break;
                    }
                    if input_exhausted && produced < chunk.len() {
                        break;
                    }
                },
                Status::StreamEnd => break,
            }
        }

        Ok(out)
    }
}

/// Incoming (inflate) decompression stream for one session direction.
#[derive(Debug)]
pub struct Inflator {
    stream: Decompress,
}

impl Inflator {
    /// Construct a new inflate stream matching a [`Deflator`] on the peer.
    pub fn new() -> Result<Self, CryptoError> {
        Ok(Self { stream: Decompress::new(false) })
    }

    /// Decompress `input`, failing with [`CryptoError::DecompOverflow`] if
    /// the accumulated output would exceed `max_out` bytes (a DoS guard
    /// against zip-bomb style packets).
    ///
    /// On `Z_BUF_ERROR` ("input exhausted" in `zlib` terms) the loop exits
    /// even if the last chunk was not completely full. This is required to
    /// interoperate with peers using partial-flush deflate, where a single
    /// packet's compressed bytes may legitimately not produce a full output
    /// chunk.
    pub fn decompress(&mut self, input: &[u8], max_out: usize) -> Result<Vec<u8>, CryptoError> {
        let mut out = Vec::new();
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut consumed_total = 0usize;

        loop {
            let before_in = self.stream.total_in();
            let before_out = self.stream.total_out();

            let status = self
                .stream
                .decompress(&input[consumed_total..], &mut chunk, FlushDecompress::Sync)
                .map_err(|_| CryptoError::DecompCorrupt)?;

            let consumed = usize::try_from(self.stream.total_in() - before_in).unwrap_or(0);
            let produced = usize::try_from(self.stream.total_out() - before_out).unwrap_or(0);

            if out.len() + produced > max_out {
                return Err(CryptoError::DecompOverflow { max_out });
            }
            out.extend_from_slice(&chunk[..produced]);
            consumed_total += consumed;

            match status {
                Status::StreamEnd => break,
                Status::BufError => break,
                Status::Ok => {
                    if consumed_total >= input.len() && produced < chunk.len() {
                        break;
                    }
                },
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::{Deflator, Inflator};

    #[test]
    fn round_trips_a_single_packet() {
        let mut deflate = Deflator::new(6).expect("deflate init");
        let mut inflate = Inflator::new().expect("inflate init");

        let payload = b"the quick brown fox jumps over the lazy dog".repeat(20);
        let compressed = deflate.compress(&payload).expect("compress");
        let decompressed = inflate.decompress(&compressed, 1 << 20).expect("decompress");

        assert_eq!(decompressed, payload);
    }

    #[test]
    fn shares_dictionary_across_packets() {
        let mut deflate = Deflator::new(6).expect("deflate init");
        let mut inflate = Inflator::new().expect("inflate init");

        let a = b"repeated-phrase ".repeat(50);
        let b = b"repeated-phrase ".repeat(50);

        let ca = deflate.compress(&a).expect("compress a");
        let cb = deflate.compress(&b).expect("compress b");

        // The second packet, sharing the dictionary, compresses to fewer
        // or equal bytes than an independent stream would need.
        assert!(cb.len() <= ca.len());

        let da = inflate.decompress(&ca, 1 << 20).expect("decompress a");
        let db = inflate.decompress(&cb, 1 << 20).expect("decompress b");
        assert_eq!(da, a);
        assert_eq!(db, b);
    }

    #[test]
    fn rejects_output_exceeding_cap() {
        let mut deflate = Deflator::new(6).expect("deflate init");
        let mut inflate = Inflator::new().expect("inflate init");

        let payload = vec![0u8; 1 << 16];
        let compressed = deflate.compress(&payload).expect("compress");

        let err = inflate.decompress(&compressed, 128).unwrap_err();
        assert!(matches!(err, super::CryptoError::DecompOverflow { max_out: 128 }));
    }
}
