//! The one-line identification-string exchange that precedes binary packet
//! framing on a real wire (RFC 4253 §4.2).
//!
//! This is session orchestration, not packet framing, so it has no home in
//! `ssh-packet-session`. It is private to this demonstration binary, which
//! is the only thing in the workspace that talks to a real socket before a
//! [`ssh_packet_session::Session`] exists.

use std::io::{self, BufRead, BufReader, Read, Write};

/// This binary's own identification string. Real peers expect exactly
/// `SSH-<protoversion>-<softwareversion>[ <comments>]\r\n`.
pub const LOCAL_BANNER: &str = "SSH-2.0-ssh-packet-cli_0.1\r\n";

/// Write our banner, then read and discard the peer's banner line.
///
/// Returns any bytes read past the peer's banner line (a peer that pipelines
/// its first binary packet immediately after the banner) so the caller can
/// feed them to the framer instead of dropping them.
pub fn exchange<S: Read + Write>(stream: &mut S) -> io::Result<Vec<u8>> {
    stream.write_all(LOCAL_BANNER.as_bytes())?;

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if !line.starts_with("SSH-") {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "peer did not send an SSH banner"));
    }

    Ok(reader.buffer().to_vec())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::exchange;

    #[test]
    fn rejects_a_non_banner_peer() {
        let mut stream = Cursor::new(b"not-a-banner\r\n".to_vec());
        assert!(exchange(&mut stream).is_err());
    }
}
