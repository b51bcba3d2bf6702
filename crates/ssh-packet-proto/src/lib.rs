//! Wire-format primitives for the SSH binary packet protocol.
//!
//! This crate holds the pieces of the transport packet layer that have no
//! opinion about cryptography or session state: the growable [`Buffer`]
//! used to assemble in-flight packets, the [`MessageType`] table, and the
//! framing constants shared by the incoming and outgoing framers.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod buffer;
pub mod constants;
pub mod message;

pub use buffer::Buffer;
pub use constants::{MAX_PACKET_LEN, MIN_PADDING_LEN, PRE_KEX_BLOCKSIZE};
pub use message::MessageType;
