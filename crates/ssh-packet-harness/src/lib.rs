//! Test-only harness: a simulated socket that can deliver bytes in
//! adversarial chunk sizes, deterministic (non-cryptographic)
//! [`fixtures::FixtureBinding`] implementations covering all three MAC
//! orderings, and a recording [`pcap::VecPcapSink`], so integration tests
//! can exercise the framers without a real cipher, a real socket, or the
//! key-exchange layer that would otherwise install both.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod fixtures;
pub mod pcap;
pub mod sim;

pub use fixtures::FixtureBinding;
pub use pcap::{CapturedPacket, VecPcapSink};
pub use sim::{ChunkStrategy, SimSocket};
