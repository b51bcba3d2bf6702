//! Session phase, state filter, sequence counters, and the packet-layer
//! error taxonomy.
//!
//! This crate has no I/O and no notion of a socket. It is the pure,
//! testable heart of the transport's protocol-confusion defenses (the
//! state filter) plus the small bits of bookkeeping that every layer
//! above it needs to read.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod filter;
pub mod phase;
pub mod stats;

pub use error::PacketError;
pub use filter::{filter, FilterContext, FilterResult};
pub use phase::{AuthServiceState, AuthState, DhState, RequestState, Role, SessionPhase, SessionState};
pub use stats::{RawCounters, SequenceCounters};
