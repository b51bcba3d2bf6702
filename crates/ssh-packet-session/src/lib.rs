//! The session driver: incoming/outgoing framers, the state filter's
//! caller-supplied context, handler dispatch, and channel flow-control
//! fan-out, all wired into one synchronous [`Session`] entry point.
//!
//! This crate has the only code in the workspace that touches an actual
//! I/O sink. Everything below it ([`ssh_packet_proto`], [`ssh_packet_crypto`],
//! [`ssh_packet_core`]) is pure and independently testable; this crate's job
//! is wiring, not algorithms.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod dispatch;
pub mod flowcontrol;
mod incoming;
mod outgoing;
pub mod session;
pub mod socket;

pub use dispatch::{
    DispatchOutcome, HandlerFn, HandlerInput, HandlerOutcome, HandlerRegistry, HandlerResult,
    HandlerTable, SessionAction,
};
pub use flowcontrol::{ChannelId, ChannelRegistry, ChannelSubscriber};
pub use session::{FramerState, Session, SessionConfig};
pub use socket::{ByteSink, NullPcapSink, PcapSink};
