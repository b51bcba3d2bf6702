//! Crypto and compression seams driven by the packet layer.
//!
//! This crate defines the [`CryptoBinding`] trait (the black-box cipher/MAC
//! interface the packet layer drives; concrete ciphers are out of scope
//! here) and the `zlib`-backed
//! [`compression::Deflator`]/[`compression::Inflator`] streams.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod binding;
pub mod compression;
pub mod error;

pub use binding::{CryptoBinding, MacOrder, NullBinding};
pub use compression::{Deflator, Inflator};
pub use error::CryptoError;
