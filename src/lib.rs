//! rust-sedio Library
//!
//! A Rust library for the low-level security transport of self-encrypting
//! drives: building ATA passthrough and SCSI security-protocol CDBs,
//! dispatching them over the platform block-command channel, classifying
//! completions and parsing drive identities.

pub mod cli;
pub mod display;
pub mod error;
pub mod logger;
pub mod scsi;

// Re-export key types for easier use
pub use error::{Result, SedIoError};
pub use scsi::device::AlignedBuffer;
pub use scsi::probe::TransportSelector;
pub use scsi::types::{ChecksumState, DeviceInfo, DeviceType, Direction, Outcome, SecurityCommand};
pub use scsi::{Dispatch, SecurityInterface};
