//! Storage security transport core.
//!
//! Everything needed to move security-protocol payloads to and from a disk:
//! CDB construction, dispatch over the platform block-command channel,
//! completion classification, identity parsing and transport selection.
//! The session/protocol layer above builds on `SecurityInterface`.

pub mod cdb;
pub mod constants;
pub mod core;
pub mod device;
#[cfg(target_os = "linux")]
pub mod ffi;
pub mod identify;
pub mod probe;
pub mod quirks;
pub mod sense;
pub mod types;

use tracing::debug;

use crate::error::{Result, SedIoError};

use self::cdb::{build_ata_passthrough, build_security_protocol};
use self::core::{CommandChannel, SgChannel};
use self::device::AlignedBuffer;
use self::probe::TransportSelector;
use self::types::{DeviceInfo, DeviceType, Outcome, SecurityCommand};

pub use self::core::Dispatch;
pub use self::types::{ChecksumState, Direction};

/// Per-device security transport endpoint.
///
/// Owns the command channel exclusively. Transport kind is resolved lazily on
/// the first operation and then governs which CDB variant every subsequent
/// call uses.
pub struct SecurityInterface<C: CommandChannel> {
    channel: C,
    selector: TransportSelector,
    device_path: String,
}

impl SecurityInterface<SgChannel> {
    pub fn open(device_path: &str) -> Result<Self> {
        let channel = SgChannel::open(device_path)?;
        Ok(Self::with_channel(channel, device_path))
    }
}

impl<C: CommandChannel> SecurityInterface<C> {
    /// Wrap an already-open channel. This is how alternative platform
    /// channels (and test doubles) plug in.
    pub fn with_channel(channel: C, device_path: &str) -> Self {
        Self {
            channel,
            selector: TransportSelector::new(),
            device_path: device_path.to_string(),
        }
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Resolve the transport kind (probing the device if not yet done) and
    /// return the structured identity.
    pub fn identify(&mut self) -> Result<DeviceInfo> {
        Ok(self.selector.resolve(&mut self.channel)?.clone())
    }

    /// Receive a security-protocol payload from the device into `buffer`.
    ///
    /// Returns the target's embedded status byte: zero for success, non-zero
    /// verbatim when the device reported a protocol-level error.
    pub fn security_receive(
        &mut self,
        protocol_id: u8,
        com_id: u16,
        buffer: &mut AlignedBuffer,
    ) -> Result<u8> {
        self.security_command(SecurityCommand::TrustedReceive, protocol_id, com_id, buffer)
    }

    /// Send a security-protocol payload from `buffer` to the device.
    pub fn security_send(
        &mut self,
        protocol_id: u8,
        com_id: u16,
        buffer: &mut AlignedBuffer,
    ) -> Result<u8> {
        self.security_command(SecurityCommand::TrustedSend, protocol_id, com_id, buffer)
    }

    fn security_command(
        &mut self,
        cmd: SecurityCommand,
        protocol_id: u8,
        com_id: u16,
        buffer: &mut AlignedBuffer,
    ) -> Result<u8> {
        let kind = self.selector.resolve(&mut self.channel)?.dev_type;
        debug!(
            "{} via {} transport: protocol=0x{:02X} comID=0x{:04X} len={}",
            cmd.name(),
            kind.description(),
            protocol_id,
            com_id,
            buffer.len()
        );

        match kind {
            DeviceType::Ata => {
                let (cdb, direction) =
                    build_ata_passthrough(cmd, protocol_id, com_id, buffer.len() as u32)?;
                let dispatch = self.channel.submit(&cdb, direction, buffer, 0)?;
                match dispatch.classify() {
                    Outcome::Success => Ok(0),
                    Outcome::TargetError(code) => Ok(code),
                    Outcome::NotAtaResponse => Err(SedIoError::NotAtaResponse),
                    Outcome::TransportFailure => Err(SedIoError::transport(format!(
                        "{} failed on {}",
                        cmd.name(),
                        self.device_path
                    ))),
                }
            }
            DeviceType::Sas => {
                let (cdb, direction) =
                    build_security_protocol(cmd, protocol_id, com_id, buffer.len() as u32)?;
                let dispatch = self.channel.submit(&cdb, direction, buffer, 0)?;
                // Native SCSI completions carry no embedded ATA status byte;
                // anything other than a clean GOOD is a transport failure.
                if dispatch.failed() || dispatch.masked_status != 0 {
                    Err(SedIoError::transport(format!(
                        "{} failed on {} (status 0x{:02X})",
                        cmd.name(),
                        self.device_path,
                        dispatch.masked_status
                    )))
                } else {
                    Ok(0)
                }
            }
            DeviceType::Other => Err(SedIoError::unsupported_command(format!(
                "{} has no security transport",
                self.device_path
            ))),
        }
    }
}
