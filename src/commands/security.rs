//! Security Command Handlers
//!
//! Handles the `recv` and `send` subcommands, which move raw security-
//! protocol payloads over whichever transport the device resolved to.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::display;
use crate::error::{Result, SedIoError};
use crate::scsi::device::AlignedBuffer;
use crate::scsi::SecurityInterface;

/// ATA TRUSTED transfers count in 512-byte blocks, so payload lengths are
/// rounded up to the next block boundary.
fn padded_len(len: usize) -> usize {
    len.div_ceil(512).max(1) * 512
}

pub async fn receive(
    device: String,
    protocol: u8,
    comid: u16,
    length: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    info!(
        "TRUSTED RECEIVE from {}: protocol=0x{:02X} comID=0x{:04X} length={}",
        device, protocol, comid, length
    );

    if length == 0 || length % 512 != 0 {
        return Err(SedIoError::parse(format!(
            "transfer length {} must be a non-zero multiple of 512",
            length
        )));
    }

    #[cfg(target_os = "linux")]
    crate::scsi::device::check_kernel_tpm_flag();

    let mut dev = SecurityInterface::open(&device)?;
    let mut buffer = AlignedBuffer::zeroed(length as usize)?;

    let status = dev.security_receive(protocol, comid, &mut buffer)?;
    if status != 0 {
        warn!("Device reported status 0x{:02X}", status);
        return Err(SedIoError::Target(status));
    }

    match output {
        Some(path) => {
            std::fs::write(&path, buffer.as_slice())?;
            println!("Wrote {} bytes to {}", buffer.len(), path.display());
        }
        None => {
            println!(
                "Received {} bytes (protocol 0x{:02X}, comID 0x{:04X}):",
                buffer.len(),
                protocol,
                comid
            );
            display::display_hex_dump(buffer.as_slice());
        }
    }

    Ok(())
}

pub async fn send(device: String, protocol: u8, comid: u16, input: PathBuf) -> Result<()> {
    let payload = std::fs::read(&input)?;
    if payload.is_empty() {
        return Err(SedIoError::parse(format!(
            "payload file {} is empty",
            input.display()
        )));
    }

    info!(
        "TRUSTED SEND to {}: protocol=0x{:02X} comID=0x{:04X} payload={} bytes",
        device,
        protocol,
        comid,
        payload.len()
    );

    #[cfg(target_os = "linux")]
    crate::scsi::device::check_kernel_tpm_flag();

    let mut dev = SecurityInterface::open(&device)?;
    let mut buffer = AlignedBuffer::from_slice(&payload, padded_len(payload.len()))?;

    let status = dev.security_send(protocol, comid, &mut buffer)?;
    if status != 0 {
        warn!("Device reported status 0x{:02X}", status);
        return Err(SedIoError::Target(status));
    }

    println!(
        "Sent {} bytes ({} including padding) to {}",
        payload.len(),
        buffer.len(),
        device
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_len_rounds_up_to_blocks() {
        assert_eq!(padded_len(1), 512);
        assert_eq!(padded_len(512), 512);
        assert_eq!(padded_len(513), 1024);
        assert_eq!(padded_len(2048), 2048);
    }
}
