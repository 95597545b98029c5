//! Transport Selector
//!
//! Decides once per device whether it is a native SCSI/SAS disk or an ATA
//! device behind passthrough. A standard INQUIRY is attempted first; if the
//! device answers as a plain disk the SAS path wins outright and no IDENTIFY
//! is ever issued. Otherwise an ATA IDENTIFY via passthrough settles it.
//! Resolution is terminal: subsequent calls return the cached identity.

use tracing::{debug, info};

use crate::error::Result;

use super::cdb::{build_ata_passthrough, build_inquiry};
use super::constants::{IDENTIFY_RESPONSE_SIZE, INQUIRY_STANDARD_DATA_LEN};
use super::core::CommandChannel;
use super::device::AlignedBuffer;
use super::identify::{parse_identify, safecopy};
use super::types::{DeviceInfo, DeviceType, Outcome, SecurityCommand};

// Byte offsets into the standard INQUIRY data
const INQUIRY_VENDOR_OFFSET: usize = 8; // T10 vendor identification
const INQUIRY_PRODUCT_OFFSET: usize = 16; // product identification
const INQUIRY_REVISION_OFFSET: usize = 32; // product revision level
const PERIPHERAL_TYPE_DISK: u8 = 0x00;

enum State {
    Unknown,
    Resolved(DeviceInfo),
}

/// Per-device transport resolution state machine.
pub struct TransportSelector {
    state: State,
}

impl TransportSelector {
    pub fn new() -> Self {
        Self {
            state: State::Unknown,
        }
    }

    /// Resolved transport kind, if probing has happened.
    pub fn kind(&self) -> Option<DeviceType> {
        match &self.state {
            State::Unknown => None,
            State::Resolved(info) => Some(info.dev_type),
        }
    }

    /// Probe the device and settle the transport kind. Terminal: once
    /// resolved, the cached identity is returned without touching the device
    /// again.
    pub fn resolve(&mut self, channel: &mut dyn CommandChannel) -> Result<&DeviceInfo> {
        if matches!(self.state, State::Unknown) {
            let info = run_probe(channel)?;
            info!(
                "Transport resolved: {} (model \"{}\")",
                info.dev_type.description(),
                info.model()
            );
            self.state = State::Resolved(info);
        }
        match &self.state {
            State::Resolved(info) => Ok(info),
            State::Unknown => unreachable!("selector left unresolved"),
        }
    }
}

impl Default for TransportSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn run_probe(channel: &mut dyn CommandChannel) -> Result<DeviceInfo> {
    if let Some(info) = try_inquiry(channel)? {
        return Ok(info);
    }
    if let Some(info) = try_ata_identify(channel)? {
        return Ok(info);
    }
    debug!("Neither INQUIRY nor ATA IDENTIFY succeeded; device type OTHER");
    Ok(DeviceInfo::default())
}

/// Attempt the native path. A standard disk answering the full 36-byte
/// INQUIRY payload resolves as SAS.
fn try_inquiry(channel: &mut dyn CommandChannel) -> Result<Option<DeviceInfo>> {
    let (cdb, direction) = build_inquiry();
    let mut buffer = AlignedBuffer::zeroed(INQUIRY_STANDARD_DATA_LEN)?;

    let dispatch = channel.submit(&cdb, direction, &mut buffer, 0)?;
    if dispatch.classify() != Outcome::Success {
        debug!("INQUIRY did not complete cleanly: {:?}", dispatch.classify());
        return Ok(None);
    }
    if (dispatch.transferred as usize) < INQUIRY_STANDARD_DATA_LEN {
        debug!(
            "INQUIRY transferred only {} bytes, need {}",
            dispatch.transferred, INQUIRY_STANDARD_DATA_LEN
        );
        return Ok(None);
    }

    let data = buffer.as_slice();
    let peripheral_type = data[0] & 0x1F;
    if peripheral_type != PERIPHERAL_TYPE_DISK {
        debug!("INQUIRY peripheral type 0x{:02X} is not a disk", peripheral_type);
        return Ok(None);
    }

    Ok(Some(parse_inquiry(data)))
}

/// Populate identity from the standard INQUIRY fields. These are plain ASCII
/// with no word swap, unlike IDENTIFY strings.
fn parse_inquiry(data: &[u8]) -> DeviceInfo {
    let mut di = DeviceInfo::default();
    di.dev_type = DeviceType::Sas;
    safecopy(
        &mut di.vendor_id,
        &data[INQUIRY_VENDOR_OFFSET..INQUIRY_PRODUCT_OFFSET],
    );
    safecopy(
        &mut di.model_num,
        &data[INQUIRY_PRODUCT_OFFSET..INQUIRY_REVISION_OFFSET],
    );
    safecopy(
        &mut di.firmware_rev,
        &data[INQUIRY_REVISION_OFFSET..INQUIRY_REVISION_OFFSET + 4],
    );
    di
}

/// Attempt ATA IDENTIFY via passthrough. A `Success` or `TargetError`
/// completion proves the device speaks ATA passthrough.
fn try_ata_identify(channel: &mut dyn CommandChannel) -> Result<Option<DeviceInfo>> {
    let (cdb, direction) = build_ata_passthrough(
        SecurityCommand::Identify,
        0,
        0,
        IDENTIFY_RESPONSE_SIZE as u32,
    )?;
    let mut buffer = AlignedBuffer::zeroed(IDENTIFY_RESPONSE_SIZE)?;

    let dispatch = channel.submit(&cdb, direction, &mut buffer, 0)?;
    match dispatch.classify() {
        Outcome::Success | Outcome::TargetError(_) => {
            let mut response = [0u8; IDENTIFY_RESPONSE_SIZE];
            response.copy_from_slice(buffer.as_slice());
            let mut di = parse_identify(&response);
            // The selector's verdict governs transport choice from here on.
            di.dev_type = DeviceType::Ata;
            Ok(Some(di))
        }
        outcome => {
            debug!("ATA IDENTIFY probe rejected: {:?}", outcome);
            Ok(None)
        }
    }
}
