pub const SERIAL_NUM_LEN: usize = 20;
pub const MODEL_NUM_LEN: usize = 40;
pub const FIRMWARE_REV_LEN: usize = 8;
pub const VENDOR_ID_LEN: usize = 8;
pub const WWN_LEN: usize = 8;

/// Resolved transport kind of a probed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// ATA device reached via SCSI ATA PASS-THROUGH(12)
    Ata,
    /// Native SCSI/SAS disk using SECURITY PROTOCOL IN/OUT
    Sas,
    /// Neither probe succeeded; no security transport available
    Other,
}

impl DeviceType {
    pub fn description(&self) -> &'static str {
        match self {
            DeviceType::Ata => "ATA",
            DeviceType::Sas => "SAS",
            DeviceType::Other => "OTHER",
        }
    }
}

/// Validity of the optional IDENTIFY response checksum (byte 510 == 0xA5).
///
/// Many real devices omit or miscompute this, so a mismatch is recorded and
/// logged but never turned into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumState {
    NotPresent,
    Valid,
    Mismatch,
}

/// Data transfer direction of a dispatched command, from the host's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromDevice,
    ToDevice,
    None,
}

/// Classification of a completed dispatch (see `sense::classify`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Transport delivered the command and the target reported no error
    Success,
    /// Sense data shows this is not an ATA passthrough response; the caller
    /// should fall back to the native SCSI path
    NotAtaResponse,
    /// The target understood the command and reported a device-level error;
    /// the embedded ATA status byte is returned verbatim
    TargetError(u8),
    /// Dispatch failed or the SCSI status was not GOOD
    TransportFailure,
}

/// Abstract security operations this layer can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityCommand {
    Identify,
    TrustedSend,
    TrustedReceive,
}

impl SecurityCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SecurityCommand::Identify => "IDENTIFY",
            SecurityCommand::TrustedSend => "TRUSTED SEND",
            SecurityCommand::TrustedReceive => "TRUSTED RECEIVE",
        }
    }
}

/// Structured device identity, filled in once at probe time.
///
/// String fields keep the fixed capacities of the on-wire structures; copies
/// into them truncate and zero-pad (see `identify::safecopy`). Accessors trim
/// the padding off for display.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub serial_num: [u8; SERIAL_NUM_LEN],
    pub model_num: [u8; MODEL_NUM_LEN],
    pub firmware_rev: [u8; FIRMWARE_REV_LEN],
    pub vendor_id: [u8; VENDOR_ID_LEN],
    pub world_wide_name: [u8; WWN_LEN],
    /// TCG options bitfield from IDENTIFY word 48 (zero for SAS devices)
    pub security_options: u16,
    pub dev_type: DeviceType,
    pub checksum: ChecksumState,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            serial_num: [0; SERIAL_NUM_LEN],
            model_num: [0; MODEL_NUM_LEN],
            firmware_rev: [0; FIRMWARE_REV_LEN],
            vendor_id: [0; VENDOR_ID_LEN],
            world_wide_name: [0; WWN_LEN],
            security_options: 0,
            dev_type: DeviceType::Other,
            checksum: ChecksumState::NotPresent,
        }
    }
}

impl DeviceInfo {
    pub fn serial(&self) -> String {
        trimmed(&self.serial_num)
    }

    pub fn model(&self) -> String {
        trimmed(&self.model_num)
    }

    pub fn firmware(&self) -> String {
        trimmed(&self.firmware_rev)
    }

    pub fn vendor(&self) -> String {
        trimmed(&self.vendor_id)
    }

    pub fn wwn_hex(&self) -> String {
        hex::encode(self.world_wide_name)
    }
}

/// Fixed-capacity fields are space-padded on the wire and zero-padded after
/// copies; strip both ends for display.
fn trimmed(field: &[u8]) -> String {
    String::from_utf8_lossy(field)
        .trim_matches(|c: char| c == '\0' || c == ' ')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_strips_padding_both_ends() {
        let mut field = [0u8; 20];
        field[..8].copy_from_slice(b"  ABC12 ");
        assert_eq!(trimmed(&field), "ABC12");
    }

    #[test]
    fn default_info_is_other_without_checksum() {
        let di = DeviceInfo::default();
        assert_eq!(di.dev_type, DeviceType::Other);
        assert_eq!(di.checksum, ChecksumState::NotPresent);
        assert_eq!(di.serial(), "");
    }
}
