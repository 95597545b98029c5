// Transport constants (SAT-5 / SPC-5 / ACS-3 values used by the security paths)

/// Sense buffer length handed to the transport on every call.
pub const SENSE_INFO_LEN: usize = 32;

/// ATA IDENTIFY DEVICE always returns exactly this many bytes.
pub const IDENTIFY_RESPONSE_SIZE: usize = 512;

/// Required alignment for DMA-capable data buffers.
pub const IO_BUFFER_ALIGNMENT: usize = 4096;

/// Default transport timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 60_000;

/// Standard INQUIRY data is 36 bytes; anything shorter is not a usable response.
pub const INQUIRY_STANDARD_DATA_LEN: usize = 36;

// SCSI operation codes
pub mod scsi_opcodes {
    pub const INQUIRY: u8 = 0x12;
    pub const ATA_PASS_THROUGH_12: u8 = 0xA1;
    pub const SECURITY_PROTOCOL_IN: u8 = 0xA2;
    pub const SECURITY_PROTOCOL_OUT: u8 = 0xB5;
}

// ATA command opcodes carried inside the passthrough CDB
pub mod ata_opcodes {
    pub const IDENTIFY_DEVICE: u8 = 0xEC;
    pub const TRUSTED_RECEIVE: u8 = 0x5C;
    pub const TRUSTED_SEND: u8 = 0x5E;
}

// ATA passthrough protocol field values (CDB byte 1, shifted left by one)
pub mod ata_protocols {
    pub const PIO_DATA_IN: u8 = 4;
    pub const PIO_DATA_OUT: u8 = 5;
}

/// SCSI masked status GOOD.
pub const STATUS_GOOD: u8 = 0x00;

// Sense response codes signalling "ATA passthrough information available"
pub const SENSE_DESCRIPTOR_CURRENT: u8 = 0x72;
pub const SENSE_ATA_PASSTHROUGH: u8 = 0x0B;

/// Offset of the embedded ATA error/status byte in a passthrough sense block.
pub const SENSE_ATA_ERROR_OFFSET: usize = 11;

/// Kernel flag consulted (diagnostics only) before issuing TRUSTED commands.
pub const LIBATA_ALLOW_TPM_PATH: &str = "/sys/module/libata/parameters/allow_tpm";
