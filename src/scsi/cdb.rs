//! Command Descriptor Builder
//!
//! Packs the abstract security operations into the two wire encodings this
//! layer speaks: SCSI ATA PASS-THROUGH(12) carrying the native ATA TRUSTED
//! commands, and SCSI SECURITY PROTOCOL IN/OUT for SAS disks. Layouts are
//! byte-exact per SAT-5 / SPC-5; fields are packed by hand rather than
//! through struct overlays.

use crate::error::{Result, SedIoError};

use super::constants::{ata_opcodes, ata_protocols, scsi_opcodes, INQUIRY_STANDARD_DATA_LEN};
use super::types::{Direction, SecurityCommand};

pub const ATA_PASSTHROUGH_CDB_LEN: usize = 12;
pub const SECURITY_PROTOCOL_CDB_LEN: usize = 12;
pub const INQUIRY_CDB_LEN: usize = 6;

/// Build an ATA PASS-THROUGH(12) CDB for one of the security operations.
///
/// The transfer length is expressed in 512-byte blocks (CDB byte 4); a
/// `buffer_len` that is not a multiple of 512 truncates to whole blocks.
/// That is the documented lossy contract, not an error. Lengths beyond 255
/// blocks do not fit the single-byte count and are rejected.
pub fn build_ata_passthrough(
    cmd: SecurityCommand,
    protocol_id: u8,
    com_id: u16,
    buffer_len: u32,
) -> Result<([u8; ATA_PASSTHROUGH_CDB_LEN], Direction)> {
    let (protocol, direction, opcode) = match cmd {
        SecurityCommand::Identify => (
            ata_protocols::PIO_DATA_IN,
            Direction::FromDevice,
            ata_opcodes::IDENTIFY_DEVICE,
        ),
        SecurityCommand::TrustedReceive => (
            ata_protocols::PIO_DATA_IN,
            Direction::FromDevice,
            ata_opcodes::TRUSTED_RECEIVE,
        ),
        SecurityCommand::TrustedSend => (
            ata_protocols::PIO_DATA_OUT,
            Direction::ToDevice,
            ata_opcodes::TRUSTED_SEND,
        ),
    };

    // The sector count is a single byte; anything past 255 blocks cannot be
    // encoded in one passthrough command.
    let blocks = buffer_len / 512;
    if blocks > u8::MAX as u32 {
        return Err(SedIoError::parse(format!(
            "transfer length {} exceeds the {}-byte passthrough maximum",
            buffer_len,
            u8::MAX as u32 * 512
        )));
    }

    let mut cdb = [0u8; ATA_PASSTHROUGH_CDB_LEN];
    cdb[0] = scsi_opcodes::ATA_PASS_THROUGH_12;
    cdb[1] = protocol << 1;
    // Byte 2: T_DIR (bit 3) = 1 for device-to-host, BYT_BLOK (bit 2) = 1,
    // T_LENGTH (bits 1-0) = 10b (length is in the sector count field)
    let t_dir = if direction == Direction::FromDevice { 1 } else { 0 };
    cdb[2] = (t_dir << 3) | (1 << 2) | 2;
    cdb[3] = protocol_id; // ATA features / TRUSTED security protocol
    cdb[4] = blocks as u8; // sector count, 512-byte blocks
    cdb[6] = (com_id & 0x00FF) as u8; // ATA LBA mid  / TRUSTED comID low
    cdb[7] = ((com_id & 0xFF00) >> 8) as u8; // ATA LBA high / TRUSTED comID high
    cdb[9] = opcode;

    Ok((cdb, direction))
}

/// Build a SECURITY PROTOCOL IN/OUT CDB for a native SCSI disk.
///
/// IDENTIFY has no meaning on this path; it must never reach the transport.
pub fn build_security_protocol(
    cmd: SecurityCommand,
    protocol_id: u8,
    com_id: u16,
    buffer_len: u32,
) -> Result<([u8; SECURITY_PROTOCOL_CDB_LEN], Direction)> {
    let (opcode, direction) = match cmd {
        SecurityCommand::TrustedReceive => {
            (scsi_opcodes::SECURITY_PROTOCOL_IN, Direction::FromDevice)
        }
        SecurityCommand::TrustedSend => (scsi_opcodes::SECURITY_PROTOCOL_OUT, Direction::ToDevice),
        SecurityCommand::Identify => {
            return Err(SedIoError::unsupported_command(
                "IDENTIFY cannot be encoded as a SCSI security-protocol command",
            ))
        }
    };

    let mut cdb = [0u8; SECURITY_PROTOCOL_CDB_LEN];
    cdb[0] = opcode;
    cdb[1] = protocol_id;
    cdb[2..4].copy_from_slice(&com_id.to_be_bytes());
    // Byte 4 bit 7 is INC_512; left clear, so the length below is in bytes.
    cdb[6..10].copy_from_slice(&buffer_len.to_be_bytes());

    Ok((cdb, direction))
}

/// Build a standard INQUIRY CDB requesting the 36-byte standard data page.
pub fn build_inquiry() -> ([u8; INQUIRY_CDB_LEN], Direction) {
    let mut cdb = [0u8; INQUIRY_CDB_LEN];
    cdb[0] = scsi_opcodes::INQUIRY;
    cdb[3..5].copy_from_slice(&(INQUIRY_STANDARD_DATA_LEN as u16).to_be_bytes());
    (cdb, Direction::FromDevice)
}

/// Decode the side-channel fields back out of an ATA passthrough CDB.
pub fn decode_ata_passthrough(cdb: &[u8; ATA_PASSTHROUGH_CDB_LEN]) -> (u8, u16) {
    let protocol_id = cdb[3];
    let com_id = (cdb[6] as u16) | ((cdb[7] as u16) << 8);
    (protocol_id, com_id)
}

/// Decode the side-channel fields back out of a security-protocol CDB.
pub fn decode_security_protocol(cdb: &[u8; SECURITY_PROTOCOL_CDB_LEN]) -> (u8, u16, u32) {
    let protocol_id = cdb[1];
    let com_id = u16::from_be_bytes([cdb[2], cdb[3]]);
    let length = u32::from_be_bytes([cdb[6], cdb[7], cdb[8], cdb[9]]);
    (protocol_id, com_id, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ata_passthrough_direction_follows_command_kind() {
        for (cmd, expected) in [
            (SecurityCommand::Identify, Direction::FromDevice),
            (SecurityCommand::TrustedReceive, Direction::FromDevice),
            (SecurityCommand::TrustedSend, Direction::ToDevice),
        ] {
            let (_, direction) = build_ata_passthrough(cmd, 0x01, 0x0001, 512).unwrap();
            assert_eq!(direction, expected, "{}", cmd.name());
        }
    }

    #[test]
    fn ata_passthrough_round_trips_protocol_and_comid() {
        for (protocol_id, com_id) in [(0x01u8, 0x0001u16), (0x02, 0x07FE), (0xEF, 0xFFFF)] {
            let (cdb, _) =
                build_ata_passthrough(SecurityCommand::TrustedReceive, protocol_id, com_id, 1024)
                    .unwrap();
            assert_eq!(decode_ata_passthrough(&cdb), (protocol_id, com_id));
        }
    }

    #[test]
    fn ata_passthrough_layout_matches_sat() {
        let (cdb, _) =
            build_ata_passthrough(SecurityCommand::TrustedReceive, 0x01, 0x07FE, 2048).unwrap();
        assert_eq!(cdb[0], 0xA1);
        assert_eq!(cdb[1], 4 << 1); // PIO data-in
        assert_eq!(cdb[2], 0x0E); // T_DIR=1, BYT_BLOK=1, T_LENGTH=10b
        assert_eq!(cdb[4], 4); // 2048 bytes = 4 blocks
        assert_eq!(cdb[6], 0xFE);
        assert_eq!(cdb[7], 0x07);
        assert_eq!(cdb[9], 0x5C);
    }

    #[test]
    fn ata_passthrough_send_clears_t_dir() {
        let (cdb, _) =
            build_ata_passthrough(SecurityCommand::TrustedSend, 0x01, 0x07FE, 512).unwrap();
        assert_eq!(cdb[1], 5 << 1); // PIO data-out
        assert_eq!(cdb[2], 0x06);
        assert_eq!(cdb[9], 0x5E);
    }

    #[test]
    fn ata_passthrough_truncates_partial_blocks() {
        let (cdb, _) =
            build_ata_passthrough(SecurityCommand::TrustedReceive, 0x01, 0x0001, 1000).unwrap();
        assert_eq!(cdb[4], 1);
    }

    #[test]
    fn ata_passthrough_rejects_oversized_transfer() {
        // 255 blocks is the largest count the single-byte field can carry.
        let (cdb, _) =
            build_ata_passthrough(SecurityCommand::TrustedReceive, 0x01, 0x0001, 255 * 512)
                .unwrap();
        assert_eq!(cdb[4], 255);

        let err = build_ata_passthrough(SecurityCommand::TrustedReceive, 0x01, 0x0001, 131072)
            .unwrap_err();
        assert!(matches!(err, crate::error::SedIoError::Parse(_)));
    }

    #[test]
    fn security_protocol_round_trips_all_fields() {
        let (cdb, direction) =
            build_security_protocol(SecurityCommand::TrustedReceive, 0x01, 0x07FE, 2048).unwrap();
        assert_eq!(direction, Direction::FromDevice);
        assert_eq!(cdb[0], 0xA2);
        assert_eq!(decode_security_protocol(&cdb), (0x01, 0x07FE, 2048));

        let (cdb, direction) =
            build_security_protocol(SecurityCommand::TrustedSend, 0x02, 0x0001, 512).unwrap();
        assert_eq!(direction, Direction::ToDevice);
        assert_eq!(cdb[0], 0xB5);
        assert_eq!(decode_security_protocol(&cdb), (0x02, 0x0001, 512));
    }

    #[test]
    fn security_protocol_rejects_identify() {
        let err = build_security_protocol(SecurityCommand::Identify, 0, 0, 512).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SedIoError::UnsupportedCommand(_)
        ));
    }

    #[test]
    fn inquiry_requests_standard_data() {
        let (cdb, direction) = build_inquiry();
        assert_eq!(cdb[0], 0x12);
        assert_eq!(u16::from_be_bytes([cdb[3], cdb[4]]), 36);
        assert_eq!(direction, Direction::FromDevice);
    }
}
