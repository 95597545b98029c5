//! Identity Parser
//!
//! Decodes the 512-byte ATA IDENTIFY DEVICE response into a `DeviceInfo`.
//! All field extraction works on documented byte offsets; IDENTIFY words are
//! little-endian and the string fields additionally byte-swap within each
//! 16-bit word. The optional trailing checksum is validated but a mismatch
//! is only recorded and logged, since plenty of drives get it wrong.

use tracing::{debug, warn};

use super::constants::IDENTIFY_RESPONSE_SIZE;
use super::quirks;
use super::types::{ChecksumState, DeviceInfo, DeviceType};

// Byte offsets into the IDENTIFY response (word offsets x2)
const SERIAL_OFFSET: usize = 20; // words 10-19
const FIRMWARE_OFFSET: usize = 46; // words 23-26
const MODEL_OFFSET: usize = 54; // words 27-46
const TCG_OPTIONS_OFFSET: usize = 96; // word 48
const WWN_OFFSET: usize = 216; // words 108-111
const CHECKSUM_MARKER_OFFSET: usize = 510;
const CHECKSUM_MARKER: u8 = 0xA5;

/// Bounds-checked copy with the fixed-capacity string contract: truncate to
/// the destination size and zero-fill any remainder.
pub fn safecopy(dst: &mut [u8], src: &[u8]) {
    let size = dst.len().min(src.len());
    dst[..size].copy_from_slice(&src[..size]);
    dst[size..].fill(0);
}

/// Copy an IDENTIFY string field, swapping the bytes of each 16-bit word.
fn copy_swapped(dst: &mut [u8], src: &[u8]) {
    let size = dst.len().min(src.len());
    for i in (0..size.saturating_sub(1)).step_by(2) {
        dst[i] = src[i + 1];
        dst[i + 1] = src[i];
    }
    dst[size..].fill(0);
}

/// Validate the optional whole-buffer checksum (byte 510 == 0xA5 marks its
/// presence; the sum of all 512 bytes mod 256 must then be zero).
pub fn verify_checksum(response: &[u8; IDENTIFY_RESPONSE_SIZE]) -> ChecksumState {
    if response[CHECKSUM_MARKER_OFFSET] != CHECKSUM_MARKER {
        debug!("IDENTIFY response checksum not present");
        return ChecksumState::NotPresent;
    }
    let sum = response
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != 0 {
        warn!("IDENTIFY DEVICE response checksum failed (sum mod 256 = {})", sum);
        ChecksumState::Mismatch
    } else {
        ChecksumState::Valid
    }
}

/// Parse a raw IDENTIFY response into structured device identity.
///
/// Never fails: a malformed response simply yields empty-ish fields. The
/// vendor/model split correction is applied afterwards for devices in the
/// quirk table.
pub fn parse_identify(response: &[u8; IDENTIFY_RESPONSE_SIZE]) -> DeviceInfo {
    let mut di = DeviceInfo::default();

    di.checksum = verify_checksum(response);

    // Word 0 bit 15: clear for an ATA device, set for anything else.
    di.dev_type = if response[1] & 0x80 != 0 {
        DeviceType::Other
    } else {
        DeviceType::Ata
    };

    copy_swapped(&mut di.serial_num, &response[SERIAL_OFFSET..SERIAL_OFFSET + 20]);
    copy_swapped(
        &mut di.firmware_rev,
        &response[FIRMWARE_OFFSET..FIRMWARE_OFFSET + 8],
    );
    copy_swapped(&mut di.model_num, &response[MODEL_OFFSET..MODEL_OFFSET + 40]);

    di.security_options = u16::from_le_bytes([
        response[TCG_OPTIONS_OFFSET],
        response[TCG_OPTIONS_OFFSET + 1],
    ]);

    // WWN words are little-endian on the wire; swap each so the stored name
    // reads most-significant byte first.
    copy_swapped(
        &mut di.world_wide_name,
        &response[WWN_OFFSET..WWN_OFFSET + 8],
    );

    quirks::apply_corrections(&mut di);

    debug!(
        "Parsed IDENTIFY: model=\"{}\" serial=\"{}\" firmware=\"{}\" tcg_options=0x{:04X}",
        di.model(),
        di.serial(),
        di.firmware(),
        di.security_options
    );

    di
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Write an ASCII string into `buf` at `offset` with IDENTIFY word swap.
    pub(crate) fn put_swapped(buf: &mut [u8], offset: usize, text: &[u8]) {
        for (i, chunk) in text.chunks(2).enumerate() {
            let hi = chunk[0];
            let lo = if chunk.len() > 1 { chunk[1] } else { b' ' };
            buf[offset + 2 * i] = lo;
            buf[offset + 2 * i + 1] = hi;
        }
    }

    pub(crate) fn sample_identify(model: &[u8], serial: &[u8]) -> [u8; 512] {
        let mut buf = [0u8; 512];
        put_swapped(&mut buf, SERIAL_OFFSET, serial);
        put_swapped(&mut buf, FIRMWARE_OFFSET, b"1.02");
        put_swapped(&mut buf, MODEL_OFFSET, model);
        buf[TCG_OPTIONS_OFFSET] = 0x01; // security subsystem supported
        buf
    }

    fn with_valid_checksum(mut buf: [u8; 512]) -> [u8; 512] {
        buf[510] = 0xA5;
        buf[511] = 0;
        let sum = buf.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        buf[511] = 0u8.wrapping_sub(sum);
        buf
    }

    #[test]
    fn safecopy_truncates_and_zero_pads() {
        let mut dst = [0xFFu8; 8];
        safecopy(&mut dst, b"abc");
        assert_eq!(&dst, b"abc\0\0\0\0\0");

        let mut dst = [0u8; 4];
        safecopy(&mut dst, b"abcdefgh");
        assert_eq!(&dst, b"abcd");
    }

    #[test]
    fn parses_swapped_string_fields() {
        let buf = sample_identify(b"DemoDisk 2000GB", b"SN123456");
        let di = parse_identify(&buf);
        assert_eq!(di.model(), "DemoDisk 2000GB");
        assert_eq!(di.serial(), "SN123456");
        assert_eq!(di.firmware(), "1.02");
        assert_eq!(di.security_options, 0x0001);
        assert_eq!(di.dev_type, DeviceType::Ata);
    }

    #[test]
    fn non_ata_device_type_bit_yields_other() {
        let mut buf = sample_identify(b"Something", b"S1");
        buf[1] = 0x80;
        let di = parse_identify(&buf);
        assert_eq!(di.dev_type, DeviceType::Other);
    }

    #[test]
    fn missing_checksum_marker_is_not_present() {
        let buf = sample_identify(b"DemoDisk", b"SN1");
        assert_eq!(verify_checksum(&buf), ChecksumState::NotPresent);
    }

    #[test]
    fn valid_checksum_verifies() {
        let buf = with_valid_checksum(sample_identify(b"DemoDisk", b"SN1"));
        assert_eq!(verify_checksum(&buf), ChecksumState::Valid);
    }

    #[test]
    fn checksum_mismatch_still_parses() {
        let mut buf = sample_identify(b"DemoDisk", b"SN1");
        buf[510] = 0xA5; // marker present but sum deliberately wrong
        let di = parse_identify(&buf);
        assert_eq!(di.checksum, ChecksumState::Mismatch);
        assert_eq!(di.model(), "DemoDisk");
    }

    #[test]
    fn wwn_is_stored_msb_first() {
        let mut buf = sample_identify(b"DemoDisk", b"SN1");
        // Words 108-111 little-endian: 0x5000, 0xC500, 0x1234, 0x5678
        buf[216..224].copy_from_slice(&[0x00, 0x50, 0x00, 0xC5, 0x34, 0x12, 0x78, 0x56]);
        let di = parse_identify(&buf);
        assert_eq!(di.wwn_hex(), "5000c50012345678");
    }
}
