//! Completion Classifier
//!
//! Maps raw dispatch result + masked status + sense bytes into one uniform
//! outcome. The distinction between `NotAtaResponse` and `TargetError`
//! matters: the former means "this device does not speak ATA passthrough,
//! try the native SCSI path", the latter means the device understood the
//! command and rejected it at the protocol level.

use tracing::debug;

use super::constants::{
    SENSE_ATA_ERROR_OFFSET, SENSE_ATA_PASSTHROUGH, SENSE_DESCRIPTOR_CURRENT, STATUS_GOOD,
};
use super::types::Outcome;

/// Classify a completed dispatch. Rules apply in order:
/// dispatch failure, then non-GOOD status, then sense response code, then
/// the embedded ATA error byte.
pub fn classify(dispatch_failed: bool, masked_status: u8, sense: &[u8]) -> Outcome {
    if dispatch_failed {
        return Outcome::TransportFailure;
    }

    if masked_status != STATUS_GOOD {
        debug!(
            "masked_status 0x{:02X} ({}) != GOOD",
            masked_status,
            status_name(masked_status)
        );
        return Outcome::TransportFailure;
    }

    let sense0 = sense.first().copied().unwrap_or(0);
    let sense1 = sense.get(1).copied().unwrap_or(0);
    let zero_sense = sense0 == 0x00 && sense1 == 0x00;
    let ata_descriptor =
        sense0 == SENSE_DESCRIPTOR_CURRENT && sense1 == SENSE_ATA_PASSTHROUGH;
    if !zero_sense && !ata_descriptor {
        debug!(
            "disqualifying ATA response: sense[0]=0x{:02X} sense[1]=0x{:02X}",
            sense0, sense1
        );
        return Outcome::NotAtaResponse;
    }

    match sense.get(SENSE_ATA_ERROR_OFFSET).copied().unwrap_or(0) {
        0 => Outcome::Success,
        code => Outcome::TargetError(code),
    }
}

/// Human-readable name of a SCSI masked status, for log messages.
pub fn status_name(masked_status: u8) -> &'static str {
    match masked_status {
        0x00 => "GOOD",
        0x01 => "CHECK CONDITION",
        0x02 => "CONDITION MET",
        0x04 => "BUSY",
        0x08 => "INTERMEDIATE",
        0x0A => "INTERMEDIATE-CONDITION MET",
        0x0C => "RESERVATION CONFLICT",
        0x11 => "COMMAND TERMINATED",
        0x14 => "TASK SET FULL",
        0x18 => "ACA ACTIVE",
        0x20 => "TASK ABORTED",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sense_with(b0: u8, b1: u8, b11: u8) -> [u8; 32] {
        let mut sense = [0u8; 32];
        sense[0] = b0;
        sense[1] = b1;
        sense[11] = b11;
        sense
    }

    #[test]
    fn dispatch_failure_wins_over_everything() {
        let sense = sense_with(0x00, 0x00, 0x00);
        assert_eq!(classify(true, 0x00, &sense), Outcome::TransportFailure);
    }

    #[test]
    fn bad_status_is_transport_failure() {
        let sense = sense_with(0x00, 0x00, 0x00);
        assert_eq!(classify(false, 0x01, &sense), Outcome::TransportFailure);
    }

    #[test]
    fn ata_descriptor_pair_is_never_not_ata() {
        // 0x72/0x0B denotes "ATA passthrough information available" and must
        // classify by the embedded error byte regardless of other content.
        let mut sense = sense_with(0x72, 0x0B, 0x00);
        sense[2] = 0xFF;
        sense[12] = 0xFF;
        assert_eq!(classify(false, 0x00, &sense), Outcome::Success);

        let sense = sense_with(0x72, 0x0B, 0x40);
        assert_eq!(classify(false, 0x00, &sense), Outcome::TargetError(0x40));
    }

    #[test]
    fn foreign_sense_is_not_ata_response() {
        let sense = sense_with(0x70, 0x00, 0x00);
        assert_eq!(classify(false, 0x00, &sense), Outcome::NotAtaResponse);

        let sense = sense_with(0x00, 0x05, 0x00);
        assert_eq!(classify(false, 0x00, &sense), Outcome::NotAtaResponse);
    }

    #[test]
    fn zero_sense_good_status_is_success() {
        let sense = sense_with(0x00, 0x00, 0x00);
        assert_eq!(classify(false, 0x00, &sense), Outcome::Success);
    }

    #[test]
    fn embedded_ata_error_is_returned_verbatim() {
        let sense = sense_with(0x00, 0x00, 0x05);
        assert_eq!(classify(false, 0x00, &sense), Outcome::TargetError(0x05));
    }

    #[test]
    fn short_sense_buffer_classifies_as_success() {
        assert_eq!(classify(false, 0x00, &[]), Outcome::Success);
        assert_eq!(classify(false, 0x00, &[0x00, 0x00]), Outcome::Success);
    }

    #[test]
    fn status_names_cover_common_codes() {
        assert_eq!(status_name(0x00), "GOOD");
        assert_eq!(status_name(0x01), "CHECK CONDITION");
        assert_eq!(status_name(0x77), "UNKNOWN");
    }
}
