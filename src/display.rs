//! Terminal rendering of device identities and raw security payloads.

use serde_json::json;

use crate::scsi::types::{ChecksumState, DeviceInfo};

// IDENTIFY word 48 bit 0: Trusted Computing feature set supported
const SECURITY_SUPPORTED_BIT: u16 = 0x0001;

/// Print the probed identity as an aligned table.
pub fn display_device_info(device_path: &str, info: &DeviceInfo) {
    println!("Device: {}", device_path);
    println!("{:-<48}", "");
    println!("{:<18} {}", "Transport:", info.dev_type.description());
    println!("{:<18} {}", "Vendor:", info.vendor());
    println!("{:<18} {}", "Model:", info.model());
    println!("{:<18} {}", "Serial:", info.serial());
    println!("{:<18} {}", "Firmware:", info.firmware());
    println!("{:<18} {}", "World Wide Name:", info.wwn_hex());
    println!(
        "{:<18} 0x{:04X} ({})",
        "Security options:",
        info.security_options,
        if info.security_options & SECURITY_SUPPORTED_BIT != 0 {
            "Trusted Computing supported"
        } else {
            "no Trusted Computing support reported"
        }
    );
    println!("{:<18} {}", "Checksum:", checksum_label(info.checksum));
}

/// Same identity as a JSON value for machine consumption.
pub fn device_info_json(device_path: &str, info: &DeviceInfo) -> serde_json::Value {
    json!({
        "device": device_path,
        "transport": info.dev_type.description(),
        "vendor": info.vendor(),
        "model": info.model(),
        "serial": info.serial(),
        "firmware": info.firmware(),
        "world_wide_name": info.wwn_hex(),
        "security_options": format!("0x{:04X}", info.security_options),
        "security_supported": info.security_options & SECURITY_SUPPORTED_BIT != 0,
        "identify_checksum": checksum_label(info.checksum),
    })
}

fn checksum_label(state: ChecksumState) -> &'static str {
    match state {
        ChecksumState::NotPresent => "not present",
        ChecksumState::Valid => "valid",
        ChecksumState::Mismatch => "MISMATCH",
    }
}

/// Classic offset / hex / ASCII dump, 16 bytes per row.
pub fn display_hex_dump(data: &[u8]) {
    for (i, chunk) in data.chunks(16).enumerate() {
        print!("{:08x}  ", i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                print!(" ");
            }
            print!("{:02x} ", byte);
        }

        let hex_width = 16 * 3 + 1;
        let used = chunk.len() * 3 + if chunk.len() > 8 { 1 } else { 0 };
        print!("{:width$}", "", width = hex_width - used);

        print!(" |");
        for byte in chunk {
            let c = if byte.is_ascii_graphic() || *byte == b' ' {
                *byte as char
            } else {
                '.'
            };
            print!("{}", c);
        }
        println!("|");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scsi::identify::safecopy;
    use crate::scsi::types::DeviceType;

    #[test]
    fn json_rendering_carries_identity_fields() {
        let mut info = DeviceInfo::default();
        info.dev_type = DeviceType::Ata;
        info.security_options = 0x0001;
        safecopy(&mut info.model_num, b"DemoDisk 2000GB");
        safecopy(&mut info.serial_num, b"SN123456");

        let value = device_info_json("/dev/sdz", &info);
        assert_eq!(value["device"], "/dev/sdz");
        assert_eq!(value["transport"], "ATA");
        assert_eq!(value["model"], "DemoDisk 2000GB");
        assert_eq!(value["serial"], "SN123456");
        assert_eq!(value["security_supported"], true);
        assert_eq!(value["identify_checksum"], "not present");
    }

    #[test]
    fn checksum_labels_are_distinct() {
        assert_eq!(checksum_label(ChecksumState::NotPresent), "not present");
        assert_eq!(checksum_label(ChecksumState::Valid), "valid");
        assert_eq!(checksum_label(ChecksumState::Mismatch), "MISMATCH");
    }
}
