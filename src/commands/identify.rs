//! Identify Command Handler
//!
//! Handles the `identify` subcommand: probe a drive, resolve its security
//! transport and print the structured identity.

use tracing::info;

use crate::display;
use crate::error::Result;
use crate::scsi::SecurityInterface;

pub async fn execute(device: String, json: bool) -> Result<()> {
    info!("Probing device identity: {}", device);

    let mut dev = SecurityInterface::open(&device)?;
    let info = dev.identify()?;

    if json {
        let value = display::device_info_json(&device, &info);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        display::display_device_info(&device, &info);
    }

    Ok(())
}
