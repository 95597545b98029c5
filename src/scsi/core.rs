//! Transport Dispatcher
//!
//! `CommandChannel` is the seam to the platform's generic block-command
//! primitive. `SgChannel` implements it over the Linux SG_IO ioctl; a kernel
//! user-client channel for other platforms plugs in behind the same trait.
//! The dispatcher performs one blocking I/O per call, collects raw status and
//! sense bytes, and never interprets them — that is the classifier's job.

use tracing::debug;

use crate::error::{Result, SedIoError};

use super::constants::{DEFAULT_TIMEOUT_MS, SENSE_INFO_LEN};
use super::device::{AlignedBuffer, DeviceHandle};
use super::sense::classify;
use super::types::{Direction, Outcome};

/// Raw completion record of a single dispatched command.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// Raw dispatch return; negative means the call itself failed
    pub result: i32,
    pub masked_status: u8,
    pub sense: [u8; SENSE_INFO_LEN],
    pub sense_len: u8,
    pub transferred: u32,
}

impl Dispatch {
    pub fn failed(&self) -> bool {
        self.result < 0
    }

    pub fn classify(&self) -> Outcome {
        classify(self.failed(), self.masked_status, &self.sense)
    }
}

/// Generic block-command transport primitive.
pub trait CommandChannel {
    /// Perform one blocking command. The buffer must stay live for the whole
    /// call; ownership remains with the caller. No retries, no cancellation.
    fn submit(
        &mut self,
        cdb: &[u8],
        direction: Direction,
        buffer: &mut AlignedBuffer,
        timeout_ms: u32,
    ) -> Result<Dispatch>;
}

/// SG_IO channel over an exclusively-owned device handle.
pub struct SgChannel {
    handle: DeviceHandle,
}

impl SgChannel {
    pub fn open(device_path: &str) -> Result<Self> {
        Ok(Self {
            handle: DeviceHandle::open(device_path)?,
        })
    }

    pub fn device_path(&self) -> &str {
        self.handle.path()
    }
}

impl CommandChannel for SgChannel {
    #[cfg(target_os = "linux")]
    fn submit(
        &mut self,
        cdb: &[u8],
        direction: Direction,
        buffer: &mut AlignedBuffer,
        timeout_ms: u32,
    ) -> Result<Dispatch> {
        use super::ffi::{
            SgIoHdr, SG_DXFER_FROM_DEV, SG_DXFER_NONE, SG_DXFER_TO_DEV, SG_INTERFACE_ID, SG_IO,
        };

        if !buffer.is_aligned() {
            return Err(SedIoError::NotAligned);
        }

        let mut cdb_bytes = cdb.to_vec();
        let mut sense = [0u8; SENSE_INFO_LEN];

        let mut sg = SgIoHdr::zeroed();
        sg.interface_id = SG_INTERFACE_ID;
        sg.dxfer_direction = match direction {
            Direction::FromDevice => SG_DXFER_FROM_DEV,
            Direction::ToDevice => SG_DXFER_TO_DEV,
            Direction::None => SG_DXFER_NONE,
        };
        sg.cmd_len = cdb_bytes.len() as u8;
        sg.mx_sb_len = SENSE_INFO_LEN as u8;
        sg.dxfer_len = buffer.len() as u32;
        sg.dxferp = buffer.as_mut_ptr() as *mut std::ffi::c_void;
        sg.cmdp = cdb_bytes.as_mut_ptr();
        sg.sbp = sense.as_mut_ptr();
        sg.timeout = if timeout_ms == 0 {
            DEFAULT_TIMEOUT_MS
        } else {
            timeout_ms
        };

        debug!("SG_IO submit: cdb={}", hex::encode(&cdb_bytes));
        let result = unsafe { libc::ioctl(self.handle.fd, SG_IO, &mut sg) };

        if result < 0 {
            debug!(
                "SG_IO ioctl failed on {}: {}",
                self.handle.path(),
                std::io::Error::last_os_error()
            );
        }

        let transferred = sg.dxfer_len.saturating_sub(sg.resid.max(0) as u32);
        debug!(
            "SG_IO complete: result={} masked_status=0x{:02X} transferred={} sense={}",
            result,
            sg.masked_status,
            transferred,
            hex::encode(&sense[..sg.sb_len_wr.min(SENSE_INFO_LEN as u8) as usize])
        );

        Ok(Dispatch {
            result,
            masked_status: sg.masked_status,
            sense,
            sense_len: sg.sb_len_wr,
            transferred,
        })
    }

    #[cfg(not(target_os = "linux"))]
    fn submit(
        &mut self,
        cdb: &[u8],
        direction: Direction,
        buffer: &mut AlignedBuffer,
        timeout_ms: u32,
    ) -> Result<Dispatch> {
        let _ = (cdb, direction, buffer, timeout_ms);
        Err(SedIoError::unsupported(
            "no generic block-command channel on this platform",
        ))
    }
}
