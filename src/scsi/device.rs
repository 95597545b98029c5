//! Device handles and DMA-aligned buffers.
//!
//! The handle owns the file descriptor exclusively and closes it exactly once
//! on drop. Data buffers handed to the transport must come from
//! `AlignedBuffer` so the SG layer's DMA alignment requirement holds.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

use tracing::{debug, warn};

use crate::error::{Result, SedIoError};

use super::constants::{IO_BUFFER_ALIGNMENT, LIBATA_ALLOW_TPM_PATH};

/// Opaque per-device connection. Exclusively owned; not cloneable.
#[derive(Debug)]
pub struct DeviceHandle {
    #[cfg(unix)]
    pub(crate) fd: i32,
    pub(crate) device_path: String,
}

impl DeviceHandle {
    /// Open a block device for read/write access.
    ///
    /// Permission and not-found failures are distinguished so the CLI can
    /// suggest the right remedy; both are fatal to the calling operation.
    #[cfg(unix)]
    pub fn open(device_path: &str) -> Result<Self> {
        use std::ffi::CString;

        debug!("Opening device: {}", device_path);

        let path_cstring = CString::new(device_path).map_err(|e| {
            SedIoError::parse(format!("device path conversion error: {}", e))
        })?;

        let fd = unsafe { libc::open(path_cstring.as_ptr(), libc::O_RDWR) };
        if fd < 0 {
            let errno = std::io::Error::last_os_error()
                .raw_os_error()
                .unwrap_or(0);
            return Err(match errno {
                libc::EACCES | libc::EPERM => {
                    warn!("Permission denied opening {}; try running as root", device_path);
                    SedIoError::DevicePermission(device_path.to_string())
                }
                libc::ENOENT => {
                    // Device scans look for this failure to end enumeration,
                    // so it is logged at debug rather than warn.
                    debug!("Device not found: {}", device_path);
                    SedIoError::DeviceNotFound(device_path.to_string())
                }
                _ => SedIoError::DeviceOpen(device_path.to_string(), errno),
            });
        }

        debug!("Device opened successfully: {} (fd {})", device_path, fd);
        Ok(Self {
            fd,
            device_path: device_path.to_string(),
        })
    }

    #[cfg(not(unix))]
    pub fn open(device_path: &str) -> Result<Self> {
        let _ = device_path;
        Err(SedIoError::unsupported("non-Unix platform"))
    }

    pub fn path(&self) -> &str {
        &self.device_path
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        #[cfg(unix)]
        unsafe {
            if self.fd >= 0 {
                libc::close(self.fd);
                debug!("Device handle closed: {}", self.device_path);
            }
        }
    }
}

/// Heap buffer aligned to `IO_BUFFER_ALIGNMENT`, zero-filled on allocation.
///
/// Ownership stays with the caller across a dispatch; the allocation is not
/// moved or freed while a command is in flight.
pub struct AlignedBuffer {
    ptr: NonNull<u8>,
    len: usize,
    layout: Layout,
}

impl AlignedBuffer {
    pub fn zeroed(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(SedIoError::parse("zero-length data buffer"));
        }
        let layout = Layout::from_size_align(len, IO_BUFFER_ALIGNMENT)
            .map_err(|e| SedIoError::parse(format!("bad buffer layout: {}", e)))?;
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw)
            .ok_or_else(|| SedIoError::transport("aligned buffer allocation failed"))?;
        Ok(Self { ptr, len, layout })
    }

    /// Allocate and copy `data` in, zero-padding the tail up to `len`.
    pub fn from_slice(data: &[u8], len: usize) -> Result<Self> {
        let mut buffer = Self::zeroed(len.max(data.len()))?;
        buffer.as_mut_slice()[..data.len()].copy_from_slice(data);
        Ok(buffer)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Alignment precondition checked by the dispatcher before any I/O.
    pub fn is_aligned(&self) -> bool {
        (self.ptr.as_ptr() as usize) % IO_BUFFER_ALIGNMENT == 0
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

// The buffer is plain owned memory.
unsafe impl Send for AlignedBuffer {}

/// Diagnostic-only probe of the libata TPM kernel flag.
///
/// TRUSTED SEND/RECEIVE are rejected by the kernel unless
/// `libata.allow_tpm=1`; absence of the flag file only warns, it never fails
/// the operation.
pub fn check_kernel_tpm_flag() {
    match std::fs::read_to_string(LIBATA_ALLOW_TPM_PATH) {
        Ok(value) => {
            if value.trim() == "0" {
                warn!(
                    "Kernel flag libata.allow_tpm is 0; TRUSTED commands to SATA \
                     drives will be rejected by the kernel"
                );
            } else {
                debug!("libata.allow_tpm = {}", value.trim());
            }
        }
        Err(e) => {
            warn!("Unable to verify kernel flag libata.allow_tpm: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_buffer_is_aligned_and_zeroed() {
        let buffer = AlignedBuffer::zeroed(512).unwrap();
        assert!(buffer.is_aligned());
        assert_eq!(buffer.len(), 512);
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn from_slice_zero_pads_the_tail() {
        let buffer = AlignedBuffer::from_slice(b"abc", 512).unwrap();
        assert_eq!(&buffer.as_slice()[..3], b"abc");
        assert!(buffer.as_slice()[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_length_buffer_is_rejected() {
        assert!(AlignedBuffer::zeroed(0).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn open_missing_device_reports_not_found() {
        let err = DeviceHandle::open("/dev/does-not-exist-sedio").unwrap_err();
        assert!(matches!(err, SedIoError::DeviceNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn open_regular_file_yields_handle() {
        // A scratch file stands in for a device node; open(2) semantics are
        // identical for the handle lifecycle.
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        let handle = DeviceHandle::open(&path).unwrap();
        assert_eq!(handle.path(), path);
    }
}
