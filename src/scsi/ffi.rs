//! Linux SCSI generic (sg) interface layout.
//!
//! `SgIoHdr` mirrors `struct sg_io_hdr` from `<scsi/sg.h>` exactly; it is the
//! one wire-adjacent structure that must stay a `repr(C)` overlay because the
//! kernel ABI defines it, unlike the CDBs which are packed by hand.

#![cfg(target_os = "linux")]

use std::ffi::c_void;

pub const SG_IO: libc::c_ulong = 0x2285;

pub const SG_DXFER_NONE: i32 = -1;
pub const SG_DXFER_TO_DEV: i32 = -2;
pub const SG_DXFER_FROM_DEV: i32 = -3;

pub const SG_INTERFACE_ID: i32 = 'S' as i32;

#[repr(C)]
pub struct SgIoHdr {
    pub interface_id: i32,
    pub dxfer_direction: i32,
    pub cmd_len: u8,
    pub mx_sb_len: u8,
    pub iovec_count: u16,
    pub dxfer_len: u32,
    pub dxferp: *mut c_void,
    pub cmdp: *mut u8,
    pub sbp: *mut u8,
    pub timeout: u32,
    pub flags: u32,
    pub pack_id: i32,
    pub usr_ptr: *mut c_void,
    pub status: u8,
    pub masked_status: u8,
    pub msg_status: u8,
    pub sb_len_wr: u8,
    pub host_status: u16,
    pub driver_status: u16,
    pub resid: i32,
    pub duration: u32,
    pub info: u32,
}

impl SgIoHdr {
    pub fn zeroed() -> Self {
        // Safe: all-zero is a valid bit pattern for this struct.
        unsafe { std::mem::zeroed() }
    }
}
