//! Vendor-specific identity corrections.
//!
//! Some devices (typically behind USB-SAT bridges) report their vendor name
//! bled into the front of the IDENTIFY model-number field. The correction is
//! keyed by a lookup of known model signatures, never by guessing, and is a
//! pure transformation over the fixed-capacity fields.

use tracing::debug;

use super::types::{DeviceInfo, VENDOR_ID_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuirkAction {
    SplitVendorFromModel,
}

struct Quirk {
    /// Prefix of the reported model field identifying the affected device
    model_signature: &'static [u8],
    action: QuirkAction,
}

/// Devices known to misreport the vendor/model boundary.
const QUIRK_TABLE: &[Quirk] = &[
    Quirk {
        model_signature: b"Samsung PSSD",
        action: QuirkAction::SplitVendorFromModel,
    },
    Quirk {
        model_signature: b"SanDisk Extreme",
        action: QuirkAction::SplitVendorFromModel,
    },
    Quirk {
        model_signature: b"Sabrent Rocket",
        action: QuirkAction::SplitVendorFromModel,
    },
];

fn lookup(model_num: &[u8]) -> Option<QuirkAction> {
    QUIRK_TABLE
        .iter()
        .find(|q| model_num.starts_with(q.model_signature))
        .map(|q| q.action)
}

/// Apply any registered correction for this device identity.
pub fn apply_corrections(di: &mut DeviceInfo) {
    match lookup(&di.model_num) {
        Some(QuirkAction::SplitVendorFromModel) => {
            debug!(
                "Splitting vendor name from model number: was vendor=\"{}\" model=\"{}\"",
                di.vendor(),
                di.model()
            );
            split_vendor_from_model(di);
            debug!(
                "Now vendor=\"{}\" model=\"{}\"",
                di.vendor(),
                di.model()
            );
        }
        None => {}
    }
}

/// Move the leading `VENDOR_ID_LEN` bytes of the model field into the vendor
/// field, left-shift the remainder of the model and zero-fill the vacated
/// tail. `vendor ++ model[..len-VENDOR_ID_LEN]` stays byte-identical to the
/// original model field.
pub fn split_vendor_from_model(di: &mut DeviceInfo) {
    let model_len = di.model_num.len();
    di.vendor_id.copy_from_slice(&di.model_num[..VENDOR_ID_LEN]);
    di.model_num.copy_within(VENDOR_ID_LEN..model_len, 0);
    di.model_num[model_len - VENDOR_ID_LEN..].fill(0);
}
