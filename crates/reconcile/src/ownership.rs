#![allow(unsafe_code)]

use crate::service::{RawGid, RawUid};

pub(crate) fn uid_from_raw(raw: RawUid) -> rustix::fs::Uid {
    // SAFETY: `u32::MAX` is chown's "leave unchanged" sentinel; ids read
    // from stat or the user database never take that value.
    unsafe { rustix::fs::Uid::from_raw(raw) }
}

pub(crate) fn gid_from_raw(raw: RawGid) -> rustix::fs::Gid {
    // SAFETY: see `uid_from_raw`.
    unsafe { rustix::fs::Gid::from_raw(raw) }
}
