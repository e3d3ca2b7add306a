//! No-op UID/GID lookup stubs for non-Unix platforms.
//!
//! On platforms without Unix-style user/group databases all lookups return
//! `Ok(None)`, so forward lookups surface as unknown names and reverse
//! lookups never match a desired name.

use std::io;

use crate::service::{RawGid, RawUid};

/// Looks up the username for a given UID.
pub fn lookup_user_name(_uid: RawUid) -> io::Result<Option<String>> {
    Ok(None)
}

/// Looks up the UID for a given username.
pub fn lookup_user_by_name(_name: &str) -> io::Result<Option<RawUid>> {
    Ok(None)
}

/// Looks up the group name for a given GID.
pub fn lookup_group_name(_gid: RawGid) -> io::Result<Option<String>> {
    Ok(None)
}

/// Looks up the GID for a given group name.
pub fn lookup_group_by_name(_name: &str) -> io::Result<Option<RawGid>> {
    Ok(None)
}
