//! Service implementations backed by the host operating system.

use std::fs;
use std::io;
use std::path::Path;

#[cfg(unix)]
use crate::id_lookup::{
    lookup_group_by_name, lookup_group_name, lookup_user_by_name, lookup_user_name,
};
#[cfg(not(unix))]
use crate::id_lookup_stub::{
    lookup_group_by_name, lookup_group_name, lookup_user_by_name, lookup_user_name,
};
use crate::service::{FileStat, Filesystem, Identity, RawGid, RawUid};

/// [`Filesystem`] implementation using `std::fs` and `rustix`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemFilesystem;

impl SystemFilesystem {
    /// Creates the system filesystem service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Filesystem for SystemFilesystem {
    #[cfg(unix)]
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        use std::os::unix::fs::MetadataExt;

        let metadata = fs::metadata(path)?;
        Ok(FileStat {
            mode: metadata.mode(),
            uid: metadata.uid(),
            gid: metadata.gid(),
        })
    }

    #[cfg(not(unix))]
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = fs::metadata(path)?;
        let mode = if metadata.permissions().readonly() {
            0o444
        } else {
            0o644
        };
        Ok(FileStat { mode, uid: 0, gid: 0 })
    }

    #[cfg(unix)]
    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(mode & 0o222 == 0);
        fs::set_permissions(path, permissions)
    }

    #[cfg(unix)]
    fn chown(&self, path: &Path, uid: RawUid, gid: RawGid) -> io::Result<()> {
        use crate::ownership::{gid_from_raw, uid_from_raw};
        use rustix::fs::{AtFlags, CWD, chownat};

        chownat(
            CWD,
            path,
            Some(uid_from_raw(uid)),
            Some(gid_from_raw(gid)),
            AtFlags::empty(),
        )
        .map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn chown(&self, _path: &Path, _uid: RawUid, _gid: RawGid) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "changing ownership is not supported on this platform",
        ))
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_all(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }
}

/// [`Identity`] implementation backed by the system user and group databases.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemIdentity;

impl SystemIdentity {
    /// Creates the system identity service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn unknown(kind: &str, name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("unknown {kind} {name:?}"))
}

impl Identity for SystemIdentity {
    fn user_id_for_name(&self, name: &str) -> io::Result<RawUid> {
        lookup_user_by_name(name)?.ok_or_else(|| unknown("user", name))
    }

    fn user_name_for_id(&self, uid: RawUid) -> io::Result<Option<String>> {
        lookup_user_name(uid)
    }

    fn group_id_for_name(&self, name: &str) -> io::Result<RawGid> {
        lookup_group_by_name(name)?.ok_or_else(|| unknown("group", name))
    }

    fn group_name_for_id(&self, gid: RawGid) -> io::Result<Option<String>> {
        lookup_group_name(gid)
    }
}
