//! Service boundaries consumed by the reconciler.
//!
//! All filesystem access and all user/group database access go through the
//! [`Filesystem`] and [`Identity`] traits. The reconciler never touches the
//! operating system directly, which keeps its decision logic testable against
//! in-memory doubles.

use std::io;
use std::path::Path;

use filespec::PERMISSION_MASK;

/// Raw user ID type (u32 on all platforms).
pub type RawUid = u32;

/// Raw group ID type (u32 on all platforms).
pub type RawGid = u32;

/// Metadata fields needed to compare an entry against a specification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileStat {
    /// Raw mode, possibly including file-type bits.
    pub mode: u32,
    /// User ID of the file owner.
    pub uid: RawUid,
    /// Group ID of the file.
    pub gid: RawGid,
}

impl FileStat {
    /// Returns the permission bits of [`Self::mode`].
    #[must_use]
    pub const fn permission_bits(&self) -> u32 {
        self.mode & PERMISSION_MASK
    }
}

/// Filesystem primitives used during reconciliation.
///
/// Errors are returned to the caller of
/// [`Reconciler::reconcile`](crate::Reconciler::reconcile) unchanged.
pub trait Filesystem {
    /// Reads the mode and ownership of `path`, following symlinks.
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Replaces the permission bits of `path` with `mode`.
    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Sets both the owner and the group of `path`.
    fn chown(&self, path: &Path, uid: RawUid, gid: RawGid) -> io::Result<()>;

    /// Reads the full body of `path`.
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replaces the full body of `path`, creating it when missing.
    fn write_all(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// User and group name resolution.
///
/// Forward lookups (name to id) fail with [`io::ErrorKind::NotFound`] for
/// unknown names. Reverse lookups return `Ok(None)` for ids without a name.
pub trait Identity {
    /// Resolves a user name to its id.
    fn user_id_for_name(&self, name: &str) -> io::Result<RawUid>;

    /// Resolves a user id to its name.
    fn user_name_for_id(&self, uid: RawUid) -> io::Result<Option<String>>;

    /// Resolves a group name to its id.
    fn group_id_for_name(&self, name: &str) -> io::Result<RawGid>;

    /// Resolves a group id to its name.
    fn group_name_for_id(&self, gid: RawGid) -> io::Result<Option<String>>;
}

impl<T: Filesystem + ?Sized> Filesystem for &T {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        (**self).stat(path)
    }

    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        (**self).chmod(path, mode)
    }

    fn chown(&self, path: &Path, uid: RawUid, gid: RawGid) -> io::Result<()> {
        (**self).chown(path, uid, gid)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read_all(path)
    }

    fn write_all(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        (**self).write_all(path, contents)
    }
}

impl<T: Identity + ?Sized> Identity for &T {
    fn user_id_for_name(&self, name: &str) -> io::Result<RawUid> {
        (**self).user_id_for_name(name)
    }

    fn user_name_for_id(&self, uid: RawUid) -> io::Result<Option<String>> {
        (**self).user_name_for_id(uid)
    }

    fn group_id_for_name(&self, name: &str) -> io::Result<RawGid> {
        (**self).group_id_for_name(name)
    }

    fn group_name_for_id(&self, gid: RawGid) -> io::Result<Option<String>> {
        (**self).group_name_for_id(gid)
    }
}
