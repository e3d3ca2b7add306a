//! Shared test doubles for the filestate workspace.
//!
//! [`RecordingFilesystem`] keeps entries in memory, applies mutations to them
//! and records every call, so tests can assert both the calls issued and the
//! resulting state. [`StaticIdentity`] answers name/id lookups from fixed
//! tables and records each lookup.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use reconcile::{FileStat, Filesystem, Identity, RawGid, RawUid};
use tempfile::TempDir;

/// Regular-file type bits, as found in `st_mode`.
pub const REGULAR_FILE: u32 = 0o100_000;

/// A call received by [`RecordingFilesystem`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    /// `stat(path)`
    Stat(PathBuf),
    /// `chmod(path, mode)`
    Chmod(PathBuf, u32),
    /// `chown(path, uid, gid)`
    Chown(PathBuf, RawUid, RawGid),
    /// `read_all(path)`
    ReadAll(PathBuf),
    /// `write_all(path, contents)`
    WriteAll(PathBuf, Vec<u8>),
}

impl Call {
    /// Returns `true` for calls that modify the filesystem.
    pub const fn is_mutation(&self) -> bool {
        matches!(self, Self::Chmod(..) | Self::Chown(..) | Self::WriteAll(..))
    }
}

/// Operation selector for injected failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    /// [`Filesystem::stat`]
    Stat,
    /// [`Filesystem::chmod`]
    Chmod,
    /// [`Filesystem::chown`]
    Chown,
    /// [`Filesystem::read_all`]
    ReadAll,
    /// [`Filesystem::write_all`]
    WriteAll,
}

/// State of one in-memory entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FakeEntry {
    /// Raw mode including file-type bits.
    pub mode: u32,
    /// Owner id.
    pub uid: RawUid,
    /// Group id.
    pub gid: RawGid,
    /// Body.
    pub contents: Vec<u8>,
}

/// In-memory [`Filesystem`] that records every call.
#[derive(Debug, Default)]
pub struct RecordingFilesystem {
    entries: RefCell<BTreeMap<PathBuf, FakeEntry>>,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<HashMap<Operation, io::ErrorKind>>,
}

impl RecordingFilesystem {
    /// Creates an empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a regular file with the given permission bits and ids.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, perms: u32, uid: RawUid, gid: RawGid) -> Self {
        self.entries.borrow_mut().insert(
            path.into(),
            FakeEntry {
                mode: REGULAR_FILE | perms,
                uid,
                gid,
                contents: Vec::new(),
            },
        );
        self
    }

    /// Replaces the body of an existing entry.
    ///
    /// # Panics
    ///
    /// Panics if `path` was not added first.
    #[must_use]
    pub fn with_contents(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.entries
            .borrow_mut()
            .get_mut(path.as_ref())
            .expect("entry must exist before setting contents")
            .contents = contents.into();
        self
    }

    /// Makes every later call to `operation` fail with `kind`.
    pub fn fail_on(&self, operation: Operation, kind: io::ErrorKind) {
        self.failures.borrow_mut().insert(operation, kind);
    }

    /// Returns the recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Returns only the recorded mutating calls.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Returns a snapshot of the entry at `path`.
    pub fn entry(&self, path: impl AsRef<Path>) -> Option<FakeEntry> {
        self.entries.borrow().get(path.as_ref()).cloned()
    }

    fn record(&self, operation: Operation, call: Call) -> io::Result<()> {
        self.calls.borrow_mut().push(call);
        match self.failures.borrow().get(&operation) {
            Some(kind) => Err(io::Error::new(*kind, format!("injected {operation:?} failure"))),
            None => Ok(()),
        }
    }

    fn with_entry<T>(&self, path: &Path, update: impl FnOnce(&mut FakeEntry) -> T) -> io::Result<T> {
        self.entries
            .borrow_mut()
            .get_mut(path)
            .map(update)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path.display())))
    }
}

impl Filesystem for RecordingFilesystem {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.record(Operation::Stat, Call::Stat(path.to_path_buf()))?;
        self.with_entry(path, |entry| FileStat {
            mode: entry.mode,
            uid: entry.uid,
            gid: entry.gid,
        })
    }

    fn chmod(&self, path: &Path, mode: u32) -> io::Result<()> {
        self.record(Operation::Chmod, Call::Chmod(path.to_path_buf(), mode))?;
        self.with_entry(path, |entry| entry.mode = (entry.mode & !0o7777) | (mode & 0o7777))
    }

    fn chown(&self, path: &Path, uid: RawUid, gid: RawGid) -> io::Result<()> {
        self.record(Operation::Chown, Call::Chown(path.to_path_buf(), uid, gid))?;
        self.with_entry(path, |entry| {
            entry.uid = uid;
            entry.gid = gid;
        })
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.record(Operation::ReadAll, Call::ReadAll(path.to_path_buf()))?;
        self.with_entry(path, |entry| entry.contents.clone())
    }

    fn write_all(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.record(
            Operation::WriteAll,
            Call::WriteAll(path.to_path_buf(), contents.to_vec()),
        )?;
        self.entries
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_insert_with(|| FakeEntry {
                mode: REGULAR_FILE | 0o644,
                uid: 0,
                gid: 0,
                contents: Vec::new(),
            })
            .contents = contents.to_vec();
        Ok(())
    }
}

/// A lookup received by [`StaticIdentity`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Lookup {
    /// `user_id_for_name(name)`
    UserIdForName(String),
    /// `user_name_for_id(uid)`
    UserNameForId(RawUid),
    /// `group_id_for_name(name)`
    GroupIdForName(String),
    /// `group_name_for_id(gid)`
    GroupNameForId(RawGid),
}

/// [`Identity`] answering from fixed user and group tables.
///
/// Several names may map to one id; the first name registered for an id is
/// the one returned by reverse lookups.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    users: Vec<(String, RawUid)>,
    groups: Vec<(String, RawGid)>,
    lookups: RefCell<Vec<Lookup>>,
}

impl StaticIdentity {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    #[must_use]
    pub fn with_user(mut self, name: impl Into<String>, uid: RawUid) -> Self {
        self.users.push((name.into(), uid));
        self
    }

    /// Registers a group.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, gid: RawGid) -> Self {
        self.groups.push((name.into(), gid));
        self
    }

    /// Returns the recorded lookups.
    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.borrow().clone()
    }

    fn record(&self, lookup: Lookup) {
        self.lookups.borrow_mut().push(lookup);
    }
}

fn id_for(table: &[(String, u32)], kind: &str, name: &str) -> io::Result<u32> {
    table
        .iter()
        .find(|(candidate, _)| candidate == name)
        .map(|(_, id)| *id)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("unknown {kind} {name:?}")))
}

fn name_for(table: &[(String, u32)], id: u32) -> Option<String> {
    table
        .iter()
        .find(|(_, candidate)| *candidate == id)
        .map(|(name, _)| name.clone())
}

impl Identity for StaticIdentity {
    fn user_id_for_name(&self, name: &str) -> io::Result<RawUid> {
        self.record(Lookup::UserIdForName(name.to_owned()));
        id_for(&self.users, "user", name)
    }

    fn user_name_for_id(&self, uid: RawUid) -> io::Result<Option<String>> {
        self.record(Lookup::UserNameForId(uid));
        Ok(name_for(&self.users, uid))
    }

    fn group_id_for_name(&self, name: &str) -> io::Result<RawGid> {
        self.record(Lookup::GroupIdForName(name.to_owned()));
        id_for(&self.groups, "group", name)
    }

    fn group_name_for_id(&self, gid: RawGid) -> io::Result<Option<String>> {
        self.record(Lookup::GroupNameForId(gid));
        Ok(name_for(&self.groups, gid))
    }
}

/// Creates a temporary directory removed when the guard drops.
///
/// # Panics
///
/// Panics if the directory cannot be created.
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().expect("create temporary directory")
}

/// Writes `contents` to `name` inside `dir` with the given permission bits.
///
/// # Panics
///
/// Panics if the file cannot be written or its mode cannot be set.
#[cfg(unix)]
pub fn write_file(dir: &Path, name: &str, contents: &[u8], perms: u32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture file");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(perms))
        .expect("set fixture permissions");
    path
}
