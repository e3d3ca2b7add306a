use std::fmt;
use std::path::{Path, PathBuf};

use crate::service::{RawGid, RawUid};

/// A single corrective action taken (or planned, in dry-run mode).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Change {
    /// Permission bits were replaced.
    Permissions {
        /// Bits before the change.
        from: u32,
        /// Bits after the change.
        to: u32,
    },
    /// The owning user was changed; the group was preserved.
    Owner {
        /// Previous user id.
        from: RawUid,
        /// New user id.
        to: RawUid,
    },
    /// The owning group was changed; the user was preserved.
    Group {
        /// Previous group id.
        from: RawGid,
        /// New group id.
        to: RawGid,
    },
    /// The body was rewritten in full.
    Content {
        /// Length of the new body.
        bytes: usize,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permissions { from, to } => write!(f, "mode {from:04o} -> {to:04o}"),
            Self::Owner { from, to } => write!(f, "owner {from} -> {to}"),
            Self::Group { from, to } => write!(f, "group {from} -> {to}"),
            Self::Content { bytes } => write!(f, "content rewritten ({bytes} bytes)"),
        }
    }
}

/// Outcome of one reconciliation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReconcileReport {
    path: PathBuf,
    changes: Vec<Change>,
    dry_run: bool,
}

impl ReconcileReport {
    pub(crate) fn new(path: &Path, dry_run: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            changes: Vec::new(),
            dry_run,
        }
    }

    pub(crate) fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Path that was reconciled.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Changes in the order they were applied.
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Returns `true` when the entry already matched the specification.
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns `true` when the changes were only planned.
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::Change;

    #[test]
    fn changes_render_compactly() {
        assert_eq!(
            Change::Permissions { from: 0o644, to: 0o755 }.to_string(),
            "mode 0644 -> 0755"
        );
        assert_eq!(Change::Owner { from: 0, to: 10 }.to_string(), "owner 0 -> 10");
        assert_eq!(Change::Group { from: 1, to: 10 }.to_string(), "group 1 -> 10");
        assert_eq!(
            Change::Content { bytes: 4 }.to_string(),
            "content rewritten (4 bytes)"
        );
    }
}
