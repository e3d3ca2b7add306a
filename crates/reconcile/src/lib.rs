#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `reconcile` converges one filesystem entry toward a
//! [`FileSpec`](filespec::FileSpec). It reads the entry's current mode,
//! ownership and body through the [`Filesystem`] service, resolves names
//! through the [`Identity`] service, and issues only the calls needed to close
//! the gap.
//!
//! # Design
//!
//! [`Reconciler`] is generic over both services. Production code uses
//! [`SystemFilesystem`] and [`SystemIdentity`]; tests substitute in-memory
//! doubles. Each attribute is compared and applied independently:
//!
//! 1. permissions: `stat`, mask to `0o7777`, `chmod` on mismatch;
//! 2. owner: `stat`, reverse-lookup the uid, `chown(uid', gid)` on mismatch;
//! 3. group: `stat`, reverse-lookup the gid, `chown(uid, gid')` on mismatch;
//! 4. content: read and compare the body, `write_all` on mismatch.
//!
//! # Invariants
//!
//! - Unset attributes cause no service calls at all.
//! - A converged entry receives no mutating call, so reconciliation can be
//!   repeated safely.
//! - Service errors are returned unchanged; completed steps are not rolled
//!   back.
//!
//! # Examples
//!
//! ```no_run
//! use filespec::FileSpec;
//! use reconcile::{Reconciler, SystemFilesystem, SystemIdentity};
//!
//! # fn example() -> Result<(), reconcile::ReconcileError> {
//! let spec = FileSpec::with_path("/etc/motd")
//!     .owned_by("root")
//!     .with_perms("644")?;
//!
//! let report = Reconciler::new(SystemFilesystem, SystemIdentity).reconcile(&spec)?;
//! for change in report.changes() {
//!     println!("{}: {change}", report.path().display());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
#[cfg(unix)]
mod id_lookup;
#[cfg(not(unix))]
mod id_lookup_stub;
mod options;
#[cfg(unix)]
mod ownership;
mod reconciler;
mod report;
mod service;
mod system;

pub use error::ReconcileError;
pub use options::ReconcileOptions;
pub use reconciler::{Reconciler, reconcile};
pub use report::{Change, ReconcileReport};
pub use service::{FileStat, Filesystem, Identity, RawGid, RawUid};
pub use system::{SystemFilesystem, SystemIdentity};
