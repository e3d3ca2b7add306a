#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filestate` declares what a single file should look like and converges the
//! real file toward it. A [`FileSpec`] names the path, owner, group,
//! permission string and body; [`converge`] compares it with the entry on
//! disk and changes only what differs.
//!
//! The work is split across the workspace crates re-exported here:
//!
//! - [`filespec`]: the desired-state model and content intake;
//! - [`reconcile`]: the service traits, their system implementations and the
//!   [`Reconciler`];
//! - [`logging`]: verbosity configuration and tracing setup.
//!
//! # Examples
//!
//! ```no_run
//! use filestate::{FileSpec, VerbosityConfig};
//!
//! # fn example() -> Result<(), filestate::ReconcileError> {
//! let _ = filestate::init_tracing(&VerbosityConfig::from_verbose_level(1));
//!
//! let mut spec = FileSpec::with_path("/etc/motd");
//! spec.set_owner("root").set_group("root");
//! spec.set_perms("644")?;
//! spec.set_content("maintenance window tonight\n")?;
//!
//! let report = filestate::converge(&spec)?;
//! if report.is_unchanged() {
//!     println!("already converged");
//! }
//! # Ok(())
//! # }
//! ```

pub use filespec::{
    self, Content, ContentRef, ContentResolver, ErrorKind, FileSpec, IntoContent, OctalPerms,
    Reader, SpecError,
};
pub use logging::{self, VerbosityConfig, init_tracing};
pub use reconcile::{
    self, Change, FileStat, Filesystem, Identity, ReconcileError, ReconcileOptions,
    ReconcileReport, Reconciler, SystemFilesystem, SystemIdentity,
};

/// Reconciles `spec` against the local filesystem and user database.
pub fn converge(spec: &FileSpec) -> Result<ReconcileReport, ReconcileError> {
    Reconciler::new(SystemFilesystem, SystemIdentity).reconcile(spec)
}

/// Like [`converge`], but only reports the changes that would be made.
pub fn plan(spec: &FileSpec) -> Result<ReconcileReport, ReconcileError> {
    Reconciler::new(SystemFilesystem, SystemIdentity)
        .with_options(ReconcileOptions::new().dry_run(true))
        .reconcile(spec)
}
