#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filespec` describes the desired state of one filesystem entry: its path,
//! owner and group names, an octal permission string and its body. The crate
//! performs no I/O on the described entry; the `reconcile` crate compares a
//! [`FileSpec`] against the real entry and applies the differences.
//!
//! # Design
//!
//! - Permissions are stored as validated text ([`OctalPerms`]) so that
//!   reading them back returns exactly what was set.
//! - Content is a tagged [`Content`] value. Strings are kept verbatim,
//!   readers are drained immediately, and [`ContentRef`] names are resolved
//!   later through a [`ContentResolver`] supplied by the embedding system.
//!
//! # Invariants
//!
//! - `perms`, when present, is 1 to 4 octal digits.
//! - Intake never partially updates a spec: a failing setter leaves the
//!   previous value in place.
//!
//! # Examples
//!
//! ```
//! use filespec::FileSpec;
//!
//! let mut spec = FileSpec::with_path("/etc/motd");
//! spec.set_owner("root").set_group("root");
//! spec.set_perms("644").unwrap();
//! spec.set_content("welcome\n").unwrap();
//!
//! assert_eq!(spec.permission_bits(), Some(0o644));
//! assert_eq!(spec.resolved_content().unwrap().as_deref(), Some("welcome\n"));
//! ```

mod content;
mod error;
mod file_spec;
mod perms;

pub use content::{Content, ContentRef, ContentResolver, IntoContent, Reader};
pub use error::{ErrorKind, SpecError};
pub use file_spec::FileSpec;
pub use perms::{OctalPerms, PERMISSION_MASK};
